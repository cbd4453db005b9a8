//=========================================================================
// Portal Catalog
//=========================================================================
//
// Static resource map declaring which games ship a portal prefab, plus
// whether a portal object is already attached to the host scene.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use crate::core::bridge::PortalCatalog;
use crate::core::error::ConfigError;

//=== StaticPortalCatalog =================================================

/// Portal catalog loaded from authored data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticPortalCatalog {
    /// A portal object is already present in the host scene.
    pub attached: bool,
    /// Game id → portal prefab path.
    pub prefabs: HashMap<String, String>,
}

impl StaticPortalCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_attached(mut self, attached: bool) -> Self {
        self.attached = attached;
        self
    }

    pub fn with_prefab(mut self, game_id: impl Into<String>, path: impl Into<String>) -> Self {
        self.prefabs.insert(game_id.into(), path.into());
        self
    }
}

impl PortalCatalog for StaticPortalCatalog {
    fn portal_attached(&self) -> bool {
        self.attached
    }

    fn portal_prefab_path(&self, game_id: &str) -> Option<&str> {
        self.prefabs
            .get(game_id)
            .map(String::as_str)
            .filter(|path| !path.is_empty())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
