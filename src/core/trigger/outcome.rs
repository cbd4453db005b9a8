//=========================================================================
// Outcome Context
//=========================================================================
//
// Read-only query surface over the current game outcome.
//
// The outcome stream itself belongs to the host; the trigger policy only
// needs to know whether the outcome is a qualifying feature, which feature
// outcomes are pending (by category), and the outcome's declared name.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

//=== FeatureCategory =====================================================

/// Category of a pending feature outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureCategory {
    /// Gifted rounds, e.g. free spins.
    Gifting,
    /// Pick-style challenge.
    Challenge,
    Scatter,
}

//=== PendingFeatures =====================================================

/// A feature outcome waiting to be presented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingFeature {
    pub name: String,
}

impl PendingFeature {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Pending feature outcomes keyed by category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PendingFeatures(HashMap<FeatureCategory, Vec<PendingFeature>>);

impl PendingFeatures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: FeatureCategory, feature: PendingFeature) {
        self.0.entry(category).or_default().push(feature);
    }

    /// Pending features of one category (empty slice if none).
    pub fn get(&self, category: FeatureCategory) -> &[PendingFeature] {
        self.0.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns `true` when no category holds any feature.
    pub fn is_empty(&self) -> bool {
        self.0.values().all(Vec::is_empty)
    }

    /// Names of every pending feature across all categories.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.values().flatten().map(|f| f.name.as_str())
    }
}

//=== OutcomeContext ======================================================

/// Query surface the trigger policy evaluates.
pub trait OutcomeContext {
    /// Whether the outcome is a qualifying feature, directly or in a nested
    /// layered re-evaluation.
    fn is_qualifying_feature(&self) -> bool;

    /// Pending feature outcomes, if the stream exposes any.
    fn pending_features(&self) -> Option<&PendingFeatures>;

    fn outcome_name(&self) -> Option<&str>;

    /// Whether another bonus is queued behind the current one.
    fn has_queued_bonus(&self) -> bool {
        false
    }
}

//=== OutcomeSnapshot =====================================================

/// Owned, serializable outcome. The form outcomes take when sent to a
/// running engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutcomeSnapshot {
    pub name: Option<String>,
    /// The outcome itself triggers a feature.
    pub feature: bool,
    /// Layered re-evaluations nested in this outcome.
    pub layers: Vec<OutcomeSnapshot>,
    pub pending: Option<PendingFeatures>,
    pub queued_bonus: bool,
}

impl OutcomeSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn feature(mut self) -> Self {
        self.feature = true;
        self
    }

    pub fn with_layer(mut self, layer: OutcomeSnapshot) -> Self {
        self.layers.push(layer);
        self
    }

    pub fn with_pending(mut self, category: FeatureCategory, name: impl Into<String>) -> Self {
        self.pending
            .get_or_insert_with(PendingFeatures::new)
            .insert(category, PendingFeature::new(name));
        self
    }

    pub fn with_queued_bonus(mut self) -> Self {
        self.queued_bonus = true;
        self
    }
}

impl OutcomeContext for OutcomeSnapshot {
    fn is_qualifying_feature(&self) -> bool {
        self.feature || self.layers.iter().any(OutcomeContext::is_qualifying_feature)
    }

    fn pending_features(&self) -> Option<&PendingFeatures> {
        self.pending.as_ref()
    }

    fn outcome_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn has_queued_bonus(&self) -> bool {
        self.queued_bonus
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
