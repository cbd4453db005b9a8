//=========================================================================
// Layer Snapshot
//=========================================================================
//
// node → originating render layer, for presentations that draw each
// viewport with its own camera and move nodes across viewports while a
// transition plays.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

//=== Internal Dependencies ===============================================

use crate::core::bridge::NodeVisuals;
use crate::core::error::TransitionError;
use crate::core::node::{NodeId, RenderLayer};

//=== LayerSnapshot =======================================================

#[derive(Debug, Default)]
pub struct LayerSnapshot {
    originals: HashMap<NodeId, RenderLayer>,
}

impl LayerSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the node's layer and moves it to `layer`.
    ///
    /// A node already recorded keeps its first original.
    pub fn reassign(
        &mut self,
        node: NodeId,
        layer: RenderLayer,
        visuals: &mut dyn NodeVisuals,
    ) -> Result<(), TransitionError> {
        if !self.originals.contains_key(&node) {
            let original = visuals
                .render_layer(node)
                .ok_or(TransitionError::UnknownNode { node })?;
            self.originals.insert(node, original);
        }
        visuals.set_render_layer(node, layer);
        Ok(())
    }

    pub fn original(&self, node: NodeId) -> Option<RenderLayer> {
        self.originals.get(&node).copied()
    }

    /// Moves every recorded node back to its original layer.
    ///
    /// Returns the number of nodes restored.
    pub fn restore_all(&mut self, visuals: &mut dyn NodeVisuals) -> usize {
        let restored = self.originals.len();
        for (node, layer) in self.originals.drain() {
            visuals.set_render_layer(node, layer);
        }
        restored
    }

    pub fn len(&self) -> usize {
        self.originals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.originals.is_empty()
    }

    pub fn clear(&mut self) {
        self.originals.clear();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
