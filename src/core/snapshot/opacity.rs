//=========================================================================
// Opacity Snapshot
//=========================================================================
//
// node → original per-channel opacity, captured lazily the first time a
// node enters the fade set and removed again when it is restored.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::warn;

//=== Internal Dependencies ===============================================

use crate::core::bridge::NodeVisuals;
use crate::core::error::TransitionError;
use crate::core::node::{NodeId, OpacityMap};

//=== CaptureOutcome ======================================================

/// Result of a successful capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOutcome {
    Captured,
    /// The node already had a snapshot this cycle; nothing changed.
    AlreadyCaptured,
    /// Captured, but every channel was already zero.
    CapturedZeroed,
}

//=== OpacitySnapshot =====================================================

#[derive(Debug, Default)]
pub struct OpacitySnapshot {
    originals: HashMap<NodeId, OpacityMap>,
}

impl OpacitySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the node's current opacity unless it is already recorded.
    pub fn capture(
        &mut self,
        node: NodeId,
        visuals: &dyn NodeVisuals,
    ) -> Result<CaptureOutcome, TransitionError> {
        if self.originals.contains_key(&node) {
            return Ok(CaptureOutcome::AlreadyCaptured);
        }

        let current = visuals
            .opacity_map(node)
            .ok_or(TransitionError::UnknownNode { node })?;
        let zeroed = current.is_zeroed();
        self.originals.insert(node, current);

        if zeroed {
            Ok(CaptureOutcome::CapturedZeroed)
        } else {
            Ok(CaptureOutcome::Captured)
        }
    }

    pub fn original(&self, node: NodeId) -> Option<&OpacityMap> {
        self.originals.get(&node)
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.originals.contains_key(&node)
    }

    /// Writes the original opacity back and forgets the node.
    ///
    /// Channels the live node no longer has are skipped and reported as
    /// [`TransitionError::ListSizeMismatch`]; the remaining channels are
    /// still restored.
    pub fn restore(
        &mut self,
        node: NodeId,
        visuals: &mut dyn NodeVisuals,
    ) -> Result<(), TransitionError> {
        let original = self
            .originals
            .remove(&node)
            .ok_or(TransitionError::DoubleRestore { node })?;

        let live_channels = visuals.opacity_map(node).map_or(0, |live| live.len());
        let mut mismatch = None;

        for (index, value) in original.iter() {
            if index >= live_channels {
                warn!(
                    "Restoring {}: channel {} missing (node has {} channels, snapshot {})",
                    node,
                    index,
                    live_channels,
                    original.len()
                );
                mismatch.get_or_insert(TransitionError::ListSizeMismatch {
                    node,
                    index,
                    expected: live_channels,
                });
                continue;
            }
            visuals.set_opacity(node, index, value);
        }

        match mismatch {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Drops a snapshot without writing it back.
    pub fn discard(&mut self, node: NodeId) -> Option<OpacityMap> {
        self.originals.remove(&node)
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.originals.keys().copied()
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
