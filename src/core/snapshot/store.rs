//=========================================================================
// Resource Snapshot Store
//=========================================================================
//
// Captures and restores the mutable visual state a transition touches.
//
// Architecture:
//   tracked: [ static nodes .. | dynamic nodes .. ]
//                       baseline ┘
//   capture(node) ─► NodeClaims ─► OpacitySnapshot
//   reassign_layer(node) ───────► LayerSnapshot
//   restore(node) ─► write back ─► release claim
//
// Invariant: the nodes captured during a forward pass are exactly the
// nodes restorable during the matching reverse pass. Dynamic nodes (added
// for one transition only) sit above the baseline and are trimmed without
// touching the statically configured ones.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, error, warn};

//=== Internal Dependencies ===============================================

use super::claims::{ClaimOwner, NodeClaims};
use super::layer::LayerSnapshot;
use super::opacity::{CaptureOutcome, OpacitySnapshot};
use crate::core::bridge::NodeVisuals;
use crate::core::error::TransitionError;
use crate::core::node::{NodeId, OpacityMap, RenderLayer};

//=== CaptureReport =======================================================

/// Outcome of capturing every tracked node.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CaptureReport {
    /// Nodes with a snapshot, safe to fade.
    pub nodes: Vec<NodeId>,
    /// Non-fatal faults; nodes that failed to capture are not in `nodes`.
    pub faults: Vec<TransitionError>,
}

//=== ResourceSnapshotStore ===============================================

#[derive(Debug)]
pub struct ResourceSnapshotStore {
    owner: ClaimOwner,
    claims: NodeClaims,
    tracked: Vec<NodeId>,
    baseline: usize,
    opacity: OpacitySnapshot,
    layers: LayerSnapshot,
    captured_log: Vec<NodeId>,
    restored_log: Vec<NodeId>,
}

impl ResourceSnapshotStore {
    //--- Construction -----------------------------------------------------

    /// Creates an empty store registered with `claims`.
    pub fn new(claims: NodeClaims) -> Self {
        Self {
            owner: claims.register_owner(),
            claims,
            tracked: Vec::new(),
            baseline: 0,
            opacity: OpacitySnapshot::new(),
            layers: LayerSnapshot::new(),
            captured_log: Vec::new(),
            restored_log: Vec::new(),
        }
    }

    //--- Tracked Set ------------------------------------------------------

    /// Replaces the tracked set with statically configured nodes and sets
    /// the baseline to their count. Duplicates are dropped.
    pub fn set_baseline<I>(&mut self, nodes: I)
    where
        I: IntoIterator<Item = NodeId>,
    {
        self.tracked.clear();
        for node in nodes {
            if !self.tracked.contains(&node) {
                self.tracked.push(node);
            }
        }
        self.baseline = self.tracked.len();
    }

    /// Appends a node that exists only for this transition.
    ///
    /// Returns `false` if the node is already tracked.
    pub fn append_dynamic(&mut self, node: NodeId) -> bool {
        if self.tracked.contains(&node) {
            return false;
        }
        self.tracked.push(node);
        true
    }

    pub fn tracked(&self) -> &[NodeId] {
        &self.tracked
    }

    pub fn baseline(&self) -> usize {
        self.baseline
    }

    pub fn dynamic_count(&self) -> usize {
        self.tracked.len() - self.baseline
    }

    //--- Capture ----------------------------------------------------------

    /// Captures one node's opacity. No-op if already captured this cycle.
    pub fn capture(
        &mut self,
        node: NodeId,
        visuals: &dyn NodeVisuals,
    ) -> Result<CaptureOutcome, TransitionError> {
        if self.opacity.contains(node) {
            return Ok(CaptureOutcome::AlreadyCaptured);
        }

        if let Err(err) = self.claims.try_claim(node, self.owner) {
            warn!("Refusing to capture {}: already faded by another transition", node);
            return Err(err);
        }

        match self.opacity.capture(node, visuals) {
            Ok(outcome) => {
                if outcome == CaptureOutcome::CapturedZeroed {
                    error!("{} captured at zero opacity; a previous fade was never restored", node);
                }
                self.captured_log.push(node);
                Ok(outcome)
            }
            Err(err) => {
                warn!("Failed to capture {}: {}", node, err);
                self.claims.release(node, self.owner);
                Err(err)
            }
        }
    }

    /// Captures every tracked node, skipping the ones that fail.
    pub fn capture_tracked(&mut self, visuals: &dyn NodeVisuals) -> CaptureReport {
        let mut report = CaptureReport::default();
        let tracked = self.tracked.clone();

        for node in tracked {
            match self.capture(node, visuals) {
                Ok(CaptureOutcome::CapturedZeroed) => {
                    report.nodes.push(node);
                    report.faults.push(TransitionError::CapturedZeroed { node });
                }
                Ok(_) => report.nodes.push(node),
                Err(err) => report.faults.push(err),
            }
        }

        report
    }

    pub fn original(&self, node: NodeId) -> Option<&OpacityMap> {
        self.opacity.original(node)
    }

    pub fn is_captured(&self, node: NodeId) -> bool {
        self.opacity.contains(node)
    }

    //--- Restore ----------------------------------------------------------

    /// Restores one node and forgets its snapshot.
    ///
    /// A restore without a capture is reported, never panics.
    pub fn restore(
        &mut self,
        node: NodeId,
        visuals: &mut dyn NodeVisuals,
    ) -> Result<(), TransitionError> {
        let result = self.opacity.restore(node, visuals);
        match &result {
            Err(TransitionError::DoubleRestore { .. }) => {
                warn!("{} restored without a capture this cycle", node);
            }
            _ => {
                self.restored_log.push(node);
                self.claims.release(node, self.owner);
            }
        }
        result
    }

    /// Restores every captured node, in capture order.
    pub fn restore_all(&mut self, visuals: &mut dyn NodeVisuals) -> Vec<TransitionError> {
        let pending: Vec<NodeId> = self
            .captured_log
            .iter()
            .copied()
            .filter(|&node| self.opacity.contains(node))
            .collect();

        pending
            .into_iter()
            .filter_map(|node| self.restore(node, visuals).err())
            .collect()
    }

    //--- Layers -----------------------------------------------------------

    /// Moves a node to `layer`, remembering where it came from.
    pub fn reassign_layer(
        &mut self,
        node: NodeId,
        layer: RenderLayer,
        visuals: &mut dyn NodeVisuals,
    ) -> Result<(), TransitionError> {
        self.layers.reassign(node, layer, visuals)
    }

    pub fn restore_layers(&mut self, visuals: &mut dyn NodeVisuals) -> usize {
        self.layers.restore_all(visuals)
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    //--- Cycle Management -------------------------------------------------

    /// Drops every dynamic node, leaving the static baseline intact.
    ///
    /// Returns the number of nodes trimmed.
    pub fn trim_to_baseline(&mut self) -> usize {
        let dynamic: Vec<NodeId> = self.tracked.drain(self.baseline..).collect();
        for &node in &dynamic {
            if self.opacity.discard(node).is_some() {
                warn!("Trimming {} while its snapshot is still held", node);
            }
            self.claims.release(node, self.owner);
        }
        if !dynamic.is_empty() {
            debug!("Trimmed {} dynamic nodes back to baseline {}", dynamic.len(), self.baseline);
        }
        dynamic.len()
    }

    /// Clears everything for a wholly fresh cycle.
    pub fn reset(&mut self) {
        self.tracked.clear();
        self.baseline = 0;
        self.opacity.clear();
        self.layers.clear();
        self.captured_log.clear();
        self.restored_log.clear();
        self.claims.release_all(self.owner);
    }

    /// No opacity or layer snapshot is outstanding.
    pub fn is_clean(&self) -> bool {
        self.opacity.is_empty() && self.layers.is_empty()
    }

    /// Nodes captured this cycle, in order.
    pub fn captured_log(&self) -> &[NodeId] {
        &self.captured_log
    }

    /// Nodes restored this cycle, in order.
    pub fn restored_log(&self) -> &[NodeId] {
        &self.restored_log
    }
}

impl Drop for ResourceSnapshotStore {
    fn drop(&mut self) {
        self.claims.release_all(self.owner);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
