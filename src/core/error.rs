//=========================================================================
// Errors
//=========================================================================
//
// Error taxonomy for the transition core.
//
// Nothing here aborts a running transition. Every variant is logged where
// it is detected and recorded on the controller's fault list; the pipeline
// keeps advancing in a degraded but visible state.
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== Internal Dependencies ===============================================

use super::node::NodeId;

//=== TransitionError =====================================================

/// Non-fatal faults raised while sequencing a transition.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransitionError {
    /// A required adapter or asset is absent; the controller disables itself.
    #[error("misconfigured transition: {0}")]
    Misconfiguration(String),

    /// A node was restored without a matching capture.
    #[error("{node} restored without a prior capture")]
    DoubleRestore { node: NodeId },

    /// A node was captured while already fully transparent, which means an
    /// earlier fade was never restored.
    #[error("{node} captured while already zeroed; a previous fade was not restored")]
    CapturedZeroed { node: NodeId },

    /// Snapshot and live channel lists disagree in length.
    #[error("{node}: channel index {index} out of range (expected {expected} channels)")]
    ListSizeMismatch {
        node: NodeId,
        index: usize,
        expected: usize,
    },

    /// A node is already captured by another snapshot owner.
    #[error("{node} is already captured by another transition")]
    NodeClaimed { node: NodeId },

    /// The visual adapter does not know the node.
    #[error("{node} is unknown to the visual adapter")]
    UnknownNode { node: NodeId },

    /// An external adapter could not service a call.
    #[error("adapter not ready: {0}")]
    AdapterNotReady(String),
}

impl TransitionError {
    pub fn misconfiguration(msg: impl Into<String>) -> Self {
        Self::Misconfiguration(msg.into())
    }

    /// Returns `true` for faults that disable the controller.
    pub fn is_fatal_to_controller(&self) -> bool {
        matches!(self, Self::Misconfiguration(_))
    }
}

//=== ConfigError =========================================================

/// Errors raised while loading or validating authored configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
