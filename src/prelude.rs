//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use aetheric_transitions::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine runtime
pub use crate::engine::{TransitionEngine, TransitionEngineBuilder};

// Transition control
pub use crate::core::transition::{
    ActivationReport, HookContext, SessionSummary, Stage, TransitionController,
    TransitionControllerBuilder, TransitionHooks, TriggerResponse,
};

// Configuration
pub use crate::core::config::TransitionConfig;
pub use crate::core::context::TransitionContext;
pub use crate::core::trigger::{FeatureCategory, OutcomeContext, OutcomeSnapshot, TriggerConfig};

// Host adapters
pub use crate::core::bridge::{
    AudioAdapter, ClipAnimator, NodeVisuals, PortalCatalog, SceneActivationGateway,
    SequencerEvent, SubsceneSignal, TickControl,
};

// Values and errors
pub use crate::core::error::{ConfigError, TransitionError};
pub use crate::core::node::NodeId;
pub use crate::core::time::Seconds;

// Scene system
pub use crate::core::scene::{Scene, SceneKey, SceneManager, SceneStackGateway};
