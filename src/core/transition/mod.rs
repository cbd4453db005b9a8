//=========================================================================
// Transitions
//=========================================================================
//
// The staged, reversible scene → sub-scene transition.
//
// Architecture:
//   TransitionController (one per configured transition)
//     ├─ TransitionSession (at most one; owns the snapshot store)
//     ├─ EffectCoordinator (parallel effects + barriers)
//     ├─ AudioCueSequencer (delayed cues)
//     └─ TransitionHooks   (specialization by composition)
//
//=========================================================================

//=== Module Declarations =================================================

mod controller;
mod hooks;
mod session;
mod stage;

//=== Public API ==========================================================

pub use controller::{TransitionController, TransitionControllerBuilder, TriggerResponse};
pub use hooks::{HookContext, NoHooks, TransitionHooks};
pub use session::{ActivationReport, SessionSummary, TransitionSession};
pub use stage::Stage;
