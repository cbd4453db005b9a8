//=========================================================================
// Trigger Policy
//=========================================================================
//
// Decides whether a transition fires for a given outcome.
//
// Architecture:
//   OutcomeContext ─┐
//   PortalCatalog  ─┼─► should_fire(config) ─► bool
//   TriggerConfig  ─┘
//
//=========================================================================

//=== Module Declarations =================================================

mod evaluator;
mod outcome;
mod portal;

//=== Public API ==========================================================

pub use evaluator::{should_fire, OutcomeTriggerEvaluator, TriggerConfig, TriggerKind};
pub use outcome::{
    FeatureCategory, OutcomeContext, OutcomeSnapshot, PendingFeature, PendingFeatures,
};
pub use portal::StaticPortalCatalog;
