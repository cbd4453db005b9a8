//=========================================================================
// Effects
//=========================================================================
//
// Time-based visual effects (fades, slides, viewport tweens, delayed
// toggles) run concurrently and observed through handles and barriers.
//
//=========================================================================

//=== Module Declarations =================================================

mod coordinator;
mod handle;
mod kinds;

//=== Public API ==========================================================

pub use coordinator::EffectCoordinator;
pub use handle::{all_finished, Barrier, Completion, EffectHandle};
pub use kinds::{EffectSpec, FadeSpec, FadeTrack, SlideSpec, ToggleSpec, ViewportSpec};
