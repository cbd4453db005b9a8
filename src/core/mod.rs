//=========================================================================
// Transition Core
//
// Every subsystem the transition runtime is built from.
//
// Responsibilities:
// - Decide when an outcome starts a transition (`trigger`)
// - Run timed visual effects and the barriers that gate them (`effects`)
// - Sequence delayed audio cues on their own clock (`audio`)
// - Capture and restore node state borrowed by a transition (`snapshot`)
// - Drive the staged forward and reverse pipelines (`transition`)
//
// Notes:
// The core is single-threaded and cooperative. It never reads the wall
// clock or blocks; the host (or `TransitionEngine`) advances it with
// `TransitionController::tick`. All engine access crosses the adapter
// traits in `bridge`.
//
//=========================================================================

//=== Foundations =========================================================

pub mod error;
pub mod node;
pub mod time;

//=== Host Integration ====================================================

pub mod bridge;
pub mod context;
pub mod scene;

//=== Sequencing ==========================================================

pub mod audio;
pub mod config;
pub mod effects;
pub mod snapshot;
pub mod transition;
pub mod trigger;
