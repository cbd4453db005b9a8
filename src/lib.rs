//=========================================================================
// Aetheric Transitions Library Root
//
// Staged, reversible transitions from a host scene into a sub-scene.
//
// Responsibilities:
// - Expose the transition core (`core`) for hosts that drive it directly
// - Provide the fixed-rate `TransitionEngine` for hosts that prefer to
//   feed it events over a channel
//
// Typical usage:
// ```no_run
// use aetheric_transitions::prelude::*;
//
// # fn adapters() -> TransitionContext { unimplemented!() }
// let json = std::fs::read_to_string("demos/gifting_transition.json").unwrap();
// let config = TransitionConfig::from_json(&json).unwrap();
// let controller = TransitionController::new(config, adapters());
//
// let engine = TransitionEngineBuilder::new().build(controller);
// let host = engine.sender();
// let handle = engine.spawn();
// host.send(SequencerEvent::Shutdown).unwrap();
// handle.join().unwrap();
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` contains every sequencing subsystem and the adapter traits.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `engine` defines the fixed-rate runtime around a controller.
//
mod engine;

//--- Public Exports ------------------------------------------------------

pub use engine::{TransitionEngine, TransitionEngineBuilder};
