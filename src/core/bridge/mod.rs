//=========================================================================
// Bridge
//=========================================================================
//
// Bridges the host presentation (renderer, animator, audio, scene stack)
// with the transition core.
//
// This module defines the contract between host implementations and the
// core, so backends can be swapped without touching sequencing code.
//
// Components:
// - `interface`: adapter traits and the sub-scene end signal
// - `event_collector`: engine-side collection of host events
// - `headless`: in-memory adapters for dry runs and tests
//
//=========================================================================

//=== Module Declarations =================================================

pub(crate) mod event_collector;
pub mod headless;
pub mod interface;

//=== Public API ==========================================================

pub(crate) use event_collector::EventCollector;
pub use event_collector::{SequencerEvent, TickControl};
pub use interface::{
    AudioAdapter, ClipAnimator, NodeVisuals, PortalCatalog, SceneActivationGateway,
    SubsceneEnded, SubsceneSignal, TrackSwitch,
};
