//=========================================================================
// Audio
//=========================================================================
//
// Transition audio: authored cue sets and the delayed cue sequencer.
//
//=========================================================================

//=== Module Declarations =================================================

mod cues;
mod sequencer;

//=== Public API ==========================================================

pub use cues::{AudioCueSet, CueSpec, TrackSwitchSpec};
pub use sequencer::AudioCueSequencer;
