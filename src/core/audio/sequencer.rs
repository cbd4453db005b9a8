//=========================================================================
// Audio Cue Sequencer
//=========================================================================
//
// Delayed audio cues on their own clock.
//
// Cues are never ordered against effect barriers: scheduling returns
// immediately and due cues fire on the next tick regardless of what the
// pipeline is waiting on. A key the audio adapter cannot resolve is a
// silent no-op, since not every build defines every cue.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, trace};

//=== Internal Dependencies ===============================================

use super::cues::{CueSpec, TrackSwitchSpec};
use crate::core::bridge::{AudioAdapter, TrackSwitch};
use crate::core::time::{reached, FrameClock, Seconds};

//=== Scheduled Actions ===================================================

#[derive(Debug, Clone, PartialEq)]
enum AudioAction {
    Play(String),
    Switch(String, TrackSwitch),
}

#[derive(Debug, Clone)]
struct Pending {
    due: Seconds,
    order: u64,
    action: AudioAction,
}

//=== AudioCueSequencer ===================================================

#[derive(Debug, Default)]
pub struct AudioCueSequencer {
    clock: FrameClock,
    pending: Vec<Pending>,
    next_order: u64,
}

impl AudioCueSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `key` to play `delay` seconds from now.
    ///
    /// Returns `false` for an empty key, which is ignored.
    pub fn schedule(&mut self, key: &str, delay: Seconds) -> bool {
        self.push(key, delay, AudioAction::Play)
    }

    /// Schedules a background track switch.
    pub fn schedule_track_switch(&mut self, key: &str, mode: TrackSwitch, delay: Seconds) -> bool {
        self.push(key, delay, |key| AudioAction::Switch(key, mode))
    }

    pub fn schedule_cue(&mut self, cue: &CueSpec) -> bool {
        self.schedule(&cue.key, cue.delay)
    }

    pub fn schedule_switch(&mut self, switch: &TrackSwitchSpec) -> bool {
        self.schedule_track_switch(&switch.key, switch.mode, switch.delay)
    }

    fn push(&mut self, key: &str, delay: Seconds, action: impl FnOnce(String) -> AudioAction) -> bool {
        if key.is_empty() {
            debug!("Skipping audio cue with empty key");
            return false;
        }
        self.next_order += 1;
        self.pending.push(Pending {
            due: self.clock.now() + delay.max(0.0),
            order: self.next_order,
            action: action(key.to_owned()),
        });
        true
    }

    /// Advances the sequencer clock and fires every due action.
    ///
    /// Returns the number of actions that reached the adapter.
    pub fn tick(&mut self, dt: Seconds, audio: &mut dyn AudioAdapter) -> usize {
        let now = self.clock.advance(dt);

        let (mut due, waiting): (Vec<_>, Vec<_>) = self
            .pending
            .drain(..)
            .partition(|pending| reached(now, pending.due));
        self.pending = waiting;

        due.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.order.cmp(&b.order)));

        let mut fired = 0;
        for pending in due {
            match pending.action {
                AudioAction::Play(key) => {
                    if audio.can_resolve(&key) {
                        trace!("Audio cue '{}' at {:.3}s", key, now);
                        audio.play(&key);
                        fired += 1;
                    } else {
                        debug!("Audio cue '{}' is not mapped in this build", key);
                    }
                }
                AudioAction::Switch(key, mode) => {
                    if audio.can_resolve(&key) {
                        trace!("Background track '{}' ({:?}) at {:.3}s", key, mode, now);
                        audio.switch_track(&key, mode);
                        fired += 1;
                    } else {
                        debug!("Background track '{}' is not mapped in this build", key);
                    }
                }
            }
        }
        fired
    }

    /// Drops every pending action.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn now(&self) -> Seconds {
        self.clock.now()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
