//=========================================================================
// Event Collector
//=========================================================================
//
// Host-to-sequencer event collector with bounded draining and shutdown
// detection.
//
// Architecture:
//   Receiver<SequencerEvent> → collect_frame() → outcomes / end signals
//                                              → TickControl
//
// Bounded draining keeps one flooded frame from starving the tick.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Receiver, TryRecvError};
use log::warn;

//=== Internal Dependencies ===============================================

use crate::core::trigger::OutcomeSnapshot;

//=== SequencerEvent ======================================================

/// Events the host sends to a running `TransitionEngine`.
#[derive(Debug, Clone)]
pub enum SequencerEvent {
    /// A new outcome to evaluate against the trigger policy.
    Outcome(OutcomeSnapshot),

    /// The sub-scene has ended.
    SubsceneEnded,

    /// Stop the engine after this frame.
    Shutdown,
}

//=== TickControl =========================================================

/// Update loop control signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    Continue,
    Exit,
}

//=== EventCollector ======================================================

/// Collects host events with bounded draining and batch extraction.
pub(crate) struct EventCollector {
    receiver: Receiver<SequencerEvent>,
    outcomes: Vec<OutcomeSnapshot>,
    subscene_ended: u32,
}

impl EventCollector {
    pub(crate) const MAX_EVENTS_PER_FRAME: usize = 100;

    pub(crate) fn new(receiver: Receiver<SequencerEvent>) -> Self {
        Self {
            receiver,
            outcomes: Vec::with_capacity(4),
            subscene_ended: 0,
        }
    }

    /// Collects pending events for one frame.
    pub(crate) fn collect_frame(&mut self) -> TickControl {
        self.outcomes.clear();
        self.subscene_ended = 0;
        let mut drained = 0;

        while drained < Self::MAX_EVENTS_PER_FRAME {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.handle_event(event) == TickControl::Exit {
                        return TickControl::Exit;
                    }
                    drained += 1;
                }
                Err(TryRecvError::Disconnected) => return TickControl::Exit,
                Err(TryRecvError::Empty) => break,
            }
        }

        if drained >= Self::MAX_EVENTS_PER_FRAME {
            warn!("Sequencer event backlog: drained {} events this frame", drained);
        }

        TickControl::Continue
    }

    /// Outcomes received this frame, in arrival order.
    #[cfg(test)]
    pub(crate) fn outcomes(&self) -> &[OutcomeSnapshot] {
        &self.outcomes
    }

    /// Takes the collected outcomes, leaving an empty vec.
    pub(crate) fn take_outcomes(&mut self) -> Vec<OutcomeSnapshot> {
        std::mem::take(&mut self.outcomes)
    }

    /// Number of sub-scene end signals received this frame.
    pub(crate) fn subscene_ended(&self) -> u32 {
        self.subscene_ended
    }

    fn handle_event(&mut self, event: SequencerEvent) -> TickControl {
        match event {
            SequencerEvent::Outcome(outcome) => {
                self.outcomes.push(outcome);
                TickControl::Continue
            }
            SequencerEvent::SubsceneEnded => {
                self.subscene_ended += 1;
                TickControl::Continue
            }
            SequencerEvent::Shutdown => TickControl::Exit,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
