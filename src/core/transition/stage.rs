//=========================================================================
// Stages
//=========================================================================
//
// Observable stages of a transition and the finer-grained phases the
// driver steps through.
//
// Stage graph:
//   Idle → Armed → PreEffects → Fading → Animating → Activated
//        → PostEffects → AwaitingSubsceneEnd → ReverseFading
//        → ReverseAnimating → Idle
//
// Each stage is made of one or more phases. A phase runs its entry once
// and then suspends on a `Wait`; the driver enters at most one phase per
// tick.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

//=== Internal Dependencies ===============================================

use crate::core::effects::Barrier;
use crate::core::node::NodeId;
use crate::core::time::Seconds;

//=== Stage ===============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Stage {
    #[default]
    Idle,
    Armed,
    PreEffects,
    Fading,
    Animating,
    Activated,
    PostEffects,
    AwaitingSubsceneEnd,
    ReverseFading,
    ReverseAnimating,
}

impl Stage {
    /// Stages of the return pipeline.
    pub fn is_reverse(self) -> bool {
        matches!(self, Self::ReverseFading | Self::ReverseAnimating)
    }

    /// The sub-scene has been activated and not yet left.
    pub fn is_subscene_active(self) -> bool {
        matches!(
            self,
            Self::Activated | Self::PostEffects | Self::AwaitingSubsceneEnd
        )
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Armed => "armed",
            Self::PreEffects => "pre-effects",
            Self::Fading => "fading",
            Self::Animating => "animating",
            Self::Activated => "activated",
            Self::PostEffects => "post-effects",
            Self::AwaitingSubsceneEnd => "awaiting sub-scene end",
            Self::ReverseFading => "reverse fading",
            Self::ReverseAnimating => "reverse animating",
        };
        f.write_str(name)
    }
}

//=== Phase ===============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    Armed,
    PreSettle,
    PreAcquired,
    PreDelay,
    FadeStart,
    AnimateStart,
    AnimatePlay,
    AnimateGate,
    Activate,
    ContinueStart,
    AwaitEnd,
    ReverseFadeStart,
    ReverseAnimateStart,
    ReverseGate,
    ReverseFinish,
}

impl Phase {
    pub(crate) fn stage(self) -> Stage {
        match self {
            Self::Armed => Stage::Armed,
            Self::PreSettle | Self::PreAcquired | Self::PreDelay => Stage::PreEffects,
            Self::FadeStart => Stage::Fading,
            Self::AnimateStart | Self::AnimatePlay | Self::AnimateGate => Stage::Animating,
            Self::Activate => Stage::Activated,
            Self::ContinueStart => Stage::PostEffects,
            Self::AwaitEnd => Stage::AwaitingSubsceneEnd,
            Self::ReverseFadeStart => Stage::ReverseFading,
            Self::ReverseAnimateStart | Self::ReverseGate | Self::ReverseFinish => {
                Stage::ReverseAnimating
            }
        }
    }

    /// Phase entered once this one's wait is over.
    ///
    /// `AwaitEnd` has no fixed successor: the end signal decides between
    /// the reverse pipeline and an instant return.
    pub(crate) fn next(self) -> Option<Phase> {
        match self {
            Self::Armed => Some(Self::PreSettle),
            Self::PreSettle => Some(Self::PreAcquired),
            Self::PreAcquired => Some(Self::PreDelay),
            Self::PreDelay => Some(Self::FadeStart),
            Self::FadeStart => Some(Self::AnimateStart),
            Self::AnimateStart => Some(Self::AnimatePlay),
            Self::AnimatePlay => Some(Self::AnimateGate),
            Self::AnimateGate => Some(Self::Activate),
            Self::Activate => Some(Self::ContinueStart),
            Self::ContinueStart => Some(Self::AwaitEnd),
            Self::AwaitEnd => None,
            Self::ReverseFadeStart => Some(Self::ReverseAnimateStart),
            Self::ReverseAnimateStart => Some(Self::ReverseGate),
            Self::ReverseGate => Some(Self::ReverseFinish),
            Self::ReverseFinish => None,
        }
    }
}

//=== Wait ================================================================

/// Suspension point of the current phase.
#[derive(Debug, Clone, Default)]
pub(crate) enum Wait {
    /// Proceed on the next tick.
    #[default]
    None,
    /// A named duration.
    Until(Seconds),
    /// Reel-like nodes coming to rest, bounded by a deadline.
    Settle { nodes: Vec<NodeId>, deadline: Seconds },
    /// Every handle in the barrier finished.
    Barrier(Barrier),
    /// The sub-scene end signal.
    SubsceneEnd,
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_phases_walk_every_stage_in_order() {
        let mut phase = Phase::Armed;
        let mut stages = vec![phase.stage()];
        while let Some(next) = phase.next() {
            phase = next;
            if stages.last() != Some(&phase.stage()) {
                stages.push(phase.stage());
            }
        }
        assert_eq!(
            stages,
            [
                Stage::Armed,
                Stage::PreEffects,
                Stage::Fading,
                Stage::Animating,
                Stage::Activated,
                Stage::PostEffects,
                Stage::AwaitingSubsceneEnd,
            ]
        );
    }

    #[test]
    fn reverse_phases_end_the_pipeline() {
        let mut phase = Phase::ReverseFadeStart;
        while let Some(next) = phase.next() {
            phase = next;
        }
        assert_eq!(phase, Phase::ReverseFinish);
        assert!(phase.stage().is_reverse());
    }

    #[test]
    fn display_is_human_readable() {
        assert_eq!(Stage::AwaitingSubsceneEnd.to_string(), "awaiting sub-scene end");
        assert_eq!(Stage::default(), Stage::Idle);
    }
}
