//=========================================================================
// Effect Coordinator
//=========================================================================
//
// Starts effects without blocking and advances all of them once per tick.
//
// Lifecycle:
//   start(spec) → EffectHandle (pending)
//   tick()      → apply(t) every frame, finish() + complete(now) at the end
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, trace};

//=== Internal Dependencies ===============================================

use super::handle::{Barrier, EffectHandle};
use super::kinds::{Effect, EffectSpec};
use crate::core::bridge::NodeVisuals;
use crate::core::time::{reached, Seconds};

//=== Running =============================================================

#[derive(Debug)]
struct Running {
    handle: EffectHandle,
    effect: Box<dyn Effect>,
    elapsed: Seconds,
}

//=== EffectCoordinator ===================================================

#[derive(Debug, Default)]
pub struct EffectCoordinator {
    next_id: u64,
    running: Vec<Running>,
}

impl EffectCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts an effect. The first frame is applied on the next tick.
    pub fn start(&mut self, spec: EffectSpec) -> EffectHandle {
        self.next_id += 1;
        let handle = EffectHandle::pending(self.next_id);
        trace!("Effect #{} started ({:.3}s)", self.next_id, spec.duration());
        self.running.push(Running {
            handle: handle.clone(),
            effect: spec.into_effect(),
            elapsed: 0.0,
        });
        handle
    }

    pub fn barrier(&self, handles: &[EffectHandle]) -> Barrier {
        Barrier::new(handles.to_vec())
    }

    /// Advances every running effect by `dt`.
    ///
    /// Effects that reach their duration write their terminal value and
    /// complete with `now`. Returns the number completed this tick.
    pub fn tick(&mut self, now: Seconds, dt: Seconds, visuals: &mut dyn NodeVisuals) -> usize {
        let before = self.running.len();

        self.running.retain_mut(|running| {
            running.elapsed += dt.max(0.0);
            let duration = running.effect.duration();

            if duration <= 0.0 || reached(running.elapsed, duration) {
                running.effect.finish(visuals);
                running.handle.complete(now);
                trace!("Effect #{} finished at {:.3}s", running.handle.id(), now);
                false
            } else {
                running.effect.apply(running.elapsed / duration, visuals);
                true
            }
        });

        before - self.running.len()
    }

    /// Lands the given effects immediately at `now`, writing their terminal
    /// values. Handles that already finished are ignored. Returns the
    /// number landed.
    pub fn finish(
        &mut self,
        handles: &[EffectHandle],
        now: Seconds,
        visuals: &mut dyn NodeVisuals,
    ) -> usize {
        let before = self.running.len();

        self.running.retain_mut(|running| {
            let id = running.handle.id();
            if !handles.iter().any(|handle| handle.id() == id) {
                return true;
            }
            running.effect.finish(visuals);
            running.handle.complete(now);
            false
        });

        let landed = before - self.running.len();
        if landed > 0 {
            debug!("Landed {} running effects at {:.3}s", landed, now);
        }
        landed
    }

    pub fn running_count(&self) -> usize {
        self.running.len()
    }

    pub fn is_idle(&self) -> bool {
        self.running.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
