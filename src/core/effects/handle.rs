//=========================================================================
// Effect Handles & Barriers
//=========================================================================
//
// An `EffectHandle` is the awaitable side of one running effect; a
// `Barrier` is satisfied once every handle it holds has finished.
//
// Handles for effects that never start (a skipped optional slide, say)
// are created already finished, so barriers never need to special-case
// optional work.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::{Arc, OnceLock};

//=== Internal Dependencies ===============================================

use crate::core::time::Seconds;

//=== Completion ==========================================================

/// How a handle finished.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Completion {
    /// The effect was never started.
    Skipped,
    /// The effect ran and finished at this presentation time.
    At(Seconds),
}

//=== EffectHandle ========================================================

#[derive(Debug)]
struct HandleState {
    id: u64,
    completion: OnceLock<Completion>,
}

/// Observable completion of one effect.
#[derive(Debug, Clone)]
pub struct EffectHandle {
    state: Arc<HandleState>,
}

impl EffectHandle {
    pub(crate) fn pending(id: u64) -> Self {
        Self {
            state: Arc::new(HandleState {
                id,
                completion: OnceLock::new(),
            }),
        }
    }

    /// A handle that is already finished.
    pub fn skipped() -> Self {
        let handle = Self::pending(0);
        let _ = handle.state.completion.set(Completion::Skipped);
        handle
    }

    /// Identifier assigned by the coordinator (`0` for skipped handles).
    pub fn id(&self) -> u64 {
        self.state.id
    }

    pub fn is_finished(&self) -> bool {
        self.state.completion.get().is_some()
    }

    pub fn completion(&self) -> Option<Completion> {
        self.state.completion.get().copied()
    }

    /// Finish time of an effect that actually ran.
    pub fn finished_at(&self) -> Option<Seconds> {
        match self.completion() {
            Some(Completion::At(at)) => Some(at),
            _ => None,
        }
    }

    /// Marks the handle finished. Only the first call has any effect.
    pub(crate) fn complete(&self, at: Seconds) -> bool {
        self.state.completion.set(Completion::At(at)).is_ok()
    }
}

/// Returns `true` when every handle has finished.
pub fn all_finished(handles: &[EffectHandle]) -> bool {
    handles.iter().all(EffectHandle::is_finished)
}

//=== Barrier =============================================================

/// Synchronization point over a set of effects.
#[derive(Debug, Clone, Default)]
pub struct Barrier {
    handles: Vec<EffectHandle>,
}

impl Barrier {
    pub fn new(handles: Vec<EffectHandle>) -> Self {
        Self { handles }
    }

    pub fn push(&mut self, handle: EffectHandle) {
        self.handles.push(handle);
    }

    pub fn is_satisfied(&self) -> bool {
        all_finished(&self.handles)
    }

    /// Latest finish time among handles that ran.
    ///
    /// `None` while unsatisfied. A barrier holding only skipped handles
    /// completes at `0.0`.
    pub fn completed_at(&self) -> Option<Seconds> {
        if !self.is_satisfied() {
            return None;
        }
        Some(
            self.handles
                .iter()
                .filter_map(EffectHandle::finished_at)
                .fold(0.0, f32::max),
        )
    }

    pub fn handles(&self) -> &[EffectHandle] {
        &self.handles
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
