//=========================================================================
// Lifecycle Hooks
//=========================================================================
//
// Specialization points of a transition, supplied by composition.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::node::NodeId;
use crate::core::snapshot::ResourceSnapshotStore;
use crate::core::time::Seconds;

//=== HookContext =========================================================

/// What `before_transition` may change about the session about to run.
pub struct HookContext<'a> {
    snapshots: &'a mut ResourceSnapshotStore,
    extra_delay: &'a mut Seconds,
    now: Seconds,
}

impl<'a> HookContext<'a> {
    pub(crate) fn new(
        snapshots: &'a mut ResourceSnapshotStore,
        extra_delay: &'a mut Seconds,
        now: Seconds,
    ) -> Self {
        Self {
            snapshots,
            extra_delay,
            now,
        }
    }

    /// Adds a node faded for this transition only.
    ///
    /// It is trimmed from the tracked set once the session completes.
    pub fn add_fade_node(&mut self, node: NodeId) -> bool {
        self.snapshots.append_dynamic(node)
    }

    /// Extends the pre-effects wait.
    pub fn delay(&mut self, extra: Seconds) {
        *self.extra_delay += extra.max(0.0);
    }

    pub fn now(&self) -> Seconds {
        self.now
    }
}

//=== TransitionHooks =====================================================

pub trait TransitionHooks: Send {
    /// Runs when the transition leaves `Armed`.
    fn before_transition(&mut self, _ctx: &mut HookContext<'_>) {}

    /// Runs right after the sub-scene is created and shown.
    fn on_activated(&mut self) {}

    /// Runs once the reverse pipeline has restored everything.
    fn on_reverse_complete(&mut self) {}
}

/// Hooks that do nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl TransitionHooks for NoHooks {}

//=========================================================================
// Unit Tests
//=========================================================================
