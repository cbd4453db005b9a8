//=========================================================================
// Transition Session
//=========================================================================
//
// Runtime state of one forward + reverse round trip.
//
// A session is created when a transition arms and dropped when it returns
// to idle. It exclusively owns its snapshot store; dropping the session
// releases every node it still claims.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::stage::{Phase, Stage, Wait};
use crate::core::effects::EffectHandle;
use crate::core::node::NodeId;
use crate::core::snapshot::ResourceSnapshotStore;
use crate::core::time::Seconds;

//=== ActivationReport ====================================================

/// Timestamps of the forward pipeline, in presentation seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ActivationReport {
    pub armed_at: Seconds,
    pub fade_started_at: Option<Seconds>,
    /// When the fade effect finished, if it ran.
    pub fade_finished_at: Option<Seconds>,
    /// When the early fade barrier released the animation.
    pub early_barrier_at: Option<Seconds>,
    pub animation_started_at: Option<Seconds>,
    /// Latest completion among the gating fade and slides.
    pub gate_completed_at: Option<Seconds>,
    pub activated_at: Option<Seconds>,
}

//=== SessionSummary ======================================================

/// What a finished session did to the snapshot store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSummary {
    pub id: u64,
    pub captured: Vec<NodeId>,
    pub restored: Vec<NodeId>,
    /// The reverse pipeline ran.
    pub reversed: bool,
    pub completed_at: Seconds,
}

//=== Gating Handles ======================================================

/// Effects activation must wait on.
#[derive(Debug, Clone)]
pub(crate) struct GateHandles {
    pub fade: EffectHandle,
    pub overlay: EffectHandle,
    pub panel: EffectHandle,
}

impl GateHandles {
    pub(crate) fn all(&self) -> Vec<EffectHandle> {
        vec![self.fade.clone(), self.overlay.clone(), self.panel.clone()]
    }
}

impl Default for GateHandles {
    fn default() -> Self {
        Self {
            fade: EffectHandle::skipped(),
            overlay: EffectHandle::skipped(),
            panel: EffectHandle::skipped(),
        }
    }
}

//=== TransitionSession ===================================================

#[derive(Debug)]
pub struct TransitionSession {
    id: u64,
    pub(crate) started: bool,
    pub(crate) came_from_subscene: bool,
    pub(crate) already_animated_reverse_once: bool,
    pub(crate) host_hidden: bool,
    pub(crate) continued: bool,
    pub(crate) end_signalled: bool,
    pub(crate) extra_delay: Seconds,
    pub(crate) phase: Phase,
    pub(crate) wait: Wait,
    pub(crate) gates: GateHandles,
    /// Forward effects nothing waits on; landed before the return path.
    pub(crate) detached: Vec<EffectHandle>,
    pub(crate) reverse: Vec<EffectHandle>,
    pub(crate) snapshots: ResourceSnapshotStore,
    pub(crate) report: ActivationReport,
}

impl TransitionSession {
    pub(crate) fn new(id: u64, snapshots: ResourceSnapshotStore, now: Seconds) -> Self {
        Self {
            id,
            started: true,
            came_from_subscene: false,
            already_animated_reverse_once: false,
            host_hidden: false,
            continued: false,
            end_signalled: false,
            extra_delay: 0.0,
            phase: Phase::Armed,
            wait: Wait::None,
            gates: GateHandles::default(),
            detached: Vec::new(),
            reverse: Vec::new(),
            snapshots,
            report: ActivationReport {
                armed_at: now,
                ..ActivationReport::default()
            },
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn stage(&self) -> Stage {
        self.phase.stage()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn came_from_subscene(&self) -> bool {
        self.came_from_subscene
    }

    pub fn already_animated_reverse_once(&self) -> bool {
        self.already_animated_reverse_once
    }

    pub fn snapshots(&self) -> &ResourceSnapshotStore {
        &self.snapshots
    }

    pub fn report(&self) -> &ActivationReport {
        &self.report
    }

    pub(crate) fn enter(&mut self, phase: Phase, wait: Wait) {
        self.phase = phase;
        self.wait = wait;
    }

    pub(crate) fn summary(&self, completed_at: Seconds) -> SessionSummary {
        SessionSummary {
            id: self.id,
            captured: self.snapshots.captured_log().to_vec(),
            restored: self.snapshots.restored_log().to_vec(),
            reversed: self.already_animated_reverse_once,
            completed_at,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
