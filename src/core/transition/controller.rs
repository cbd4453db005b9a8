//=========================================================================
// Transition Controller
//=========================================================================
//
// Orchestrates one configured transition: trigger evaluation, the forward
// pipeline, sub-scene activation and the mirrored reverse pipeline.
//
// Architecture:
//   on_outcome() ─► OutcomeTriggerEvaluator ─► arm TransitionSession
//   tick(dt):
//     1. advance the clock
//     2. EffectCoordinator::tick     (fades, slides, tweens)
//     3. AudioCueSequencer::tick     (delayed cues, own clock)
//     4. drain sub-scene end signals
//     5. enter at most one phase     (driver)
//
// Nothing here blocks. Suspension is expressed as a `Wait` on the session
// and re-checked every tick.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;

use crossbeam_channel::{bounded, Receiver, Sender};
use log::{debug, error, info, warn};

//=== Internal Dependencies ===============================================

use super::hooks::{NoHooks, TransitionHooks};
use super::session::{ActivationReport, SessionSummary, TransitionSession};
use super::stage::{Phase, Stage, Wait};
use crate::core::audio::AudioCueSequencer;
use crate::core::bridge::{SubsceneEnded, SubsceneSignal};
use crate::core::config::{SlideTarget, TransitionConfig};
use crate::core::context::TransitionContext;
use crate::core::effects::{EffectCoordinator, EffectHandle, EffectSpec, SlideSpec};
use crate::core::error::TransitionError;
use crate::core::node::NodeId;
use crate::core::snapshot::ResourceSnapshotStore;
use crate::core::time::{reached, FrameClock, Seconds};
use crate::core::trigger::{OutcomeContext, OutcomeTriggerEvaluator};

mod forward;
mod reverse;

/// Buffered end signals; more than this in one frame are redundant.
const SIGNAL_CAPACITY: usize = 8;

//=== TriggerResponse =====================================================

/// What `on_outcome` did with an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerResponse {
    /// A new session was armed.
    Armed,
    /// A queued-bonus re-trigger was accepted; the next session arms once
    /// the current one returns to idle.
    Queued,
    /// The trigger policy did not match.
    NotFired,
    /// A session is already running.
    Busy,
    /// A re-trigger was already queued; this one was dropped.
    Dropped,
    /// The controller is disabled by misconfiguration.
    Disabled,
}

impl TriggerResponse {
    pub fn is_accepted(self) -> bool {
        matches!(self, Self::Armed | Self::Queued)
    }
}

//=== TransitionControllerBuilder =========================================

pub struct TransitionControllerBuilder {
    config: TransitionConfig,
    context: TransitionContext,
    hooks: Box<dyn TransitionHooks>,
}

impl TransitionControllerBuilder {
    pub fn new(config: TransitionConfig, context: TransitionContext) -> Self {
        Self {
            config,
            context,
            hooks: Box::new(NoHooks),
        }
    }

    pub fn with_hooks(mut self, hooks: impl TransitionHooks + 'static) -> Self {
        self.hooks = Box::new(hooks);
        self
    }

    pub fn build(self) -> TransitionController {
        let (signal_tx, signal_rx) = bounded(SIGNAL_CAPACITY);
        let mut controller = TransitionController {
            evaluator: OutcomeTriggerEvaluator::new(self.config.trigger.clone()),
            config: Arc::new(self.config),
            context: self.context,
            hooks: self.hooks,
            effects: EffectCoordinator::new(),
            audio: AudioCueSequencer::new(),
            clock: FrameClock::new(),
            session: None,
            signal_tx,
            signal_rx,
            pending_rearm: false,
            disabled: false,
            faults: Vec::new(),
            last_report: None,
            last_summary: None,
            next_session_id: 0,
            sessions_armed: 0,
        };

        if let Err(err) = controller.check_configuration() {
            error!("Transition controller disabled: {}", err);
            controller.disabled = true;
            controller.faults.push(err);
        }
        controller
    }
}

//=== TransitionController ================================================

pub struct TransitionController {
    config: Arc<TransitionConfig>,
    evaluator: OutcomeTriggerEvaluator,
    context: TransitionContext,
    hooks: Box<dyn TransitionHooks>,
    effects: EffectCoordinator,
    audio: AudioCueSequencer,
    clock: FrameClock,
    session: Option<TransitionSession>,
    signal_tx: Sender<SubsceneEnded>,
    signal_rx: Receiver<SubsceneEnded>,
    pending_rearm: bool,
    disabled: bool,
    faults: Vec<TransitionError>,
    last_report: Option<ActivationReport>,
    last_summary: Option<SessionSummary>,
    next_session_id: u64,
    sessions_armed: u64,
}

impl TransitionController {
    //--- Construction -----------------------------------------------------

    pub fn new(config: TransitionConfig, context: TransitionContext) -> Self {
        TransitionControllerBuilder::new(config, context).build()
    }

    pub fn builder(config: TransitionConfig, context: TransitionContext) -> TransitionControllerBuilder {
        TransitionControllerBuilder::new(config, context)
    }

    fn check_configuration(&self) -> Result<(), TransitionError> {
        self.config
            .validate()
            .map_err(|err| TransitionError::misconfiguration(err.to_string()))?;

        if let Some(clip) = &self.config.clip {
            if self.context.animator.is_none() {
                return Err(TransitionError::misconfiguration(format!(
                    "clip '{}' is configured but no animator was provided",
                    clip.name
                )));
            }
        }
        Ok(())
    }

    //--- Triggering -------------------------------------------------------

    /// Evaluates an outcome and arms a session when the trigger matches.
    pub fn on_outcome(&mut self, outcome: &dyn OutcomeContext) -> TriggerResponse {
        if self.disabled {
            debug!("Ignoring outcome: controller is disabled");
            return TriggerResponse::Disabled;
        }
        if !self
            .evaluator
            .should_fire(outcome, self.context.portal.as_ref())
        {
            return TriggerResponse::NotFired;
        }

        let Some(session) = self.session.as_mut() else {
            self.arm();
            return TriggerResponse::Armed;
        };

        if !outcome.has_queued_bonus() {
            debug!(
                "Transition session #{} already running ({}); trigger ignored",
                session.id(),
                session.stage()
            );
            return TriggerResponse::Busy;
        }

        if self.pending_rearm {
            warn!(
                "Queued bonus re-trigger dropped: session #{} already has one queued",
                session.id()
            );
            return TriggerResponse::Dropped;
        }

        session.started = false;
        self.pending_rearm = true;
        info!(
            "Queued bonus re-trigger accepted; arming after session #{} completes",
            session.id()
        );
        TriggerResponse::Queued
    }

    fn arm(&mut self) {
        self.next_session_id += 1;
        let id = self.next_session_id;

        let mut snapshots = ResourceSnapshotStore::new(self.context.claims.clone());
        snapshots.set_baseline(self.fade_set());

        self.session = Some(TransitionSession::new(id, snapshots, self.clock.now()));
        self.sessions_armed += 1;
        info!("Transition session #{} armed at {:.3}s", id, self.clock.now());
    }

    /// Statically configured nodes the forward fade captures.
    fn fade_set(&self) -> Vec<NodeId> {
        let flags = &self.config.flags;
        let nodes = &self.config.nodes;

        let mut set = nodes.fade.clone();
        if flags.fade_symbols {
            set.extend(&nodes.symbols);
        }
        if flags.fade_wings {
            set.extend(nodes.wings.iter().map(|wing| wing.node));
        }
        if flags.fade_top_overlay {
            set.extend(nodes.top_overlay.map(|overlay| overlay.node));
        }
        if flags.fade_side_panel {
            set.extend(nodes.side_panel.map(|panel| panel.node));
        }
        set
    }

    //--- Update -----------------------------------------------------------

    /// Advances the transition by `dt` seconds and returns the new stage.
    pub fn tick(&mut self, dt: Seconds) -> Stage {
        let now = self.clock.advance(dt);
        self.effects.tick(now, dt, self.context.visuals.as_mut());
        self.audio.tick(dt, self.context.audio.as_mut());
        self.drain_signals();
        self.advance(now);
        self.stage()
    }

    /// Latches end signals addressed to the running session. Signals from
    /// an earlier session are dropped.
    fn drain_signals(&mut self) {
        let current = self.session.as_ref().map(TransitionSession::id);
        let mut matched = false;
        while let Ok(SubsceneEnded { session }) = self.signal_rx.try_recv() {
            if Some(session) == current {
                matched = true;
            } else {
                debug!("Sub-scene end from stale session #{} ignored", session);
            }
        }
        if matched {
            self.notify_subscene_ended();
        }
    }

    /// Records that the sub-scene has ended.
    ///
    /// Takes effect once the session reaches `AwaitingSubsceneEnd`; signals
    /// after the session has left the sub-scene are ignored.
    pub fn notify_subscene_ended(&mut self) {
        match self.session.as_mut() {
            Some(session) if !session.came_from_subscene => {
                session.end_signalled = true;
            }
            Some(session) => {
                debug!(
                    "Sub-scene end ignored: session #{} already returned",
                    session.id()
                );
            }
            None => debug!("Sub-scene end ignored: no transition running"),
        }
    }

    //--- Driver -----------------------------------------------------------

    fn advance(&mut self, now: Seconds) {
        let Some(mut session) = self.session.take() else {
            return;
        };

        let running = if self.wait_satisfied(&session, now) {
            self.step(&mut session, now)
        } else {
            true
        };

        if running {
            self.session = Some(session);
        } else {
            self.complete(session, now);
        }
    }

    fn wait_satisfied(&self, session: &TransitionSession, now: Seconds) -> bool {
        match &session.wait {
            Wait::None => true,
            Wait::Until(deadline) => reached(now, *deadline),
            Wait::Settle { nodes, deadline } => {
                let visuals = self.context.visuals.as_ref();
                if nodes.iter().all(|&node| visuals.is_settled(node)) {
                    true
                } else if reached(now, *deadline) {
                    warn!(
                        "Session #{}: nodes still moving after {:.2}s settle timeout; continuing",
                        session.id(),
                        self.config.timings.settle_timeout
                    );
                    true
                } else {
                    false
                }
            }
            Wait::Barrier(barrier) => barrier.is_satisfied(),
            Wait::SubsceneEnd => session.end_signalled,
        }
    }

    /// Enters the next phase. Returns `false` once the session is over.
    fn step(&mut self, session: &mut TransitionSession, now: Seconds) -> bool {
        if session.phase == Phase::AwaitEnd {
            return self.on_subscene_end(session, now);
        }
        match session.phase.next() {
            Some(next) => {
                self.enter(session, next, now);
                true
            }
            None => false,
        }
    }

    fn enter(&mut self, session: &mut TransitionSession, phase: Phase, now: Seconds) {
        if phase.stage() != session.stage() {
            debug!(
                "Session #{}: {} → {} at {:.3}s",
                session.id(),
                session.stage(),
                phase.stage(),
                now
            );
        }

        let wait = match phase {
            Phase::Armed => Wait::None,
            Phase::PreSettle => self.enter_pre_settle(session, now),
            Phase::PreAcquired => self.enter_pre_acquired(now),
            Phase::PreDelay => Wait::Until(now + self.config.timings.pre_delay + session.extra_delay),
            Phase::FadeStart => self.enter_fade(session, now),
            Phase::AnimateStart => self.enter_animate(session),
            Phase::AnimatePlay => self.enter_animate_play(session, now),
            Phase::AnimateGate => self.enter_animate_gate(session),
            Phase::Activate => self.enter_activate(session, now),
            Phase::ContinueStart => self.enter_continue(session, now),
            Phase::AwaitEnd => self.enter_await_end(session),
            Phase::ReverseFadeStart => self.enter_reverse_fade(session),
            Phase::ReverseAnimateStart => self.enter_reverse_animate(now),
            Phase::ReverseGate => self.enter_reverse_gate(session),
            Phase::ReverseFinish => self.enter_reverse_finish(session),
        };
        session.enter(phase, wait);
    }

    fn on_subscene_end(&mut self, session: &mut TransitionSession, now: Seconds) -> bool {
        session.end_signalled = false;
        session.came_from_subscene = true;
        if session.host_hidden {
            self.context.gateway.hide_host_scene(false);
            session.host_hidden = false;
        }
        self.land_detached(session, now);

        if self.config.flags.has_reverse_transition && !session.already_animated_reverse_once {
            session.already_animated_reverse_once = true;
            self.enter(session, Phase::ReverseFadeStart, now);
            true
        } else {
            self.return_instantly(session);
            false
        }
    }

    fn complete(&mut self, session: TransitionSession, now: Seconds) {
        let summary = session.summary(now);
        info!(
            "Transition session #{} complete at {:.3}s ({} captured, {} restored)",
            summary.id,
            now,
            summary.captured.len(),
            summary.restored.len()
        );
        self.last_report = Some(session.report);
        self.last_summary = Some(summary);
        drop(session);

        if self.pending_rearm {
            self.pending_rearm = false;
            self.arm();
        }
    }

    //--- Shared Helpers ---------------------------------------------------

    fn record_faults(&mut self, faults: impl IntoIterator<Item = TransitionError>) {
        self.faults.extend(faults);
    }

    fn start_slide(&mut self, target: SlideTarget, hide: bool) -> EffectHandle {
        let (from, to) = if hide {
            (target.shown, target.hidden)
        } else {
            (target.hidden, target.shown)
        };
        self.effects.start(EffectSpec::Slide(SlideSpec {
            node: target.node,
            from,
            to,
            duration: self.config.timings.slide_duration,
        }))
    }

    /// Puts every node the forward pipeline hid or moved back in place
    /// without ramping. Opacity is not touched.
    fn show_instantly(&mut self) {
        let config = Arc::clone(&self.config);
        let visuals = self.context.visuals.as_mut();
        let (flags, nodes) = (&config.flags, &config.nodes);

        if flags.slide_overlay {
            if let Some(overlay) = nodes.top_overlay {
                visuals.set_offset(overlay.node, overlay.shown);
            }
        }
        if flags.slide_side_panel {
            if let Some(panel) = nodes.side_panel {
                visuals.set_offset(panel.node, panel.shown);
            }
        }
        if flags.tween_wings {
            for wing in &nodes.wings {
                visuals.set_offset(wing.node, wing.shown);
            }
        }
        if let Some(camera) = nodes.camera {
            visuals.set_viewport(camera.camera, camera.from);
        }
        self.reactivate();
    }

    fn reactivate(&mut self) {
        let config = Arc::clone(&self.config);
        let visuals = self.context.visuals.as_mut();
        let nodes = &config.nodes;

        let hidden_ui = config.flags.hide_ui.then_some(&nodes.ui);
        for &node in nodes
            .deactivate
            .iter()
            .chain(&nodes.deactivate_immediately)
            .chain(hidden_ui.into_iter().flatten())
        {
            visuals.set_active(node, true);
        }
    }

    /// Lands forward effects that nothing waited on, so the return path
    /// writes last.
    fn land_detached(&mut self, session: &mut TransitionSession, now: Seconds) {
        let detached = std::mem::take(&mut session.detached);
        let landed = self
            .effects
            .finish(&detached, now, self.context.visuals.as_mut());
        if landed > 0 {
            debug!(
                "Session #{}: landed {} forward effects still running at return",
                session.id(),
                landed
            );
        }
    }

    /// Return path without a reverse pipeline: everything snaps back.
    fn return_instantly(&mut self, session: &mut TransitionSession) {
        debug!("Session #{}: restoring without reverse pipeline", session.id());
        let visuals = self.context.visuals.as_mut();
        let faults = session.snapshots.restore_all(visuals);
        session.snapshots.restore_layers(visuals);
        session.snapshots.trim_to_baseline();
        self.record_faults(faults);
        self.show_instantly();
    }

    //--- Queries ----------------------------------------------------------

    pub fn stage(&self) -> Stage {
        self.session
            .as_ref()
            .map_or(Stage::Idle, TransitionSession::stage)
    }

    /// A session is running and has not been force-reset by a queued bonus.
    pub fn is_started(&self) -> bool {
        self.session.as_ref().is_some_and(|session| session.started)
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn is_idle(&self) -> bool {
        self.session.is_none()
    }

    pub fn has_queued_rearm(&self) -> bool {
        self.pending_rearm
    }

    pub fn session(&self) -> Option<&TransitionSession> {
        self.session.as_ref()
    }

    pub fn config(&self) -> &TransitionConfig {
        &self.config
    }

    /// Non-fatal faults recorded so far, oldest first.
    pub fn faults(&self) -> &[TransitionError] {
        &self.faults
    }

    pub fn take_faults(&mut self) -> Vec<TransitionError> {
        std::mem::take(&mut self.faults)
    }

    /// Timestamps of the running session, or of the last finished one.
    pub fn activation_report(&self) -> Option<ActivationReport> {
        self.session
            .as_ref()
            .map(|session| session.report)
            .or(self.last_report)
    }

    pub fn last_summary(&self) -> Option<&SessionSummary> {
        self.last_summary.as_ref()
    }

    pub fn sessions_armed(&self) -> u64 {
        self.sessions_armed
    }

    /// Presentation time since the controller was created.
    pub fn elapsed(&self) -> Seconds {
        self.clock.now()
    }

    /// A signal the host may fire to end the running session's sub-scene.
    ///
    /// The signal is bound to the session running now; once that session
    /// is over, firing it has no effect.
    pub fn signal(&self) -> SubsceneSignal {
        let session = self.session.as_ref().map_or(0, TransitionSession::id);
        SubsceneSignal::new(self.signal_tx.clone(), session)
    }
}

impl std::fmt::Debug for TransitionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionController")
            .field("stage", &self.stage())
            .field("disabled", &self.disabled)
            .field("sessions_armed", &self.sessions_armed)
            .field("faults", &self.faults.len())
            .finish_non_exhaustive()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
