//=========================================================================
// Transition Scenarios
//
// End-to-end runs of the transition controller against headless adapters.
//
//=========================================================================

use std::sync::{Arc, Mutex};

use aetheric_transitions::core::audio::{CueSpec, TrackSwitchSpec};
use aetheric_transitions::core::bridge::headless::{
    AnimatorCall, AudioCall, GatewayCall, HeadlessAnimator, HeadlessAudio, HeadlessGateway,
    HeadlessVisuals,
};
use aetheric_transitions::core::bridge::TrackSwitch;
use aetheric_transitions::core::config::{ClipConfig, SlideTarget};
use aetheric_transitions::core::node::{Offset, Viewport};
use aetheric_transitions::core::scene::{Scene, SceneKey, SceneManager, SceneStackGateway};
use aetheric_transitions::core::trigger::StaticPortalCatalog;
use aetheric_transitions::prelude::*;

const DT: Seconds = 1.0 / 60.0;
const MAX_TICKS: usize = 2_000;

const FADE: NodeId = NodeId(1);
const SYMBOL: NodeId = NodeId(3);
const OVERLAY: NodeId = NodeId(20);
const WING: NodeId = NodeId(30);
const UI: NodeId = NodeId(40);

//=== Rig =================================================================

struct Rig {
    visuals: HeadlessVisuals,
    audio: HeadlessAudio,
    gateway: HeadlessGateway,
    animator: HeadlessAnimator,
}

impl Rig {
    fn new() -> Self {
        Self {
            visuals: HeadlessVisuals::new()
                .with_node(FADE, vec![1.0, 0.6])
                .with_node(SYMBOL, vec![0.9])
                .with_node(OVERLAY, vec![1.0]),
            audio: HeadlessAudio::new(),
            gateway: HeadlessGateway::new(),
            animator: HeadlessAnimator::new(),
        }
    }

    fn context(&self) -> TransitionContext {
        TransitionContext::new(
            self.visuals.clone(),
            self.audio.clone(),
            self.gateway.clone(),
        )
    }

    fn controller(&self, config: TransitionConfig) -> TransitionController {
        TransitionController::new(config, self.context())
    }
}

fn overlay() -> SlideTarget {
    SlideTarget::new(OVERLAY, Offset::new(0.0, 0.0), Offset::new(0.0, 320.0))
}

fn base_config() -> TransitionConfig {
    let mut config = TransitionConfig::new(TriggerConfig::by_category(FeatureCategory::Gifting));
    config.nodes.fade = vec![FADE];
    config.nodes.symbols = vec![SYMBOL];
    config.nodes.top_overlay = Some(overlay());
    config.flags.fade_symbols = true;
    config.flags.fade_top_overlay = true;
    config.flags.slide_overlay = true;
    config.timings.fade_duration = 1.0;
    config
}

fn gifting() -> OutcomeSnapshot {
    OutcomeSnapshot::named("free_spins")
        .feature()
        .with_pending(FeatureCategory::Gifting, "free_spins")
}

/// Ticks until `target`, returning every stage observed on the way.
fn run_until(controller: &mut TransitionController, target: Stage) -> Vec<Stage> {
    let mut seen = vec![controller.stage()];
    for _ in 0..MAX_TICKS {
        let stage = controller.tick(DT);
        if seen.last() != Some(&stage) {
            seen.push(stage);
        }
        if stage == target {
            return seen;
        }
    }
    panic!("never reached {target:?}; saw {seen:?}");
}

//=== Forward Pipeline ====================================================

#[test]
fn fade_runs_for_its_duration_and_activates_once() {
    let rig = Rig::new();
    let mut controller = rig.controller(base_config());

    assert_eq!(controller.on_outcome(&gifting()), TriggerResponse::Armed);
    let seen = run_until(&mut controller, Stage::AwaitingSubsceneEnd);

    assert_eq!(
        seen,
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

    let report = controller.activation_report().unwrap();
    let elapsed = report.fade_finished_at.unwrap() - report.fade_started_at.unwrap();
    assert!((elapsed - 1.0).abs() < 1e-3, "fade took {elapsed}s");

    for node in [FADE, SYMBOL, OVERLAY] {
        assert!(rig.visuals.opacity(node).unwrap().is_zeroed(), "{node} not faded");
    }
    assert_eq!(rig.visuals.offset(OVERLAY), Some(overlay().hidden));
    assert_eq!(rig.gateway.count(GatewayCall::CreateSubscene), 1);
    assert_eq!(rig.gateway.count(GatewayCall::ShowSubscene), 1);
    assert_eq!(rig.gateway.count(GatewayCall::HideHost(true)), 1);
}

#[test]
fn activation_waits_for_every_gating_effect() {
    for finish_fade_first in [false, true] {
        let rig = Rig::new();
        let mut config = base_config();
        config.clip = Some(ClipConfig::new("intro"));
        config.flags.finish_fade_before_animate = finish_fade_first;
        config.timings.slide_duration = 1.5;
        let animator = rig.animator.clone().with_clip("intro", 0.3);
        let mut controller =
            TransitionController::new(config, rig.context().with_animator(animator));

        controller.on_outcome(&gifting());
        run_until(&mut controller, Stage::AwaitingSubsceneEnd);

        let report = controller.activation_report().unwrap();
        let fade_finished = report.fade_finished_at.unwrap();
        let gate = report.gate_completed_at.unwrap();
        let activated = report.activated_at.unwrap();
        let animation = report.animation_started_at.unwrap();

        assert!(activated >= gate);
        assert!(gate >= fade_finished);
        if finish_fade_first {
            assert!(report.early_barrier_at.unwrap() >= fade_finished);
            assert!(animation >= fade_finished);
        } else {
            assert_eq!(report.early_barrier_at, None);
            assert!(animation < fade_finished);
        }
    }
}

#[test]
fn settle_timeout_lets_the_pipeline_continue() {
    let rig = Rig::new();
    let reel = NodeId(10);
    rig.visuals.set_settled(reel, false);
    let mut config = base_config();
    config.nodes.reels = vec![reel];
    config.timings.settle_timeout = 0.5;
    let mut controller = rig.controller(config);

    controller.on_outcome(&gifting());
    run_until(&mut controller, Stage::Fading);

    let report = controller.activation_report().unwrap();
    assert!(report.fade_started_at.unwrap() >= 0.5);
}

//=== Return Paths ========================================================

#[test]
fn without_reverse_everything_snaps_back_on_end() {
    let rig = Rig::new();
    let panel = SlideTarget::new(NodeId(21), Offset::new(0.0, 0.0), Offset::new(400.0, 0.0));
    let mut config = base_config();
    config.nodes.side_panel = Some(panel);
    config.flags.slide_side_panel = true;
    let mut controller = rig.controller(config);

    controller.on_outcome(&gifting());
    run_until(&mut controller, Stage::AwaitingSubsceneEnd);

    assert!(rig.gateway.end_subscene());
    assert_eq!(controller.tick(DT), Stage::Idle);

    assert!(!controller.is_started());
    assert_eq!(rig.visuals.offset(OVERLAY), Some(overlay().shown));
    assert_eq!(rig.visuals.offset(panel.node), Some(panel.shown));
    assert_eq!(rig.visuals.opacity(FADE).unwrap().get(1), Some(0.6));
    assert_eq!(rig.visuals.opacity(SYMBOL).unwrap().get(0), Some(0.9));
    assert_eq!(rig.gateway.count(GatewayCall::HideHost(false)), 1);

    let summary = controller.last_summary().unwrap();
    assert!(!summary.reversed);
    assert_eq!(summary.captured, summary.restored);
    assert!(controller.faults().is_empty());
}

#[test]
fn reverse_runs_once_despite_repeated_end_signals() {
    let rig = Rig::new();
    let mut config = base_config();
    config.flags.has_reverse_transition = true;
    config.audio.reverse = Some(CueSpec::new("transition_return", 0.0));
    let audio = rig.audio.clone().with_cues(["transition_return"]);
    let context = TransitionContext::new(rig.visuals.clone(), audio, rig.gateway.clone());
    let mut controller = TransitionController::new(config, context);

    controller.on_outcome(&gifting());
    run_until(&mut controller, Stage::AwaitingSubsceneEnd);

    rig.gateway.end_subscene();
    assert_eq!(controller.tick(DT), Stage::ReverseFading);
    rig.gateway.end_subscene();
    rig.gateway.end_subscene();

    let seen = run_until(&mut controller, Stage::Idle);
    assert!(!seen.contains(&Stage::AwaitingSubsceneEnd));

    let summary = controller.last_summary().unwrap();
    assert!(summary.reversed);
    assert_eq!(summary.captured, summary.restored);
    assert_eq!(rig.visuals.opacity(FADE).unwrap().get(0), Some(1.0));
    assert_eq!(rig.visuals.opacity(FADE).unwrap().get(1), Some(0.6));
    assert_eq!(rig.visuals.offset(OVERLAY), Some(overlay().shown));
    assert_eq!(rig.audio.played(), ["transition_return"]);
    assert_eq!(rig.gateway.count(GatewayCall::HideHost(false)), 1);
}

#[test]
fn instant_reverse_restores_without_double_restore() {
    let rig = Rig::new();
    let mut config = base_config();
    config.flags.has_reverse_transition = true;
    config.flags.instant_reverse_fade = true;
    let mut controller = rig.controller(config);

    controller.on_outcome(&gifting());
    run_until(&mut controller, Stage::AwaitingSubsceneEnd);
    rig.gateway.end_subscene();
    controller.tick(DT);

    // Restored on the first reverse tick, before the reverse finishes.
    assert_eq!(rig.visuals.opacity(SYMBOL).unwrap().get(0), Some(0.9));
    assert_eq!(rig.visuals.offset(OVERLAY), Some(overlay().shown));

    run_until(&mut controller, Stage::Idle);
    assert!(controller.faults().is_empty());
    let summary = controller.last_summary().unwrap();
    assert_eq!(summary.captured.len(), 3);
    assert_eq!(summary.captured, summary.restored);
}

//=== Trigger Policy ======================================================

#[test]
fn portal_probe_without_portal_does_not_fire() {
    let rig = Rig::new();
    let mut config = base_config();
    config.trigger = TriggerConfig::by_portal_probe("dragon_gate");
    let mut controller = rig.controller(config);

    assert_eq!(controller.on_outcome(&gifting()), TriggerResponse::NotFired);
    assert!(controller.is_idle());
    assert_eq!(controller.sessions_armed(), 0);
    assert_eq!(controller.tick(DT), Stage::Idle);
}

#[test]
fn portal_probe_with_prefab_fires_for_any_outcome() {
    let rig = Rig::new();
    let mut config = base_config();
    config.trigger = TriggerConfig::by_portal_probe("dragon_gate");
    let portal = StaticPortalCatalog::new().with_prefab("dragon_gate", "portals/dragon.prefab");
    let mut controller =
        TransitionController::new(config, rig.context().with_portal(portal));

    let outcome = OutcomeSnapshot::named("line_win");
    assert_eq!(controller.on_outcome(&outcome), TriggerResponse::Armed);
}

#[test]
fn retrigger_without_queued_bonus_is_busy() {
    let rig = Rig::new();
    let mut controller = rig.controller(base_config());

    controller.on_outcome(&gifting());
    run_until(&mut controller, Stage::Fading);
    assert_eq!(controller.on_outcome(&gifting()), TriggerResponse::Busy);
    assert!(controller.is_started());

    run_until(&mut controller, Stage::AwaitingSubsceneEnd);
    rig.gateway.end_subscene();
    run_until(&mut controller, Stage::Idle);
    assert_eq!(controller.sessions_armed(), 1);

    // The next cycle captures the restored originals again.
    assert_eq!(controller.on_outcome(&gifting()), TriggerResponse::Armed);
    run_until(&mut controller, Stage::AwaitingSubsceneEnd);
    assert!(controller.faults().is_empty());
}

#[test]
fn queued_bonus_rearms_after_completion() {
    let rig = Rig::new();
    let mut controller = rig.controller(base_config());
    let queued = gifting().with_queued_bonus();

    controller.on_outcome(&gifting());
    run_until(&mut controller, Stage::Fading);

    assert_eq!(controller.on_outcome(&queued), TriggerResponse::Queued);
    assert!(!controller.is_started());
    assert!(controller.has_queued_rearm());
    assert_eq!(controller.on_outcome(&queued), TriggerResponse::Dropped);

    run_until(&mut controller, Stage::AwaitingSubsceneEnd);
    rig.gateway.end_subscene();
    assert_eq!(controller.tick(DT), Stage::Armed);

    assert!(controller.is_started());
    assert!(!controller.has_queued_rearm());
    assert_eq!(controller.sessions_armed(), 2);
    assert_eq!(rig.visuals.opacity(FADE).unwrap().get(0), Some(1.0));
}

#[test]
fn stale_end_signal_does_not_end_the_rearmed_session() {
    let rig = Rig::new();
    let mut controller = rig.controller(base_config());

    controller.on_outcome(&gifting());
    run_until(&mut controller, Stage::Fading);
    assert_eq!(
        controller.on_outcome(&gifting().with_queued_bonus()),
        TriggerResponse::Queued
    );

    run_until(&mut controller, Stage::AwaitingSubsceneEnd);
    let first = controller.signal();
    assert!(rig.gateway.end_subscene());
    assert_eq!(controller.tick(DT), Stage::Armed);
    assert_eq!(controller.sessions_armed(), 2);

    // The host repeats the first session's end before the second activates.
    first.fire();
    assert!(rig.gateway.end_subscene());

    run_until(&mut controller, Stage::AwaitingSubsceneEnd);
    for _ in 0..120 {
        assert_eq!(controller.tick(DT), Stage::AwaitingSubsceneEnd);
    }

    assert!(rig.gateway.end_subscene());
    run_until(&mut controller, Stage::Idle);
    assert_eq!(controller.sessions_armed(), 2);
}

//=== Configuration =======================================================

#[test]
fn overlay_slide_without_overlay_node_is_rejected() {
    let json = r#"{
        "trigger": { "kind": "by_category", "category": "gifting" },
        "flags": { "slide_overlay": true }
    }"#;
    assert!(matches!(
        TransitionConfig::from_json(json),
        Err(ConfigError::Invalid(_))
    ));
}

#[test]
fn misconfigured_controller_stays_disabled() {
    let rig = Rig::new();
    let mut config = base_config();
    config.nodes.top_overlay = None;
    let mut controller = rig.controller(config);

    assert!(controller.is_disabled());
    assert!(controller.faults()[0].is_fatal_to_controller());
    assert_eq!(controller.on_outcome(&gifting()), TriggerResponse::Disabled);
    assert_eq!(controller.tick(DT), Stage::Idle);
    assert!(rig.gateway.calls().is_empty());
}

#[test]
fn authored_demo_runs_a_full_round_trip() {
    let json = include_str!("../demos/gifting_transition.json");
    let config = TransitionConfig::from_json(json).unwrap();

    let visuals = HeadlessVisuals::new()
        .with_node(NodeId(1), vec![1.0])
        .with_node(NodeId(2), vec![1.0, 1.0])
        .with_node(NodeId(3), vec![0.8])
        .with_node(NodeId(4), vec![0.8])
        .with_node(NodeId(5), vec![0.8])
        .with_node(NodeId(20), vec![1.0])
        .with_layer(NodeId(3), 2);
    let audio = HeadlessAudio::new().with_cues([
        "feature_acquired",
        "transition_whoosh",
        "transition_chime",
        "vo_free_spins",
        "transition_return",
        "bonus_theme",
        "base_theme",
    ]);
    let animator = HeadlessAnimator::new()
        .with_clip("gifting_intro", 2.0)
        .with_clip("gifting_outro", 0.5);
    let gateway = HeadlessGateway::new();
    let context = TransitionContext::new(visuals.clone(), audio.clone(), gateway.clone())
        .with_animator(animator.clone());
    let mut controller = TransitionController::new(config, context);
    assert!(!controller.is_disabled());

    controller.on_outcome(&gifting());
    run_until(&mut controller, Stage::AwaitingSubsceneEnd);

    assert_eq!(visuals.layer(NodeId(3)), Some(8));
    assert_eq!(visuals.is_active(NodeId(30)), Some(false));
    assert_eq!(visuals.is_active(NodeId(31)), Some(false));
    assert_eq!(visuals.is_active(NodeId(40)), Some(false));
    assert_eq!(
        visuals.viewport(NodeId(60)),
        Some(Viewport {
            x: 0.1,
            y: 0.1,
            width: 0.8,
            height: 0.8,
        })
    );
    let calls = animator.calls();
    assert!(calls.contains(&AnimatorCall::Play("gifting_intro".into())));
    assert!(calls.contains(&AnimatorCall::AttachToSubscene));
    assert_eq!(calls.last(), Some(&AnimatorCall::Deactivate));

    assert!(gateway.end_subscene());
    let seen = run_until(&mut controller, Stage::Idle);
    assert!(seen.contains(&Stage::ReverseAnimating));

    assert_eq!(visuals.layer(NodeId(3)), Some(2));
    assert_eq!(visuals.opacity(NodeId(3)).unwrap().get(0), Some(0.8));
    assert_eq!(visuals.is_active(NodeId(30)), Some(true));
    assert_eq!(visuals.is_active(NodeId(41)), Some(true));
    assert_eq!(visuals.offset(NodeId(50)), Some(Offset::new(0.0, 0.0)));
    assert_eq!(visuals.viewport(NodeId(60)), Some(Viewport::default()));
    assert!(animator
        .calls()
        .contains(&AnimatorCall::Play("gifting_outro".into())));

    let played = audio.played();
    for cue in [
        "feature_acquired",
        "transition_whoosh",
        "transition_chime",
        "vo_free_spins",
        "transition_return",
    ] {
        assert!(played.iter().any(|p| p == cue), "{cue} never played");
    }
    assert!(audio.calls().contains(&AudioCall::SwitchTrack(
        "bonus_theme".into(),
        TrackSwitch::CrossFade
    )));
    assert!(controller.faults().is_empty(), "{:?}", controller.faults());
}

#[test]
fn background_switch_waits_for_its_delay() {
    let rig = Rig::new();
    let mut config = base_config();
    config.audio.background = Some(TrackSwitchSpec::new("bonus_theme", TrackSwitch::Immediate, 0.5));
    let audio = rig.audio.clone().with_cues(["bonus_theme"]);
    let mut controller = TransitionController::new(
        config,
        TransitionContext::new(rig.visuals.clone(), audio, rig.gateway.clone()),
    );

    controller.on_outcome(&gifting());
    run_until(&mut controller, Stage::Fading);
    assert!(rig.audio.calls().is_empty());

    for _ in 0..40 {
        controller.tick(DT);
    }
    assert_eq!(
        rig.audio.calls(),
        [AudioCall::SwitchTrack("bonus_theme".into(), TrackSwitch::Immediate)]
    );
}

//=== Hooks ===============================================================

#[derive(Clone, Default)]
struct RecordingHooks {
    log: Arc<Mutex<Vec<&'static str>>>,
}

impl TransitionHooks for RecordingHooks {
    fn before_transition(&mut self, ctx: &mut HookContext<'_>) {
        ctx.add_fade_node(NodeId(9));
        ctx.delay(0.5);
        self.log.lock().unwrap().push("before");
    }

    fn on_activated(&mut self) {
        self.log.lock().unwrap().push("activated");
    }

    fn on_reverse_complete(&mut self) {
        self.log.lock().unwrap().push("reverse_complete");
    }
}

#[test]
fn hooks_extend_the_fade_set_and_delay() {
    let rig = Rig::new();
    rig.visuals.replace_channels(NodeId(9), vec![0.7]);
    let mut config = base_config();
    config.flags.has_reverse_transition = true;
    let hooks = RecordingHooks::default();
    let mut controller = TransitionController::builder(config, rig.context())
        .with_hooks(hooks.clone())
        .build();

    controller.on_outcome(&gifting());
    run_until(&mut controller, Stage::AwaitingSubsceneEnd);

    assert!(controller.activation_report().unwrap().fade_started_at.unwrap() >= 0.5);
    assert!(rig.visuals.opacity(NodeId(9)).unwrap().is_zeroed());

    rig.gateway.end_subscene();
    run_until(&mut controller, Stage::Idle);

    assert_eq!(rig.visuals.opacity(NodeId(9)).unwrap().get(0), Some(0.7));
    assert!(controller.last_summary().unwrap().captured.contains(&NodeId(9)));
    assert_eq!(
        *hooks.log.lock().unwrap(),
        ["before", "activated", "reverse_complete"]
    );
}

#[test]
fn early_end_lands_effects_that_activation_did_not_wait_for() {
    for has_reverse in [false, true] {
        let rig = Rig::new();
        let wing = SlideTarget::new(WING, Offset::new(0.0, 0.0), Offset::new(-240.0, 0.0));

        let mut config = TransitionConfig::new(TriggerConfig::by_category(FeatureCategory::Gifting));
        config.nodes.fade = vec![FADE];
        config.nodes.wings = vec![wing];
        config.nodes.ui = vec![UI];
        config.flags.tween_wings = true;
        config.flags.hide_ui = true;
        config.flags.has_reverse_transition = has_reverse;
        config.timings.fade_duration = 0.1;
        config.timings.slide_duration = 2.0;
        config.timings.ui_hide_delay = 2.0;
        let mut controller = rig.controller(config);

        controller.on_outcome(&gifting());
        run_until(&mut controller, Stage::AwaitingSubsceneEnd);
        assert!(rig.gateway.end_subscene());
        run_until(&mut controller, Stage::Idle);

        for _ in 0..300 {
            controller.tick(DT);
        }
        assert_eq!(rig.visuals.offset(WING), Some(wing.shown), "reverse: {has_reverse}");
        assert_eq!(rig.visuals.is_active(UI), Some(true), "reverse: {has_reverse}");
        assert_eq!(rig.visuals.opacity(FADE).unwrap().get(0), Some(1.0));
    }
}

//=== Scene Stack =========================================================

#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
enum Presentation {
    Base,
    FreeSpins,
}

impl SceneKey for Presentation {}

struct Still;

impl Scene<Presentation> for Still {
    fn update(&mut self, _dt: Seconds) {}
}

#[test]
fn scene_stack_gateway_swaps_and_returns() {
    let rig = Rig::new();
    let mut manager = SceneManager::new();
    manager.register_default(Presentation::Base, Still);
    manager.register_scene(Presentation::FreeSpins, Still);
    let scenes = SceneStackGateway::new(manager, Presentation::Base, Presentation::FreeSpins);

    let context = TransitionContext::new(rig.visuals.clone(), rig.audio.clone(), scenes.clone());
    let mut controller = TransitionController::new(base_config(), context);

    controller.on_outcome(&gifting());
    run_until(&mut controller, Stage::AwaitingSubsceneEnd);
    scenes.with_manager(|m| {
        assert_eq!(m.top(), Some(Presentation::FreeSpins));
        assert!(m.is_visible(Presentation::FreeSpins));
        assert!(!m.is_visible(Presentation::Base));
    });

    assert!(scenes.finish_subscene());
    assert_eq!(controller.tick(DT), Stage::Idle);
    scenes.with_manager(|m| {
        assert_eq!(m.stack(), [Presentation::Base]);
        assert!(m.is_visible(Presentation::Base));
    });
}

#[test]
fn unregistered_subscene_is_recorded_as_a_fault() {
    let rig = Rig::new();
    let mut manager = SceneManager::new();
    manager.register_default(Presentation::Base, Still);
    let scenes = SceneStackGateway::new(manager, Presentation::Base, Presentation::FreeSpins);

    let context = TransitionContext::new(rig.visuals.clone(), rig.audio.clone(), scenes.clone());
    let mut controller = TransitionController::new(base_config(), context);

    controller.on_outcome(&gifting());
    run_until(&mut controller, Stage::AwaitingSubsceneEnd);

    assert!(matches!(
        controller.faults(),
        [TransitionError::AdapterNotReady(_)]
    ));
    assert!(!controller.is_disabled());
    scenes.with_manager(|m| assert_eq!(m.stack(), [Presentation::Base]));

    controller.notify_subscene_ended();
    run_until(&mut controller, Stage::Idle);
    scenes.with_manager(|m| assert!(m.is_visible(Presentation::Base)));
}

//=== Engine ==============================================================

#[test]
fn engine_steps_a_round_trip_from_host_events() {
    let rig = Rig::new();
    let mut engine = TransitionEngineBuilder::new().build(rig.controller(base_config()));
    let host = engine.sender();

    host.send(SequencerEvent::Outcome(gifting())).unwrap();
    for _ in 0..MAX_TICKS {
        engine.step();
        if engine.controller().stage() == Stage::AwaitingSubsceneEnd {
            break;
        }
    }
    assert_eq!(engine.controller().stage(), Stage::AwaitingSubsceneEnd);

    host.send(SequencerEvent::SubsceneEnded).unwrap();
    assert_eq!(engine.step(), TickControl::Continue);
    assert_eq!(engine.controller().stage(), Stage::Idle);

    host.send(SequencerEvent::Shutdown).unwrap();
    assert_eq!(engine.step(), TickControl::Exit);
}

#[test]
fn animator_rate_is_frozen_after_override() {
    let rig = Rig::new();
    let mut config = base_config();
    config.clip = Some(ClipConfig::new("intro"));
    config.timings.animation_override = Some(0.4);
    let animator = rig.animator.clone().with_clip("intro", 3.0);
    let mut controller = TransitionController::new(config, rig.context().with_animator(animator));

    controller.on_outcome(&gifting());
    run_until(&mut controller, Stage::AwaitingSubsceneEnd);

    assert_eq!(
        rig.animator.calls(),
        [
            AnimatorCall::Rate(1.0),
            AnimatorCall::Play("intro".into()),
            AnimatorCall::Rate(0.0),
        ]
    );
}
