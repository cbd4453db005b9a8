//=========================================================================
// Forward Pipeline
//=========================================================================
//
// Phase entries from pre-effects to awaiting the sub-scene end.
//
// Each entry performs its side effects once and returns the `Wait` the
// driver suspends on before entering the next phase.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use super::TransitionController;
use crate::core::bridge::SubsceneSignal;
use crate::core::effects::{
    Barrier, EffectHandle, EffectSpec, FadeSpec, FadeTrack, ToggleSpec, ViewportSpec,
};
use crate::core::transition::hooks::HookContext;
use crate::core::transition::session::{GateHandles, TransitionSession};
use crate::core::transition::stage::Wait;
use crate::core::time::Seconds;

impl TransitionController {
    //--- Pre-Effects ------------------------------------------------------

    /// Runs `before_transition` and waits for reels to come to rest.
    pub(super) fn enter_pre_settle(&mut self, session: &mut TransitionSession, now: Seconds) -> Wait {
        let mut ctx = HookContext::new(&mut session.snapshots, &mut session.extra_delay, now);
        self.hooks.before_transition(&mut ctx);

        Wait::Settle {
            nodes: self.config.nodes.reels.clone(),
            deadline: now + self.config.timings.settle_timeout,
        }
    }

    pub(super) fn enter_pre_acquired(&mut self, now: Seconds) -> Wait {
        if !self.config.flags.play_feature_acquired {
            return Wait::None;
        }
        if let Some(cue) = &self.config.audio.feature_acquired {
            self.audio.schedule_cue(cue);
        }
        Wait::Until(now + self.config.timings.feature_acquired_delay)
    }

    //--- Fading -----------------------------------------------------------

    /// Captures the fade set and starts every forward effect in parallel.
    pub(super) fn enter_fade(&mut self, session: &mut TransitionSession, now: Seconds) -> Wait {
        let config = Arc::clone(&self.config);
        let (flags, nodes, timings) = (&config.flags, &config.nodes, &config.timings);

        for cue in config.audio.forward() {
            self.audio.schedule_cue(cue);
        }
        if let Some(background) = &config.audio.background {
            self.audio.schedule_switch(background);
        }

        let report = session
            .snapshots
            .capture_tracked(self.context.visuals.as_ref());
        let tracks: Vec<FadeTrack> = report
            .nodes
            .iter()
            .filter_map(|&node| {
                session
                    .snapshots
                    .original(node)
                    .map(|original| FadeTrack::fade_out(node, original.clone()))
            })
            .collect();
        self.record_faults(report.faults);

        let fade = if tracks.is_empty() {
            EffectHandle::skipped()
        } else {
            self.effects.start(EffectSpec::Fade(FadeSpec {
                tracks,
                duration: timings.fade_duration,
            }))
        };

        let overlay = match nodes.top_overlay {
            Some(target) if flags.slide_overlay => self.start_slide(target, true),
            _ => EffectHandle::skipped(),
        };
        let panel = match nodes.side_panel {
            Some(target) if flags.slide_side_panel => self.start_slide(target, true),
            _ => EffectHandle::skipped(),
        };

        // Not gating: activation only waits on the fade and the two slides.
        let mut detached = Vec::new();
        if flags.hide_ui && !nodes.ui.is_empty() {
            detached.push(self.effects.start(EffectSpec::Toggle(ToggleSpec {
                nodes: nodes.ui.clone(),
                active: false,
                delay: timings.ui_hide_delay,
            })));
        }
        if flags.tween_wings {
            for &wing in &nodes.wings {
                detached.push(self.start_slide(wing, true));
            }
        }
        if let Some(camera) = nodes.camera {
            detached.push(self.effects.start(EffectSpec::Viewport(ViewportSpec {
                camera: camera.camera,
                from: camera.from,
                to: camera.to,
                duration: timings.fade_duration,
            })));
        }

        let visuals = self.context.visuals.as_mut();
        for &node in &nodes.deactivate_immediately {
            visuals.set_active(node, false);
        }

        let mut faults = Vec::new();
        if flags.use_viewport_cameras {
            for layer_move in &nodes.layer_moves {
                if let Err(err) =
                    session
                        .snapshots
                        .reassign_layer(layer_move.node, layer_move.layer, visuals)
                {
                    faults.push(err);
                }
            }
        }
        self.record_faults(faults);

        debug!(
            "Session #{}: fading {} nodes over {:.2}s",
            session.id(),
            report.nodes.len(),
            timings.fade_duration
        );
        session.gates = GateHandles {
            fade,
            overlay,
            panel,
        };
        session.detached = detached;
        session.report.fade_started_at = Some(now);
        Wait::None
    }

    //--- Animating --------------------------------------------------------

    /// Optionally blocks on the fade before the clip starts.
    pub(super) fn enter_animate(&mut self, session: &mut TransitionSession) -> Wait {
        if self.config.flags.finish_fade_before_animate {
            Wait::Barrier(Barrier::new(vec![session.gates.fade.clone()]))
        } else {
            Wait::None
        }
    }

    /// Plays the transition clip and holds for its duration.
    ///
    /// A fixed override forces rate 1 and ignores the clip's reported
    /// length.
    pub(super) fn enter_animate_play(&mut self, session: &mut TransitionSession, now: Seconds) -> Wait {
        if self.config.flags.finish_fade_before_animate {
            session.report.early_barrier_at = Some(now);
        }

        let config = Arc::clone(&self.config);
        let (Some(clip), Some(animator)) = (&config.clip, self.context.animator.as_mut()) else {
            return Wait::None;
        };
        session.report.animation_started_at = Some(now);

        match config.timings.animation_override {
            Some(hold) => {
                animator.set_playback_rate(1.0);
                animator.play(&clip.name);
                Wait::Until(now + hold)
            }
            None => {
                animator.play(&clip.name);
                let length = animator.reported_length(&clip.name).unwrap_or_else(|| {
                    debug!("Clip '{}' reports no length; not waiting on it", clip.name);
                    0.0
                });
                Wait::Until(now + length)
            }
        }
    }

    /// Freezes an overridden clip and waits on every gating effect.
    pub(super) fn enter_animate_gate(&mut self, session: &mut TransitionSession) -> Wait {
        if self.config.clip.is_some() && self.config.timings.animation_override.is_some() {
            if let Some(animator) = self.context.animator.as_mut() {
                animator.set_playback_rate(0.0);
            }
        }

        if !self.config.flags.has_reverse_transition {
            session
                .snapshots
                .restore_layers(self.context.visuals.as_mut());
        }

        Wait::Barrier(Barrier::new(session.gates.all()))
    }

    //--- Activation -------------------------------------------------------

    /// Swaps to the sub-scene. Every gating effect has finished.
    pub(super) fn enter_activate(&mut self, session: &mut TransitionSession, now: Seconds) -> Wait {
        session.report.fade_finished_at = session.gates.fade.finished_at();
        session.report.gate_completed_at = Barrier::new(session.gates.all()).completed_at();

        let visuals = self.context.visuals.as_mut();
        for &node in &self.config.nodes.deactivate {
            visuals.set_active(node, false);
        }

        let gateway = self.context.gateway.as_mut();
        let created = gateway.create_subscene();
        gateway.show_subscene();
        if !session.host_hidden {
            gateway.hide_host_scene(true);
            session.host_hidden = true;
        }
        gateway.on_subscene_ended(SubsceneSignal::new(self.signal_tx.clone(), session.id()));
        if let Err(err) = created {
            warn!("Session #{}: {}", session.id(), err);
            self.record_faults([err]);
        }

        session.report.activated_at = Some(now);
        info!("Session #{}: sub-scene activated at {:.3}s", session.id(), now);
        self.hooks.on_activated();
        Wait::None
    }

    //--- Post-Effects -----------------------------------------------------

    /// Re-parents the clip under the sub-scene and lets it run on.
    pub(super) fn enter_continue(&mut self, session: &mut TransitionSession, now: Seconds) -> Wait {
        if !self.config.flags.continue_animation {
            return Wait::None;
        }
        let config = Arc::clone(&self.config);
        let (Some(clip), Some(animator)) = (&config.clip, self.context.animator.as_mut()) else {
            return Wait::None;
        };

        animator.attach_to_subscene();
        animator.set_playback_rate(1.0);
        session.continued = true;

        let hold = match config.timings.continue_duration {
            Some(duration) => duration,
            None => {
                let length = animator.reported_length(&clip.name).unwrap_or(0.0);
                let played = config.timings.animation_override.unwrap_or(length);
                (length - played).max(0.0)
            }
        };
        debug!("Session #{}: continuing clip for {:.2}s", session.id(), hold);
        Wait::Until(now + hold)
    }

    /// Stops a continued clip and idles until the sub-scene ends.
    pub(super) fn enter_await_end(&mut self, session: &mut TransitionSession) -> Wait {
        if session.continued {
            if let Some(animator) = self.context.animator.as_mut() {
                animator.deactivate();
            }
            session.continued = false;
        }
        Wait::SubsceneEnd
    }
}
