//=========================================================================
// Reverse Pipeline
//=========================================================================
//
// Mirror of the forward pipeline, run at most once per session when the
// sub-scene ends.
//
// Ordering:
//   ReverseFadeStart    restore ramp (or instant restore), slides back in
//   ReverseAnimateStart reverse clip, if any
//   ReverseGate         barrier on every reverse effect
//   ReverseFinish       exact restore, layers back, trim to baseline
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;

use log::debug;

//=== Internal Dependencies ===============================================

use super::TransitionController;
use crate::core::effects::{Barrier, EffectSpec, FadeSpec, FadeTrack, ViewportSpec};
use crate::core::node::NodeId;
use crate::core::time::Seconds;
use crate::core::transition::session::TransitionSession;
use crate::core::transition::stage::Wait;

impl TransitionController {
    //--- Reverse Fading ---------------------------------------------------

    pub(super) fn enter_reverse_fade(&mut self, session: &mut TransitionSession) -> Wait {
        let config = Arc::clone(&self.config);

        if let Some(cue) = &config.audio.reverse {
            self.audio.schedule_cue(cue);
        }
        if let Some(background) = &config.audio.reverse_background {
            self.audio.schedule_switch(background);
        }
        self.reactivate();

        if config.flags.instant_reverse_fade {
            debug!("Session #{}: instant reverse", session.id());
            let faults = session
                .snapshots
                .restore_all(self.context.visuals.as_mut());
            self.record_faults(faults);
            self.show_instantly();
            session.reverse.clear();
            return Wait::None;
        }

        let tracks = self.restore_tracks(session);
        let mut handles = Vec::new();
        if !tracks.is_empty() {
            handles.push(self.effects.start(EffectSpec::Fade(FadeSpec {
                tracks,
                duration: config.timings.fade_duration,
            })));
        }

        let (flags, nodes) = (&config.flags, &config.nodes);
        if let Some(overlay) = nodes.top_overlay.filter(|_| flags.slide_overlay) {
            handles.push(self.start_slide(overlay, false));
        }
        if let Some(panel) = nodes.side_panel.filter(|_| flags.slide_side_panel) {
            handles.push(self.start_slide(panel, false));
        }
        if flags.tween_wings {
            for &wing in &nodes.wings {
                handles.push(self.start_slide(wing, false));
            }
        }
        if let Some(camera) = nodes.camera {
            handles.push(self.effects.start(EffectSpec::Viewport(ViewportSpec {
                camera: camera.camera,
                from: camera.to,
                to: camera.from,
                duration: config.timings.fade_duration,
            })));
        }

        debug!(
            "Session #{}: reverse ramp with {} effects",
            session.id(),
            handles.len()
        );
        session.reverse = handles;
        Wait::None
    }

    /// Ramps from live opacity back to each captured original.
    ///
    /// Nodes whose channel count changed since capture are left to the
    /// final restore, which reports the mismatch.
    fn restore_tracks(&self, session: &TransitionSession) -> Vec<FadeTrack> {
        let visuals = self.context.visuals.as_ref();
        let captured: Vec<NodeId> = session
            .snapshots
            .captured_log()
            .iter()
            .copied()
            .filter(|&node| session.snapshots.is_captured(node))
            .collect();

        captured
            .into_iter()
            .filter_map(|node| {
                let original = session.snapshots.original(node)?.clone();
                let live = visuals.opacity_map(node)?;
                let track = FadeTrack {
                    node,
                    from: live,
                    to: original,
                };
                if track.is_consistent() {
                    Some(track)
                } else {
                    debug!("{}: channel count changed since capture; skipping ramp", node);
                    None
                }
            })
            .collect()
    }

    //--- Reverse Animating ------------------------------------------------

    pub(super) fn enter_reverse_animate(&mut self, now: Seconds) -> Wait {
        let config = Arc::clone(&self.config);
        let reverse_clip = config.clip.as_ref().and_then(|clip| clip.reverse.as_deref());
        let (Some(clip), Some(animator)) = (reverse_clip, self.context.animator.as_mut()) else {
            return Wait::None;
        };

        animator.set_playback_rate(1.0);
        animator.play(clip);
        let length = animator
            .reported_length(clip)
            .or(config.timings.animation_override)
            .unwrap_or(0.0);
        Wait::Until(now + length)
    }

    pub(super) fn enter_reverse_gate(&mut self, session: &mut TransitionSession) -> Wait {
        Wait::Barrier(Barrier::new(std::mem::take(&mut session.reverse)))
    }

    //--- Terminal ---------------------------------------------------------

    /// Writes exact originals, moves layers back and trims dynamic nodes.
    pub(super) fn enter_reverse_finish(&mut self, session: &mut TransitionSession) -> Wait {
        let visuals = self.context.visuals.as_mut();
        let faults = session.snapshots.restore_all(visuals);
        let layers = session.snapshots.restore_layers(visuals);
        let trimmed = session.snapshots.trim_to_baseline();
        self.record_faults(faults);

        debug!(
            "Session #{}: reverse complete ({} layers restored, {} dynamic nodes trimmed)",
            session.id(),
            layers,
            trimmed
        );
        self.hooks.on_reverse_complete();
        Wait::None
    }
}
