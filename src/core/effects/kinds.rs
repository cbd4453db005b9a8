//=========================================================================
// Effect Kinds
//=========================================================================
//
// The heterogeneous effect operations a transition runs in parallel.
//
// Every kind interpolates linearly over its duration and writes its exact
// terminal value on the final frame; downstream logic compares against
// boundary values (fully transparent, fully restored) and must never see
// an interpolation rounding error.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt::Debug;

//=== Internal Dependencies ===============================================

use crate::core::bridge::NodeVisuals;
use crate::core::node::{NodeId, OpacityMap, Offset, Viewport};
use crate::core::time::Seconds;

//=== Effect Trait ========================================================

/// One running effect, driven by the coordinator.
pub(crate) trait Effect: Send + Debug {
    fn duration(&self) -> Seconds;

    /// Applies progress `t` in `[0, 1)`.
    fn apply(&mut self, t: f32, visuals: &mut dyn NodeVisuals);

    /// Writes the exact terminal value.
    fn finish(&mut self, visuals: &mut dyn NodeVisuals);
}

//=== EffectSpec ==========================================================

/// Description of an effect to start.
#[derive(Debug, Clone, PartialEq)]
pub enum EffectSpec {
    Fade(FadeSpec),
    Slide(SlideSpec),
    Viewport(ViewportSpec),
    Toggle(ToggleSpec),
}

impl EffectSpec {
    pub fn duration(&self) -> Seconds {
        match self {
            Self::Fade(spec) => spec.duration,
            Self::Slide(spec) => spec.duration,
            Self::Viewport(spec) => spec.duration,
            Self::Toggle(spec) => spec.delay,
        }
    }

    pub(crate) fn into_effect(self) -> Box<dyn Effect> {
        match self {
            Self::Fade(spec) => Box::new(spec),
            Self::Slide(spec) => Box::new(spec),
            Self::Viewport(spec) => Box::new(spec),
            Self::Toggle(spec) => Box::new(spec),
        }
    }
}

//=== Fade ================================================================

/// Opacity ramp of one node.
#[derive(Debug, Clone, PartialEq)]
pub struct FadeTrack {
    pub node: NodeId,
    pub from: OpacityMap,
    pub to: OpacityMap,
}

impl FadeTrack {
    /// Ramp from `from` down to fully transparent.
    pub fn fade_out(node: NodeId, from: OpacityMap) -> Self {
        let to = OpacityMap::transparent(from.len());
        Self { node, from, to }
    }

    /// Returns `false` when the two maps disagree in channel count.
    pub fn is_consistent(&self) -> bool {
        self.from.len() == self.to.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FadeSpec {
    pub tracks: Vec<FadeTrack>,
    pub duration: Seconds,
}

impl FadeSpec {
    fn write(visuals: &mut dyn NodeVisuals, node: NodeId, map: &OpacityMap) {
        for (channel, value) in map.iter() {
            visuals.set_opacity(node, channel, value);
        }
    }
}

impl Effect for FadeSpec {
    fn duration(&self) -> Seconds {
        self.duration
    }

    fn apply(&mut self, t: f32, visuals: &mut dyn NodeVisuals) {
        for track in &self.tracks {
            if let Some(frame) = OpacityMap::lerp(&track.from, &track.to, t) {
                Self::write(visuals, track.node, &frame);
            }
        }
    }

    fn finish(&mut self, visuals: &mut dyn NodeVisuals) {
        for track in self.tracks.iter().filter(|t| t.is_consistent()) {
            Self::write(visuals, track.node, &track.to);
        }
    }
}

//=== Slide ===============================================================

/// Offset tween of one node (overlay, side panel, wing).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideSpec {
    pub node: NodeId,
    pub from: Offset,
    pub to: Offset,
    pub duration: Seconds,
}

impl Effect for SlideSpec {
    fn duration(&self) -> Seconds {
        self.duration
    }

    fn apply(&mut self, t: f32, visuals: &mut dyn NodeVisuals) {
        visuals.set_offset(self.node, Offset::lerp(self.from, self.to, t));
    }

    fn finish(&mut self, visuals: &mut dyn NodeVisuals) {
        visuals.set_offset(self.node, self.to);
    }
}

//=== Viewport ============================================================

/// Camera viewport tween.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportSpec {
    pub camera: NodeId,
    pub from: Viewport,
    pub to: Viewport,
    pub duration: Seconds,
}

impl Effect for ViewportSpec {
    fn duration(&self) -> Seconds {
        self.duration
    }

    fn apply(&mut self, t: f32, visuals: &mut dyn NodeVisuals) {
        visuals.set_viewport(self.camera, Viewport::lerp(self.from, self.to, t));
    }

    fn finish(&mut self, visuals: &mut dyn NodeVisuals) {
        visuals.set_viewport(self.camera, self.to);
    }
}

//=== Toggle ==============================================================

/// Sets nodes active or inactive after a delay (e.g. hiding the UI).
#[derive(Debug, Clone, PartialEq)]
pub struct ToggleSpec {
    pub nodes: Vec<NodeId>,
    pub active: bool,
    pub delay: Seconds,
}

impl Effect for ToggleSpec {
    fn duration(&self) -> Seconds {
        self.delay
    }

    fn apply(&mut self, _t: f32, _visuals: &mut dyn NodeVisuals) {}

    fn finish(&mut self, visuals: &mut dyn NodeVisuals) {
        for &node in &self.nodes {
            visuals.set_active(node, self.active);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
