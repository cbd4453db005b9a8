//=========================================================================
// Transition Configuration
//=========================================================================
//
// Immutable authored data for one transition.
//
// Loaded once at scene setup and never mutated at runtime. Every field
// has a default so authored JSON only needs to state what differs.
//
// Layout:
//   TransitionConfig
//     ├─ trigger: TriggerConfig      (when to fire)
//     ├─ timings: StageTimings       (how long each stage waits)
//     ├─ nodes:   NodeSets           (what to fade, slide, hide)
//     ├─ audio:   AudioCueSet        (what to play, when)
//     ├─ flags:   TransitionFlags    (which optional steps run)
//     └─ clip:    Option<ClipConfig> (what to animate)
//
//=========================================================================

//=== External Dependencies ===============================================

use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use crate::core::audio::AudioCueSet;
use crate::core::error::ConfigError;
use crate::core::node::{NodeId, Offset, RenderLayer, Viewport};
use crate::core::time::Seconds;
use crate::core::trigger::{TriggerConfig, TriggerKind};

//=== StageTimings ========================================================

/// Durations and delays of the forward and reverse pipelines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageTimings {
    /// Upper bound on waiting for reel-like nodes to come to rest.
    pub settle_timeout: Seconds,
    /// Wait after the feature-acquired cue.
    pub feature_acquired_delay: Seconds,
    /// Extra wait before the fade starts.
    pub pre_delay: Seconds,
    /// Opacity fade duration, forward and ramped reverse.
    pub fade_duration: Seconds,
    /// Overlay, side panel and wing slide duration.
    pub slide_duration: Seconds,
    /// Delay before the UI is hidden.
    pub ui_hide_delay: Seconds,
    /// Fixed clip hold used instead of the clip's reported length.
    pub animation_override: Option<Seconds>,
    /// Playback after re-parenting into the sub-scene.
    pub continue_duration: Option<Seconds>,
}

impl Default for StageTimings {
    fn default() -> Self {
        Self {
            settle_timeout: 0.5,
            feature_acquired_delay: 0.0,
            pre_delay: 0.0,
            fade_duration: 1.0,
            slide_duration: 0.5,
            ui_hide_delay: 0.0,
            animation_override: None,
            continue_duration: None,
        }
    }
}

//=== Node Sets ===========================================================

/// A node that slides between a shown and a hidden offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlideTarget {
    pub node: NodeId,
    #[serde(default)]
    pub shown: Offset,
    #[serde(default)]
    pub hidden: Offset,
}

impl SlideTarget {
    pub fn new(node: NodeId, shown: Offset, hidden: Offset) -> Self {
        Self {
            node,
            shown,
            hidden,
        }
    }
}

/// Moves a node to another render layer while the transition plays.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerMove {
    pub node: NodeId,
    pub layer: RenderLayer,
}

/// Camera viewport tween run alongside the fade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportTween {
    pub camera: NodeId,
    #[serde(default)]
    pub from: Viewport,
    #[serde(default)]
    pub to: Viewport,
}

/// Node references the transition operates on.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeSets {
    /// Always faded.
    pub fade: Vec<NodeId>,
    /// Faded when `fade_symbols` is set.
    pub symbols: Vec<NodeId>,
    /// Waited on to settle before the transition starts.
    pub reels: Vec<NodeId>,
    /// Deactivated on sub-scene activation.
    pub deactivate: Vec<NodeId>,
    /// Deactivated as soon as the fade starts.
    pub deactivate_immediately: Vec<NodeId>,
    /// Hidden when `hide_ui` is set.
    pub ui: Vec<NodeId>,
    pub wings: Vec<SlideTarget>,
    pub top_overlay: Option<SlideTarget>,
    pub side_panel: Option<SlideTarget>,
    /// Applied when `use_viewport_cameras` is set.
    pub layer_moves: Vec<LayerMove>,
    pub camera: Option<ViewportTween>,
}

//=== TransitionFlags =====================================================

/// Optional pipeline steps, all off by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionFlags {
    pub fade_symbols: bool,
    pub fade_wings: bool,
    pub fade_top_overlay: bool,
    pub fade_side_panel: bool,
    pub slide_overlay: bool,
    pub slide_side_panel: bool,
    pub hide_ui: bool,
    pub tween_wings: bool,
    pub continue_animation: bool,
    pub has_reverse_transition: bool,
    pub instant_reverse_fade: bool,
    pub finish_fade_before_animate: bool,
    pub play_feature_acquired: bool,
    pub use_viewport_cameras: bool,
}

//=== ClipConfig ==========================================================

/// Animation clips played by the transition.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipConfig {
    pub name: String,
    /// Played by the reverse pipeline; the reverse animation is skipped
    /// when absent.
    pub reverse: Option<String>,
}

impl ClipConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reverse: None,
        }
    }

    pub fn with_reverse(mut self, reverse: impl Into<String>) -> Self {
        self.reverse = Some(reverse.into());
        self
    }
}

//=== TransitionConfig ====================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    pub trigger: TriggerConfig,
    pub timings: StageTimings,
    pub nodes: NodeSets,
    pub audio: AudioCueSet,
    pub flags: TransitionFlags,
    pub clip: Option<ClipConfig>,
}

impl TransitionConfig {
    pub fn new(trigger: TriggerConfig) -> Self {
        Self {
            trigger,
            ..Self::default()
        }
    }

    /// Parses and validates authored JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Rejects configurations the pipeline cannot run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_trigger()?;
        self.validate_timings()?;
        self.validate_targets()?;
        self.validate_clip()
    }

    //--- Validation -------------------------------------------------------

    fn validate_trigger(&self) -> Result<(), ConfigError> {
        match self.trigger.kind {
            TriggerKind::ByCategory if self.trigger.category.is_none() => Err(
                ConfigError::invalid("by_category trigger requires a category"),
            ),
            TriggerKind::ByName if self.trigger.names.is_empty() => Err(ConfigError::invalid(
                "by_name trigger requires at least one name",
            )),
            TriggerKind::ByPortalProbe if self.trigger.game_id.is_empty() => Err(
                ConfigError::invalid("by_portal_probe trigger requires a game id"),
            ),
            _ => Ok(()),
        }
    }

    fn validate_timings(&self) -> Result<(), ConfigError> {
        let t = &self.timings;
        let durations = [
            ("settle_timeout", Some(t.settle_timeout)),
            ("feature_acquired_delay", Some(t.feature_acquired_delay)),
            ("pre_delay", Some(t.pre_delay)),
            ("fade_duration", Some(t.fade_duration)),
            ("slide_duration", Some(t.slide_duration)),
            ("ui_hide_delay", Some(t.ui_hide_delay)),
            ("animation_override", t.animation_override),
            ("continue_duration", t.continue_duration),
        ];
        let delays = self.audio.delays().map(|(name, delay)| (name, Some(delay)));

        for (name, value) in durations.into_iter().chain(delays) {
            if let Some(value) = value {
                if !value.is_finite() || value < 0.0 {
                    return Err(ConfigError::invalid(format!(
                        "{name} must be a non-negative duration, got {value}"
                    )));
                }
            }
        }
        Ok(())
    }

    fn validate_targets(&self) -> Result<(), ConfigError> {
        let f = &self.flags;
        let n = &self.nodes;
        if (f.slide_overlay || f.fade_top_overlay) && n.top_overlay.is_none() {
            return Err(ConfigError::invalid(
                "top overlay flags are set but no top overlay is configured",
            ));
        }
        if (f.slide_side_panel || f.fade_side_panel) && n.side_panel.is_none() {
            return Err(ConfigError::invalid(
                "side panel flags are set but no side panel is configured",
            ));
        }
        Ok(())
    }

    fn validate_clip(&self) -> Result<(), ConfigError> {
        match &self.clip {
            Some(clip) if clip.name.is_empty() => {
                Err(ConfigError::invalid("clip name must not be empty"))
            }
            None if self.flags.continue_animation => Err(ConfigError::invalid(
                "continue_animation requires a clip",
            )),
            _ => Ok(()),
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
