//=========================================================================
// Audio Cues
//=========================================================================
//
// Authored cue keys and delays for one transition.
//
//=========================================================================

//=== External Dependencies ===============================================

use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use crate::core::bridge::TrackSwitch;
use crate::core::time::Seconds;

//=== CueSpec =============================================================

/// One cue key played after `delay` seconds.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CueSpec {
    pub key: String,
    pub delay: Seconds,
}

impl CueSpec {
    pub fn new(key: impl Into<String>, delay: Seconds) -> Self {
        Self {
            key: key.into(),
            delay,
        }
    }
}

//=== TrackSwitchSpec =====================================================

/// Background track change.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackSwitchSpec {
    pub key: String,
    pub delay: Seconds,
    pub mode: TrackSwitch,
}

impl TrackSwitchSpec {
    pub fn new(key: impl Into<String>, mode: TrackSwitch, delay: Seconds) -> Self {
        Self {
            key: key.into(),
            delay,
            mode,
        }
    }
}

//=== AudioCueSet =========================================================

/// Every cue a transition may play.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioCueSet {
    pub primary: Option<CueSpec>,
    pub secondary: Option<CueSpec>,
    pub voice_over: Option<CueSpec>,
    /// Played during pre-effects when feature-acquired effects are enabled.
    pub feature_acquired: Option<CueSpec>,
    /// Played when the reverse pipeline starts.
    pub reverse: Option<CueSpec>,
    pub background: Option<TrackSwitchSpec>,
    /// Background restored when the reverse pipeline starts.
    pub reverse_background: Option<TrackSwitchSpec>,
}

impl AudioCueSet {
    /// Cues scheduled when the fade starts.
    pub fn forward(&self) -> impl Iterator<Item = &CueSpec> {
        [&self.primary, &self.secondary, &self.voice_over]
            .into_iter()
            .flatten()
    }

    pub(crate) fn delays(&self) -> impl Iterator<Item = (&'static str, Seconds)> + '_ {
        let cues = [
            ("primary", &self.primary),
            ("secondary", &self.secondary),
            ("voice_over", &self.voice_over),
            ("feature_acquired", &self.feature_acquired),
            ("reverse", &self.reverse),
        ];
        let switches = [
            ("background", &self.background),
            ("reverse_background", &self.reverse_background),
        ];
        cues.into_iter()
            .filter_map(|(name, cue)| cue.as_ref().map(|c| (name, c.delay)))
            .chain(
                switches
                    .into_iter()
                    .filter_map(|(name, switch)| switch.as_ref().map(|s| (name, s.delay))),
            )
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
