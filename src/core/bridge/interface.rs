//=========================================================================
// Bridge Interface
//=========================================================================
//
// Contracts between the transition core and the host presentation.
//
// The core drives renderers, animators, audio and scene activation only
// through these traits. Implementations are injected at construction
// through `TransitionContext`; the core never reaches for globals.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Sender, TrySendError};
use log::warn;
use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use crate::core::error::TransitionError;
use crate::core::node::{NodeId, OpacityMap, Offset, RenderLayer, Viewport};
use crate::core::time::Seconds;

//=== NodeVisuals =========================================================

/// Visual state of presentation nodes.
pub trait NodeVisuals: Send {
    /// Sets one opacity channel of a node.
    fn set_opacity(&mut self, node: NodeId, channel: usize, value: f32);

    /// Reads the current per-channel opacity of a node.
    fn opacity_map(&self, node: NodeId) -> Option<OpacityMap>;

    fn set_active(&mut self, node: NodeId, active: bool);

    fn render_layer(&self, node: NodeId) -> Option<RenderLayer>;

    fn set_render_layer(&mut self, node: NodeId, layer: RenderLayer);

    fn set_offset(&mut self, node: NodeId, offset: Offset);

    fn set_viewport(&mut self, camera: NodeId, viewport: Viewport);

    /// Whether a reel-like node has come to rest.
    ///
    /// Nodes that never move are always settled.
    fn is_settled(&self, _node: NodeId) -> bool {
        true
    }
}

//=== ClipAnimator ========================================================

/// Playback of the transition's animation clip.
pub trait ClipAnimator: Send {
    fn play(&mut self, clip: &str);

    fn set_playback_rate(&mut self, rate: f32);

    /// Length the clip asset reports, if the clip is known.
    fn reported_length(&self, clip: &str) -> Option<Seconds>;

    /// Detaches the animated rig from the host scene and re-parents it
    /// under the sub-scene.
    fn attach_to_subscene(&mut self);

    /// Hides the animated rig once its post-activation run is over.
    fn deactivate(&mut self);
}

//=== AudioAdapter ========================================================

/// How a background track switch is performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackSwitch {
    #[default]
    Immediate,
    CrossFade,
}

/// Audio playback. Cue timing is owned by the `AudioCueSequencer`, so
/// every call here means "now".
pub trait AudioAdapter: Send {
    fn play(&mut self, cue: &str);

    fn switch_track(&mut self, key: &str, mode: TrackSwitch);

    /// Whether this build maps `cue` to a clip.
    fn can_resolve(&self, cue: &str) -> bool;
}

//=== SceneActivationGateway ==============================================

/// Sent when a session's sub-scene has finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubsceneEnded {
    /// Session the sub-scene was activated for.
    pub session: u64,
}

/// One-way signal the gateway fires when the sub-scene ends.
///
/// Bound to the session that activated the sub-scene; the controller
/// ignores it once that session is over. Cloneable; firing after the
/// controller is gone is logged and ignored.
#[derive(Debug, Clone)]
pub struct SubsceneSignal {
    sender: Sender<SubsceneEnded>,
    session: u64,
}

impl SubsceneSignal {
    pub(crate) fn new(sender: Sender<SubsceneEnded>, session: u64) -> Self {
        Self { sender, session }
    }

    pub fn session(&self) -> u64 {
        self.session
    }

    pub fn fire(&self) {
        match self.sender.try_send(SubsceneEnded {
            session: self.session,
        }) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                warn!("Sub-scene end signal dropped: channel full");
            }
            Err(TrySendError::Disconnected(_)) => {
                warn!("Sub-scene end signal fired after the controller was dropped");
            }
        }
    }
}

/// Creates and shows the sub-scene and toggles the host scene.
pub trait SceneActivationGateway: Send {
    /// Fails with [`TransitionError::AdapterNotReady`] when the sub-scene
    /// cannot be created yet. Not retried.
    fn create_subscene(&mut self) -> Result<(), TransitionError>;

    fn show_subscene(&mut self);

    fn hide_host_scene(&mut self, hidden: bool);

    /// Registers the signal to fire once the sub-scene ends.
    fn on_subscene_ended(&mut self, signal: SubsceneSignal);
}

//=== PortalCatalog =======================================================

/// Deferred existence check for a portal object.
pub trait PortalCatalog: Send {
    /// Whether a portal object is already attached to the host scene.
    fn portal_attached(&self) -> bool;

    /// Prefab path the host's static resource map declares for `game_id`.
    fn portal_prefab_path(&self, game_id: &str) -> Option<&str>;
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::{bounded, unbounded};

    #[test]
    fn signal_delivers_its_session() {
        let (tx, rx) = unbounded();
        let signal = SubsceneSignal::new(tx, 7);

        signal.clone().fire();

        assert_eq!(signal.session(), 7);
        assert_eq!(rx.try_recv(), Ok(SubsceneEnded { session: 7 }));
    }

    #[test]
    fn signal_survives_dropped_receiver() {
        let (tx, rx) = unbounded();
        let signal = SubsceneSignal::new(tx, 1);
        drop(rx);

        signal.fire();
    }

    #[test]
    fn signal_survives_full_channel() {
        let (tx, rx) = bounded(1);
        let signal = SubsceneSignal::new(tx, 1);

        signal.fire();
        signal.fire();

        assert_eq!(rx.len(), 1);
    }
}
