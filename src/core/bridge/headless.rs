//=========================================================================
// Headless Adapters
//=========================================================================
//
// In-memory implementations of every bridge trait.
//
// Each adapter is a cheap clone over shared state, so one clone can be
// boxed into a `TransitionContext` while another stays with the caller for
// inspection. Every call is recorded in order. Used for dry runs of a
// transition config and throughout the test suite.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

//=== Internal Dependencies ===============================================

use super::interface::{
    AudioAdapter, ClipAnimator, NodeVisuals, SceneActivationGateway, SubsceneSignal, TrackSwitch,
};
use crate::core::error::TransitionError;
use crate::core::node::{NodeId, OpacityMap, Offset, RenderLayer, Viewport};
use crate::core::time::Seconds;

fn lock<T>(state: &Mutex<T>) -> MutexGuard<'_, T> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

//=== HeadlessVisuals =====================================================

#[derive(Debug, Default)]
struct VisualState {
    opacity: HashMap<NodeId, OpacityMap>,
    active: HashMap<NodeId, bool>,
    layers: HashMap<NodeId, RenderLayer>,
    offsets: HashMap<NodeId, Offset>,
    viewports: HashMap<NodeId, Viewport>,
    unsettled: HashSet<NodeId>,
    opacity_writes: HashMap<NodeId, usize>,
}

/// Node arena held in memory.
#[derive(Debug, Clone, Default)]
pub struct HeadlessVisuals {
    state: Arc<Mutex<VisualState>>,
}

impl HeadlessVisuals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node with the given per-channel opacity.
    pub fn with_node(self, node: NodeId, opacity: impl Into<OpacityMap>) -> Self {
        lock(&self.state).opacity.insert(node, opacity.into());
        self
    }

    pub fn with_layer(self, node: NodeId, layer: RenderLayer) -> Self {
        lock(&self.state).layers.insert(node, layer);
        self
    }

    /// Replaces a node's channels, e.g. to simulate a renderer removed
    /// mid-transition.
    pub fn replace_channels(&self, node: NodeId, opacity: impl Into<OpacityMap>) {
        lock(&self.state).opacity.insert(node, opacity.into());
    }

    pub fn set_settled(&self, node: NodeId, settled: bool) {
        let mut state = lock(&self.state);
        if settled {
            state.unsettled.remove(&node);
        } else {
            state.unsettled.insert(node);
        }
    }

    //--- Inspection -------------------------------------------------------

    pub fn opacity(&self, node: NodeId) -> Option<OpacityMap> {
        lock(&self.state).opacity.get(&node).cloned()
    }

    pub fn is_active(&self, node: NodeId) -> Option<bool> {
        lock(&self.state).active.get(&node).copied()
    }

    pub fn layer(&self, node: NodeId) -> Option<RenderLayer> {
        lock(&self.state).layers.get(&node).copied()
    }

    pub fn offset(&self, node: NodeId) -> Option<Offset> {
        lock(&self.state).offsets.get(&node).copied()
    }

    pub fn viewport(&self, camera: NodeId) -> Option<Viewport> {
        lock(&self.state).viewports.get(&camera).copied()
    }

    /// Number of `set_opacity` calls received for a node.
    pub fn opacity_writes(&self, node: NodeId) -> usize {
        lock(&self.state).opacity_writes.get(&node).copied().unwrap_or(0)
    }
}

impl NodeVisuals for HeadlessVisuals {
    fn set_opacity(&mut self, node: NodeId, channel: usize, value: f32) {
        let mut state = lock(&self.state);
        *state.opacity_writes.entry(node).or_insert(0) += 1;
        if let Some(map) = state.opacity.get_mut(&node) {
            let mut channels: Vec<f32> = map.iter().map(|(_, v)| v).collect();
            if let Some(slot) = channels.get_mut(channel) {
                *slot = value;
                *map = OpacityMap::new(channels);
            }
        }
    }

    fn opacity_map(&self, node: NodeId) -> Option<OpacityMap> {
        self.opacity(node)
    }

    fn set_active(&mut self, node: NodeId, active: bool) {
        lock(&self.state).active.insert(node, active);
    }

    fn render_layer(&self, node: NodeId) -> Option<RenderLayer> {
        self.layer(node)
    }

    fn set_render_layer(&mut self, node: NodeId, layer: RenderLayer) {
        lock(&self.state).layers.insert(node, layer);
    }

    fn set_offset(&mut self, node: NodeId, offset: Offset) {
        lock(&self.state).offsets.insert(node, offset);
    }

    fn set_viewport(&mut self, camera: NodeId, viewport: Viewport) {
        lock(&self.state).viewports.insert(camera, viewport);
    }

    fn is_settled(&self, node: NodeId) -> bool {
        !lock(&self.state).unsettled.contains(&node)
    }
}

//=== HeadlessAudio =======================================================

/// A call received by [`HeadlessAudio`].
#[derive(Debug, Clone, PartialEq)]
pub enum AudioCall {
    Play(String),
    SwitchTrack(String, TrackSwitch),
}

#[derive(Debug, Default)]
struct AudioState {
    known: HashSet<String>,
    calls: Vec<AudioCall>,
}

/// Audio sink that resolves a fixed set of cue keys.
#[derive(Debug, Clone, Default)]
pub struct HeadlessAudio {
    state: Arc<Mutex<AudioState>>,
}

impl HeadlessAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cues<I, K>(self, cues: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        lock(&self.state).known.extend(cues.into_iter().map(Into::into));
        self
    }

    pub fn calls(&self) -> Vec<AudioCall> {
        lock(&self.state).calls.clone()
    }

    /// Cue keys played so far, in order.
    pub fn played(&self) -> Vec<String> {
        lock(&self.state)
            .calls
            .iter()
            .filter_map(|call| match call {
                AudioCall::Play(cue) => Some(cue.clone()),
                AudioCall::SwitchTrack(..) => None,
            })
            .collect()
    }
}

impl AudioAdapter for HeadlessAudio {
    fn play(&mut self, cue: &str) {
        lock(&self.state).calls.push(AudioCall::Play(cue.to_owned()));
    }

    fn switch_track(&mut self, key: &str, mode: TrackSwitch) {
        lock(&self.state)
            .calls
            .push(AudioCall::SwitchTrack(key.to_owned(), mode));
    }

    fn can_resolve(&self, cue: &str) -> bool {
        lock(&self.state).known.contains(cue)
    }
}

//=== HeadlessAnimator ====================================================

/// A call received by [`HeadlessAnimator`].
#[derive(Debug, Clone, PartialEq)]
pub enum AnimatorCall {
    Play(String),
    Rate(f32),
    AttachToSubscene,
    Deactivate,
}

#[derive(Debug, Default)]
struct AnimatorState {
    lengths: HashMap<String, Seconds>,
    calls: Vec<AnimatorCall>,
}

/// Animator with authored clip lengths and no playback.
#[derive(Debug, Clone, Default)]
pub struct HeadlessAnimator {
    state: Arc<Mutex<AnimatorState>>,
}

impl HeadlessAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clip(self, clip: impl Into<String>, length: Seconds) -> Self {
        lock(&self.state).lengths.insert(clip.into(), length);
        self
    }

    pub fn calls(&self) -> Vec<AnimatorCall> {
        lock(&self.state).calls.clone()
    }
}

impl ClipAnimator for HeadlessAnimator {
    fn play(&mut self, clip: &str) {
        lock(&self.state).calls.push(AnimatorCall::Play(clip.to_owned()));
    }

    fn set_playback_rate(&mut self, rate: f32) {
        lock(&self.state).calls.push(AnimatorCall::Rate(rate));
    }

    fn reported_length(&self, clip: &str) -> Option<Seconds> {
        lock(&self.state).lengths.get(clip).copied()
    }

    fn attach_to_subscene(&mut self) {
        lock(&self.state).calls.push(AnimatorCall::AttachToSubscene);
    }

    fn deactivate(&mut self) {
        lock(&self.state).calls.push(AnimatorCall::Deactivate);
    }
}

//=== HeadlessGateway =====================================================

/// A call received by [`HeadlessGateway`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayCall {
    CreateSubscene,
    ShowSubscene,
    HideHost(bool),
}

#[derive(Debug, Default)]
struct GatewayState {
    calls: Vec<GatewayCall>,
    signal: Option<SubsceneSignal>,
}

/// Scene gateway that records activation and lets the caller end the
/// sub-scene on demand.
#[derive(Debug, Clone, Default)]
pub struct HeadlessGateway {
    state: Arc<Mutex<GatewayState>>,
}

impl HeadlessGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        lock(&self.state).calls.clone()
    }

    pub fn count(&self, call: GatewayCall) -> usize {
        lock(&self.state).calls.iter().filter(|&&c| c == call).count()
    }

    /// Fires the registered end signal. Returns `false` if none was
    /// registered yet.
    pub fn end_subscene(&self) -> bool {
        let signal = lock(&self.state).signal.clone();
        match signal {
            Some(signal) => {
                signal.fire();
                true
            }
            None => false,
        }
    }
}

impl SceneActivationGateway for HeadlessGateway {
    fn create_subscene(&mut self) -> Result<(), TransitionError> {
        lock(&self.state).calls.push(GatewayCall::CreateSubscene);
        Ok(())
    }

    fn show_subscene(&mut self) {
        lock(&self.state).calls.push(GatewayCall::ShowSubscene);
    }

    fn hide_host_scene(&mut self, hidden: bool) {
        lock(&self.state).calls.push(GatewayCall::HideHost(hidden));
    }

    fn on_subscene_ended(&mut self, signal: SubsceneSignal) {
        lock(&self.state).signal = Some(signal);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
