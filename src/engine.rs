//=========================================================================
// Transition Engine
//
// Fixed-rate driver that feeds host events into a transition controller.
//
// Architecture:
// ```text
//     TransitionEngineBuilder ──build()──> TransitionEngine ──run()/spawn()──> [Runtime]
//         │                                    │
//         ├─ with_tps()                        ├─ step(): one frame
//         └─ with_channel_capacity()           └─ sender(): host → engine
// ```
//
// Each frame:
//   1. EventCollector drains SequencerEvents (bounded)
//   2. outcomes go to TransitionController::on_outcome
//   3. sub-scene end signals go to notify_subscene_ended
//   4. TransitionController::tick(1 / tps)
//
//=========================================================================

//=== External Dependencies ===============================================

use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Sender};
use log::{debug, info};

//=== Internal Dependencies ===============================================

use crate::core::bridge::{EventCollector, SequencerEvent, TickControl};
use crate::core::time::Seconds;
use crate::core::transition::TransitionController;

//=== TransitionEngineBuilder =============================================

/// Builder for configuring and constructing a [`TransitionEngine`].
///
/// # Default Values
///
/// - **TPS**: 60.0 (ticks per second)
/// - **Channel capacity**: 128 events
///
/// # Examples
///
/// ```no_run
/// # use aetheric_transitions::prelude::*;
/// # fn controller() -> TransitionController { unimplemented!() }
/// let engine = TransitionEngineBuilder::new()
///     .with_tps(120.0)
///     .with_channel_capacity(256)
///     .build(controller());
///
/// let host = engine.sender();
/// let handle = engine.spawn();
/// host.send(SequencerEvent::Shutdown).unwrap();
/// let controller = handle.join().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct TransitionEngineBuilder {
    tps: f64,
    channel_capacity: usize,
}

impl TransitionEngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            tps: 60.0,
            channel_capacity: 128,
        }
    }

    /// Sets the target ticks per second.
    ///
    /// Every tick advances the controller by exactly `1 / tps` seconds of
    /// presentation time, whatever the wall clock did.
    ///
    /// # Panics
    ///
    /// Panics if `tps <= 0.0`.
    pub fn with_tps(mut self, tps: f64) -> Self {
        assert!(tps > 0.0, "TPS must be positive, got {}", tps);
        self.tps = tps;
        self
    }

    /// Sets the channel capacity for host → engine events.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    /// Builds an engine driving `controller`.
    pub fn build(self, controller: TransitionController) -> TransitionEngine {
        info!(
            "Building transition engine (TPS: {}, channel: {})",
            self.tps, self.channel_capacity
        );
        let (sender, receiver) = bounded(self.channel_capacity);

        TransitionEngine {
            controller,
            collector: EventCollector::new(receiver),
            sender,
            tps: self.tps,
            channel_capacity: self.channel_capacity,
        }
    }
}

impl Default for TransitionEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== TransitionEngine ====================================================

pub struct TransitionEngine {
    controller: TransitionController,
    collector: EventCollector,
    sender: Sender<SequencerEvent>,
    tps: f64,
    channel_capacity: usize,
}

impl TransitionEngine {
    /// A sender for host events.
    pub fn sender(&self) -> Sender<SequencerEvent> {
        self.sender.clone()
    }

    pub fn controller(&self) -> &TransitionController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut TransitionController {
        &mut self.controller
    }

    pub fn into_controller(self) -> TransitionController {
        self.controller
    }

    /// Presentation time advanced per tick.
    pub fn tick_duration(&self) -> Seconds {
        (1.0 / self.tps) as Seconds
    }

    pub fn channel_capacity(&self) -> usize {
        self.channel_capacity
    }

    //--- Execution --------------------------------------------------------

    /// Runs one frame without sleeping.
    pub fn step(&mut self) -> TickControl {
        let dt = self.tick_duration();
        step_frame(&mut self.controller, &mut self.collector, dt)
    }

    /// Runs at the configured rate until a `Shutdown` event arrives or
    /// every external sender is dropped. Returns the controller.
    pub fn run(self) -> TransitionController {
        let Self {
            mut controller,
            mut collector,
            sender,
            tps,
            ..
        } = self;
        // Only external senders keep the engine alive.
        drop(sender);

        info!("Starting transition engine (TPS: {})", tps);
        let frame_duration = Duration::from_secs_f64(1.0 / tps);
        let dt = frame_duration.as_secs_f32();

        loop {
            let frame_start = Instant::now();

            if step_frame(&mut controller, &mut collector, dt) == TickControl::Exit {
                info!("Transition engine exiting");
                break;
            }

            let elapsed = frame_start.elapsed();
            if elapsed < frame_duration {
                thread::sleep(frame_duration - elapsed);
            }
        }
        controller
    }

    /// Runs the engine on its own thread.
    pub fn spawn(self) -> thread::JoinHandle<TransitionController> {
        thread::spawn(move || self.run())
    }
}

impl std::fmt::Debug for TransitionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionEngine")
            .field("controller", &self.controller)
            .field("tps", &self.tps)
            .field("channel_capacity", &self.channel_capacity)
            .finish_non_exhaustive()
    }
}

fn step_frame(
    controller: &mut TransitionController,
    collector: &mut EventCollector,
    dt: Seconds,
) -> TickControl {
    if collector.collect_frame() == TickControl::Exit {
        return TickControl::Exit;
    }

    for outcome in collector.take_outcomes() {
        let response = controller.on_outcome(&outcome);
        debug!("Outcome {:?}: {:?}", outcome.name, response);
    }
    if collector.subscene_ended() > 0 {
        controller.notify_subscene_ended();
    }

    controller.tick(dt);
    TickControl::Continue
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bridge::headless::{HeadlessAudio, HeadlessGateway, HeadlessVisuals};
    use crate::core::config::TransitionConfig;
    use crate::core::context::TransitionContext;
    use crate::core::transition::Stage;
    use crate::core::trigger::{FeatureCategory, OutcomeSnapshot, TriggerConfig};

    fn controller() -> TransitionController {
        let context = TransitionContext::new(
            HeadlessVisuals::new(),
            HeadlessAudio::new(),
            HeadlessGateway::new(),
        );
        TransitionController::new(
            TransitionConfig::new(TriggerConfig::by_category(FeatureCategory::Gifting)),
            context,
        )
    }

    //=====================================================================
    // TransitionEngineBuilder Tests
    //=====================================================================

    #[test]
    fn builder_defaults() {
        let builder = TransitionEngineBuilder::new();
        assert_eq!(builder.tps, 60.0);
        assert_eq!(builder.channel_capacity, 128);
    }

    #[test]
    #[should_panic(expected = "TPS must be positive")]
    fn builder_with_tps_panics_on_zero() {
        TransitionEngineBuilder::new().with_tps(0.0);
    }

    #[test]
    #[should_panic(expected = "TPS must be positive")]
    fn builder_with_tps_panics_on_negative() {
        TransitionEngineBuilder::new().with_tps(-60.0);
    }

    #[test]
    #[should_panic(expected = "Channel capacity must be positive")]
    fn builder_with_channel_capacity_panics_on_zero() {
        TransitionEngineBuilder::new().with_channel_capacity(0);
    }

    #[test]
    fn builder_fluent_api_chaining() {
        let engine = TransitionEngineBuilder::new()
            .with_tps(120.0)
            .with_channel_capacity(256)
            .build(controller());

        assert_eq!(engine.tps, 120.0);
        assert_eq!(engine.channel_capacity(), 256);
        assert!((engine.tick_duration() - 1.0 / 120.0).abs() < 1e-6);
    }

    //=====================================================================
    // TransitionEngine Tests
    //=====================================================================

    #[test]
    fn step_forwards_outcomes_and_ticks() {
        let mut engine = TransitionEngineBuilder::new().build(controller());
        let host = engine.sender();

        let outcome = OutcomeSnapshot::named("free_spins")
            .feature()
            .with_pending(FeatureCategory::Gifting, "free_spins");
        host.send(SequencerEvent::Outcome(outcome)).unwrap();

        assert_eq!(engine.step(), TickControl::Continue);
        assert_eq!(engine.controller().stage(), Stage::PreEffects);
        assert!(engine.controller().elapsed() > 0.0);
    }

    #[test]
    fn step_exits_on_shutdown() {
        let mut engine = TransitionEngineBuilder::new().build(controller());
        engine.sender().send(SequencerEvent::Shutdown).unwrap();
        assert_eq!(engine.step(), TickControl::Exit);
    }

    #[test]
    fn spawned_engine_returns_controller_on_shutdown() {
        let engine = TransitionEngineBuilder::new().with_tps(240.0).build(controller());
        let host = engine.sender();
        let handle = engine.spawn();

        host.send(SequencerEvent::Shutdown).unwrap();
        let controller = handle.join().unwrap();
        assert_eq!(controller.stage(), Stage::Idle);
    }

    #[test]
    fn spawned_engine_exits_when_host_disconnects() {
        let engine = TransitionEngineBuilder::new().with_tps(240.0).build(controller());
        let host = engine.sender();
        let handle = engine.spawn();

        drop(host);
        assert!(handle.join().is_ok());
    }
}
