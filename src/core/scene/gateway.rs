//=========================================================================
// Scene Stack Gateway
//=========================================================================
//
// `SceneActivationGateway` over a `SceneManager`.
//
// The controller owns one clone and the host keeps another to drive scene
// updates and to end the sub-scene. Ending the sub-scene pops it and
// fires the signal the controller registered at activation.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::scene_manager::{SceneKey, SceneManager};
use crate::core::bridge::{SceneActivationGateway, SubsceneSignal};
use crate::core::error::TransitionError;
use crate::core::time::Seconds;

//=== SceneStackGateway ===================================================

struct GatewayState<S: SceneKey> {
    manager: SceneManager<S>,
    host: S,
    subscene: S,
    signal: Option<SubsceneSignal>,
}

/// Cloneable gateway that activates `subscene` over `host`.
pub struct SceneStackGateway<S: SceneKey> {
    state: Arc<Mutex<GatewayState<S>>>,
}

impl<S: SceneKey> Clone for SceneStackGateway<S> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<S: SceneKey> SceneStackGateway<S> {
    /// Wraps `manager`. Both scenes must already be registered.
    pub fn new(manager: SceneManager<S>, host: S, subscene: S) -> Self {
        if !manager.is_registered(subscene) {
            warn!("Sub-scene {:?} is not registered; activation will fail", subscene);
        }
        Self {
            state: Arc::new(Mutex::new(GatewayState {
                manager,
                host,
                subscene,
                signal: None,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, GatewayState<S>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Updates the visible scenes.
    pub fn update(&self, dt: Seconds) {
        self.lock().manager.update(dt);
    }

    /// Pops the sub-scene and fires the end signal.
    ///
    /// Returns `false` if no transition registered for the end signal.
    pub fn finish_subscene(&self) -> bool {
        let signal = {
            let mut state = self.lock();
            let subscene = state.subscene;
            state.manager.remove(subscene);
            state.signal.take()
        };
        match signal {
            Some(signal) => {
                signal.fire();
                true
            }
            None => {
                debug!("Sub-scene finished with no transition waiting");
                false
            }
        }
    }

    /// Runs `f` with the wrapped manager.
    pub fn with_manager<R>(&self, f: impl FnOnce(&mut SceneManager<S>) -> R) -> R {
        f(&mut self.lock().manager)
    }
}

impl<S: SceneKey> SceneActivationGateway for SceneStackGateway<S> {
    fn create_subscene(&mut self) -> Result<(), TransitionError> {
        let mut state = self.lock();
        let subscene = state.subscene;
        if !state.manager.is_registered(subscene) {
            return Err(TransitionError::AdapterNotReady(format!(
                "sub-scene {:?} is not registered",
                subscene
            )));
        }
        state.manager.push(subscene);
        // Created hidden; shown separately.
        state.manager.set_visible(subscene, false);
        Ok(())
    }

    fn show_subscene(&mut self) {
        let mut state = self.lock();
        let subscene = state.subscene;
        state.manager.set_visible(subscene, true);
    }

    fn hide_host_scene(&mut self, hidden: bool) {
        let mut state = self.lock();
        let host = state.host;
        state.manager.set_visible(host, !hidden);
    }

    fn on_subscene_ended(&mut self, signal: SubsceneSignal) {
        self.lock().signal = Some(signal);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
