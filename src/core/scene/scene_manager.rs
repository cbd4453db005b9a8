//=========================================================================
// Scene Manager
//=========================================================================
//
// Manages scene registration, stack operations, visibility and lifecycle.
//
// Scenes are stored in a HashMap by key and referenced via a stack
// of keys. This allows scenes to maintain state between activations.
// A scene can be on the stack yet hidden (the host scene while a
// sub-scene plays); hidden scenes are skipped by `update`.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::Scene;
use crate::core::time::Seconds;

//=== Scene Request =======================================================

/// Scene stack operation, queued and applied at the tick boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneRequest<K: SceneKey> {
    /// Adds a new scene to the top of the stack.
    Push(K),

    /// Removes a specific scene from the stack by key.
    Remove(K),

    /// Replaces a specific scene with another scene.
    Replace(K, K),

    /// Clears all scenes from the stack.
    Clear,
}

//=== Scene Key Trait =====================================================

/// Marker trait for scene identifiers.
///
/// Typically implemented by presentation-specific enums.
pub trait SceneKey: Clone + Copy + Eq + Hash + Debug + Send + 'static {}

//=== Scene Manager =======================================================

pub struct SceneManager<S: SceneKey> {
    scenes: HashMap<S, Box<dyn Scene<S>>>,
    stack: Vec<S>,
    hidden: HashSet<S>,
    requests: Vec<SceneRequest<S>>,
}

impl<S: SceneKey> Default for SceneManager<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SceneKey> SceneManager<S> {
    //--- Construction -----------------------------------------------------

    /// Creates a new scene manager with an empty stack.
    pub fn new() -> Self {
        Self {
            scenes: HashMap::new(),
            stack: Vec::new(),
            hidden: HashSet::new(),
            requests: Vec::new(),
        }
    }

    //--- Registration -----------------------------------------------------

    /// Registers a scene with the manager.
    ///
    /// Scenes must be registered before being pushed to the stack.
    pub fn register_scene<T>(&mut self, key: S, scene: T)
    where
        T: Scene<S> + 'static,
    {
        if self.scenes.insert(key, Box::new(scene)).is_some() {
            warn!("Scene {:?} was already registered and has been replaced", key);
        }
    }

    /// Registers a scene and pushes it onto the stack, entering it.
    pub fn register_default<T>(&mut self, key: S, scene: T)
    where
        T: Scene<S> + 'static,
    {
        self.register_scene(key, scene);
        self.push(key);
    }

    //--- Requests ---------------------------------------------------------

    /// Queues a stack operation for the next `process_requests`.
    pub fn request(&mut self, request: SceneRequest<S>) {
        self.requests.push(request);
    }

    /// Applies queued stack operations in FIFO order.
    pub fn process_requests(&mut self) {
        for request in std::mem::take(&mut self.requests) {
            match request {
                SceneRequest::Push(key) => self.push(key),
                SceneRequest::Remove(key) => self.remove(key),
                SceneRequest::Replace(old_key, new_key) => self.replace(old_key, new_key),
                SceneRequest::Clear => self.clear(),
            }
        }
    }

    pub fn pending_requests(&self) -> usize {
        self.requests.len()
    }

    //--- Stack Operations -------------------------------------------------

    pub fn push(&mut self, key: S) {
        if self.stack.contains(&key) {
            warn!("Scene {:?} is already in the stack, skipping push", key);
            return;
        }
        let Some(scene) = self.scenes.get_mut(&key) else {
            warn!("Attempted to push unregistered scene {:?}", key);
            return;
        };

        debug!("Pushing scene {:?} onto stack", key);
        self.stack.push(key);
        scene.on_enter();
    }

    pub fn remove(&mut self, key: S) {
        let Some(pos) = self.stack.iter().position(|&k| k == key) else {
            debug!("Scene {:?} not found in stack, skipping removal", key);
            return;
        };

        debug!("Removing scene {:?} from stack at position {}", key, pos);
        self.stack.remove(pos);
        self.hidden.remove(&key);
        if let Some(scene) = self.scenes.get_mut(&key) {
            scene.on_exit();
        }
    }

    pub fn replace(&mut self, old_key: S, new_key: S) {
        let Some(pos) = self.stack.iter().position(|&k| k == old_key) else {
            warn!("Scene {:?} not found in stack, skipping replacement", old_key);
            return;
        };
        if self.stack.contains(&new_key) {
            warn!("Scene {:?} is already in the stack, skipping replacement", new_key);
            return;
        }
        if !self.scenes.contains_key(&new_key) {
            warn!("Attempted to replace with unregistered scene {:?}", new_key);
            return;
        }

        debug!("Replacing scene {:?} with {:?} at position {}", old_key, new_key, pos);
        if let Some(scene) = self.scenes.get_mut(&old_key) {
            scene.on_exit();
        }
        self.hidden.remove(&old_key);
        self.stack[pos] = new_key;
        if let Some(scene) = self.scenes.get_mut(&new_key) {
            scene.on_enter();
        }
    }

    pub fn clear(&mut self) {
        debug!("Clearing all scenes from stack");
        for key in self.stack.drain(..) {
            if let Some(scene) = self.scenes.get_mut(&key) {
                scene.on_exit();
            }
        }
        self.hidden.clear();
    }

    //--- Visibility -------------------------------------------------------

    /// Shows or hides a scene on the stack.
    ///
    /// Only actual changes reach `on_visibility_changed`.
    pub fn set_visible(&mut self, key: S, visible: bool) {
        if !self.stack.contains(&key) {
            warn!("Cannot change visibility of {:?}: not in the stack", key);
            return;
        }
        let changed = if visible {
            self.hidden.remove(&key)
        } else {
            self.hidden.insert(key)
        };
        if changed {
            debug!("Scene {:?} is now {}", key, if visible { "visible" } else { "hidden" });
            if let Some(scene) = self.scenes.get_mut(&key) {
                scene.on_visibility_changed(visible);
            }
        }
    }

    pub fn is_visible(&self, key: S) -> bool {
        self.stack.contains(&key) && !self.hidden.contains(&key)
    }

    //--- Update Loop ------------------------------------------------------

    /// Updates every visible transparent scene and the topmost opaque one.
    pub fn update(&mut self, dt: Seconds) {
        for key in self.collect_active_scenes() {
            if let Some(scene) = self.scenes.get_mut(&key) {
                scene.update(dt);
            }
        }
    }

    fn collect_active_scenes(&self) -> Vec<S> {
        let mut active = Vec::new();

        // Top-down, stop at the first visible opaque scene.
        for &key in self.stack.iter().rev() {
            if self.hidden.contains(&key) {
                continue;
            }
            active.insert(0, key);

            if let Some(scene) = self.scenes.get(&key) {
                if !scene.is_transparent() {
                    break;
                }
            }
        }

        active
    }

    //--- Queries ----------------------------------------------------------

    pub fn stack(&self) -> &[S] {
        &self.stack
    }

    pub fn top(&self) -> Option<S> {
        self.stack.last().copied()
    }

    pub fn contains(&self, key: S) -> bool {
        self.stack.contains(&key)
    }

    pub fn is_registered(&self, key: S) -> bool {
        self.scenes.contains_key(&key)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
    enum TestScene {
        Base,
        Bonus,
        Overlay,
    }

    impl SceneKey for TestScene {}

    #[derive(Clone, Default)]
    struct Tracker {
        log: Arc<Mutex<Vec<String>>>,
        transparent: bool,
    }

    impl Tracker {
        fn transparent() -> Self {
            Self {
                transparent: true,
                ..Self::default()
            }
        }

        fn events(&self) -> Vec<String> {
            self.log.lock().unwrap().clone()
        }
    }

    impl Scene<TestScene> for Tracker {
        fn on_enter(&mut self) {
            self.log.lock().unwrap().push("enter".into());
        }

        fn on_exit(&mut self) {
            self.log.lock().unwrap().push("exit".into());
        }

        fn on_visibility_changed(&mut self, visible: bool) {
            self.log.lock().unwrap().push(format!("visible={visible}"));
        }

        fn update(&mut self, _dt: Seconds) {
            self.log.lock().unwrap().push("update".into());
        }

        fn is_transparent(&self) -> bool {
            self.transparent
        }
    }

    #[test]
    fn push_enters_and_remove_exits() {
        let tracker = Tracker::default();
        let mut manager = SceneManager::new();
        manager.register_scene(TestScene::Bonus, tracker.clone());

        manager.push(TestScene::Bonus);
        manager.push(TestScene::Bonus);
        manager.remove(TestScene::Bonus);

        assert_eq!(tracker.events(), ["enter", "exit"]);
        assert!(manager.stack().is_empty());
    }

    #[test]
    fn unregistered_push_is_ignored() {
        let mut manager: SceneManager<TestScene> = SceneManager::new();
        manager.push(TestScene::Bonus);
        assert!(manager.stack().is_empty());
    }

    #[test]
    fn requests_apply_in_order() {
        let mut manager = SceneManager::new();
        manager.register_default(TestScene::Base, Tracker::default());
        manager.register_scene(TestScene::Bonus, Tracker::default());
        manager.register_scene(TestScene::Overlay, Tracker::default());

        manager.request(SceneRequest::Push(TestScene::Bonus));
        manager.request(SceneRequest::Replace(TestScene::Bonus, TestScene::Overlay));
        assert_eq!(manager.pending_requests(), 2);

        manager.process_requests();
        assert_eq!(manager.stack(), [TestScene::Base, TestScene::Overlay]);

        manager.request(SceneRequest::Clear);
        manager.process_requests();
        assert!(manager.stack().is_empty());
    }

    #[test]
    fn opaque_top_blocks_updates_below() {
        let base = Tracker::default();
        let bonus = Tracker::default();
        let mut manager = SceneManager::new();
        manager.register_default(TestScene::Base, base.clone());
        manager.register_default(TestScene::Bonus, bonus.clone());

        manager.update(0.016);

        assert!(!base.events().contains(&"update".to_string()));
        assert!(bonus.events().contains(&"update".to_string()));
    }

    #[test]
    fn transparent_top_lets_updates_through() {
        let base = Tracker::default();
        let mut manager = SceneManager::new();
        manager.register_default(TestScene::Base, base.clone());
        manager.register_default(TestScene::Overlay, Tracker::transparent());

        manager.update(0.016);
        assert!(base.events().contains(&"update".to_string()));
    }

    #[test]
    fn hidden_scene_is_skipped_and_notified_once() {
        let base = Tracker::default();
        let mut manager = SceneManager::new();
        manager.register_default(TestScene::Base, base.clone());

        manager.set_visible(TestScene::Base, false);
        manager.set_visible(TestScene::Base, false);
        manager.update(0.016);
        assert!(!manager.is_visible(TestScene::Base));

        manager.set_visible(TestScene::Base, true);
        assert_eq!(base.events(), ["enter", "visible=false", "visible=true"]);
    }
}
