//=========================================================================
// Scene System
//=========================================================================
//
// Stack-based scene switching, and the activation gateway transitions use
// to bring a sub-scene up over the host scene.
//
// Architecture:
//   SceneStackGateway (SceneActivationGateway)
//     └─ SceneManager
//          ├─ scenes: HashMap<S, Box<dyn Scene>>
//          ├─ stack: Vec<S>
//          └─ hidden: HashSet<S>
//
// Flow:
//   update(dt) → collect_active_scenes() → Scene::update(dt)
//
//=========================================================================

//=== Module Declarations =================================================

mod gateway;
mod scene_manager;

//=== Public API ==========================================================

pub use gateway::SceneStackGateway;
pub use scene_manager::{SceneKey, SceneManager, SceneRequest};

//=== Internal Dependencies ===============================================

use crate::core::time::Seconds;

//=== Scene Trait =========================================================

/// Scene behavior with lifecycle hooks and update logic.
///
/// Only `update()` is required.
pub trait Scene<S: SceneKey>: Send {
    /// Called when the scene enters the stack.
    fn on_enter(&mut self) {}

    /// Called when the scene leaves the stack.
    fn on_exit(&mut self) {}

    /// Called when the scene is shown or hidden while on the stack.
    fn on_visibility_changed(&mut self, _visible: bool) {}

    /// Called every tick while the scene is active and visible.
    fn update(&mut self, dt: Seconds);

    /// Whether scenes below this one should receive updates.
    ///
    /// Transparent scenes allow underlying scenes to continue updating.
    fn is_transparent(&self) -> bool {
        false
    }
}
