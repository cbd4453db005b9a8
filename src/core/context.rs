//=========================================================================
// Transition Context
//=========================================================================
//
// Adapters a controller drives, injected once at construction.
//
// Contains:
// - visuals:  node opacity, activity, layers, offsets, viewports
// - audio:    cue playback and background tracks
// - gateway:  sub-scene creation and host visibility
// - animator: transition clip playback (optional)
// - portal:   portal catalog probed by portal triggers
// - claims:   exclusive node ownership shared with other controllers
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::bridge::{
    AudioAdapter, ClipAnimator, NodeVisuals, PortalCatalog, SceneActivationGateway,
};
use crate::core::snapshot::NodeClaims;
use crate::core::trigger::StaticPortalCatalog;

//=== TransitionContext ===================================================

/// Everything a `TransitionController` talks to.
///
/// Controllers that may touch the same nodes must share one `NodeClaims`
/// registry (see [`TransitionContext::with_claims`]); that is how double
/// capture across controllers is detected.
pub struct TransitionContext {
    pub visuals: Box<dyn NodeVisuals>,
    pub audio: Box<dyn AudioAdapter>,
    pub gateway: Box<dyn SceneActivationGateway>,
    pub animator: Option<Box<dyn ClipAnimator>>,
    pub portal: Box<dyn PortalCatalog>,
    pub claims: NodeClaims,
}

impl TransitionContext {
    /// Creates a context with no animator, an empty portal catalog and a
    /// private claims registry.
    pub fn new(
        visuals: impl NodeVisuals + 'static,
        audio: impl AudioAdapter + 'static,
        gateway: impl SceneActivationGateway + 'static,
    ) -> Self {
        Self {
            visuals: Box::new(visuals),
            audio: Box::new(audio),
            gateway: Box::new(gateway),
            animator: None,
            portal: Box::new(StaticPortalCatalog::new()),
            claims: NodeClaims::new(),
        }
    }

    pub fn with_animator(mut self, animator: impl ClipAnimator + 'static) -> Self {
        self.animator = Some(Box::new(animator));
        self
    }

    pub fn with_portal(mut self, portal: impl PortalCatalog + 'static) -> Self {
        self.portal = Box::new(portal);
        self
    }

    pub fn with_claims(mut self, claims: NodeClaims) -> Self {
        self.claims = claims;
        self
    }
}

impl std::fmt::Debug for TransitionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionContext")
            .field("animator", &self.animator.is_some())
            .field("claims", &self.claims.len())
            .finish_non_exhaustive()
    }
}
