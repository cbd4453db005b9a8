//=========================================================================
// Snapshot System
//=========================================================================
//
// Makes transitions reversible: every opacity and render-layer value a
// transition mutates is captured first and restored exactly once.
//
// Architecture:
//   ResourceSnapshotStore (one per session)
//     ├─ OpacitySnapshot: node → per-channel opacity
//     ├─ LayerSnapshot:   node → render layer
//     └─ NodeClaims:      node → owning store (shared across controllers)
//
//=========================================================================

//=== Module Declarations =================================================

mod claims;
mod layer;
mod opacity;
mod store;

//=== Public API ==========================================================

pub use claims::{ClaimOwner, NodeClaims};
pub use layer::LayerSnapshot;
pub use opacity::{CaptureOutcome, OpacitySnapshot};
pub use store::{CaptureReport, ResourceSnapshotStore};
