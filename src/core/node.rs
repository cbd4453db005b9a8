//=========================================================================
// Nodes
//=========================================================================
//
// Identifiers and plain visual values for presentation nodes.
//
// The transition core never holds engine objects. Every node is referred
// to by a `NodeId` and all visual state crosses the `NodeVisuals` adapter
// as the small value types defined here.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use super::time::lerp;

//=== NodeId ==============================================================

/// Arena index of a presentation node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Render layer a node is drawn on (one layer per viewport camera).
pub type RenderLayer = u32;

//=== OpacityMap ==========================================================

/// Per-channel opacity of a node.
///
/// A node may be drawn by several renderers or materials; each is one
/// channel, addressed by index.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OpacityMap(Vec<f32>);

impl OpacityMap {
    pub fn new(channels: Vec<f32>) -> Self {
        Self(channels)
    }

    /// A map with `channels` channels, all fully transparent.
    pub fn transparent(channels: usize) -> Self {
        Self(vec![0.0; channels])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, channel: usize) -> Option<f32> {
        self.0.get(channel).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f32)> + '_ {
        self.0.iter().copied().enumerate()
    }

    /// Returns `true` when every channel is exactly zero.
    ///
    /// An empty map is not considered zeroed.
    pub fn is_zeroed(&self) -> bool {
        !self.0.is_empty() && self.0.iter().all(|&v| v == 0.0)
    }

    /// Interpolates channel-wise between two maps of equal length.
    ///
    /// Returns `None` when the channel counts differ.
    pub fn lerp(from: &OpacityMap, to: &OpacityMap, t: f32) -> Option<OpacityMap> {
        if from.len() != to.len() {
            return None;
        }
        Some(OpacityMap(
            from.0.iter().zip(&to.0).map(|(&a, &b)| lerp(a, b, t)).collect(),
        ))
    }
}

impl From<Vec<f32>> for OpacityMap {
    fn from(channels: Vec<f32>) -> Self {
        Self(channels)
    }
}

//=== Offset ==============================================================

/// Positional offset of a node relative to its authored anchor.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Offset {
    pub x: f32,
    pub y: f32,
}

impl Offset {
    pub const ZERO: Offset = Offset { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn lerp(from: Offset, to: Offset, t: f32) -> Offset {
        Offset {
            x: lerp(from.x, to.x, t),
            y: lerp(from.y, to.y, t),
        }
    }
}

//=== Viewport ============================================================

/// Normalized camera viewport rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const FULL: Viewport = Viewport {
        x: 0.0,
        y: 0.0,
        width: 1.0,
        height: 1.0,
    };

    pub fn lerp(from: Viewport, to: Viewport, t: f32) -> Viewport {
        Viewport {
            x: lerp(from.x, to.x, t),
            y: lerp(from.y, to.y, t),
            width: lerp(from.width, to.width, t),
            height: lerp(from.height, to.height, t),
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::FULL
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
