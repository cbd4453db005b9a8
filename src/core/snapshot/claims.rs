//=========================================================================
// Node Claims
//=========================================================================
//
// Exclusive capture registry shared by every snapshot store.
//
// A node may be faded by one transition at a time. The first store to
// capture a node claims it; another owner trying to capture the same node
// fails fast instead of snapshotting an already-faded value.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

//=== Internal Dependencies ===============================================

use crate::core::error::TransitionError;
use crate::core::node::NodeId;

//=== ClaimOwner ==========================================================

/// Identity of one snapshot store in a [`NodeClaims`] registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClaimOwner(u64);

//=== NodeClaims ==========================================================

/// Cloneable handle to a shared claim registry.
#[derive(Debug, Clone, Default)]
pub struct NodeClaims {
    owners: Arc<Mutex<HashMap<NodeId, ClaimOwner>>>,
    next_owner: Arc<AtomicU64>,
}

impl NodeClaims {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<NodeId, ClaimOwner>> {
        self.owners.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Allocates a fresh owner identity.
    pub fn register_owner(&self) -> ClaimOwner {
        ClaimOwner(self.next_owner.fetch_add(1, Ordering::Relaxed))
    }

    /// Claims `node` for `owner`. Re-claiming by the same owner succeeds.
    pub fn try_claim(&self, node: NodeId, owner: ClaimOwner) -> Result<(), TransitionError> {
        let mut owners = self.lock();
        match owners.get(&node) {
            Some(&current) if current != owner => Err(TransitionError::NodeClaimed { node }),
            Some(_) => Ok(()),
            None => {
                owners.insert(node, owner);
                Ok(())
            }
        }
    }

    /// Releases `node` if `owner` holds it.
    pub fn release(&self, node: NodeId, owner: ClaimOwner) {
        let mut owners = self.lock();
        if owners.get(&node) == Some(&owner) {
            owners.remove(&node);
        }
    }

    /// Releases every node held by `owner`.
    pub fn release_all(&self, owner: ClaimOwner) {
        self.lock().retain(|_, held_by| *held_by != owner);
    }

    pub fn owner_of(&self, node: NodeId) -> Option<ClaimOwner> {
        self.lock().get(&node).copied()
    }

    /// Number of claimed nodes across all owners.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
