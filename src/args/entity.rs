//! Deferred entity resolution.
//!
//! The parser only stores the raw reference. Resolution runs later, on
//! demand, against whatever peer directory the caller supplies.

use std::collections::HashMap;

use parking_lot::RwLock;
use serde::Serialize;
use thiserror::Error;

/// A peer directory able to look identities up by handle or numeric id.
pub trait EntityResolver {
    type Identity;

    fn by_handle(&self, handle: &str) -> Option<Self::Identity>;

    fn by_id(&self, id: i64) -> Option<Self::Identity>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("entity not found: {raw}")]
pub struct EntityNotFound {
    pub raw: String,
}

/// Resolve a raw reference: handle first (one leading `@` stripped), then
/// numeric id. All-digit handles are still tried as handles first.
pub fn resolve_entity<R>(resolver: &R, raw: &str) -> Result<R::Identity, EntityNotFound>
where
    R: EntityResolver + ?Sized,
{
    let handle = raw.strip_prefix('@').unwrap_or(raw);
    if let Some(identity) = resolver.by_handle(handle) {
        return Ok(identity);
    }

    if let Ok(id) = raw.parse::<i64>() {
        if let Some(identity) = resolver.by_id(id) {
            return Ok(identity);
        }
    }

    tracing::debug!(raw, "entity lookup failed");
    Err(EntityNotFound {
        raw: raw.to_string(),
    })
}

/// A known peer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Peer {
    pub id: i64,
    pub handle: Option<String>,
    pub display_name: String,
}

/// In-memory peer directory, safe for concurrent readers.
///
/// Handles compare case-insensitively.
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    inner: RwLock<DirectoryInner>,
}

#[derive(Debug, Default)]
struct DirectoryInner {
    peers: HashMap<i64, Peer>,
    handles: HashMap<String, i64>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a peer, keeping the handle index in sync.
    pub fn insert(&self, peer: Peer) {
        let mut inner = self.inner.write();
        if let Some(old) = inner.peers.remove(&peer.id) {
            if let Some(handle) = old.handle {
                inner.handles.remove(&handle.to_lowercase());
            }
        }
        if let Some(handle) = &peer.handle {
            inner.handles.insert(handle.to_lowercase(), peer.id);
        }
        inner.peers.insert(peer.id, peer);
    }

    pub fn remove(&self, id: i64) -> Option<Peer> {
        let mut inner = self.inner.write();
        let peer = inner.peers.remove(&id)?;
        if let Some(handle) = &peer.handle {
            inner.handles.remove(&handle.to_lowercase());
        }
        Some(peer)
    }

    pub fn len(&self) -> usize {
        self.inner.read().peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EntityResolver for MemoryDirectory {
    type Identity = Peer;

    fn by_handle(&self, handle: &str) -> Option<Peer> {
        let inner = self.inner.read();
        let id = inner.handles.get(&handle.to_lowercase())?;
        inner.peers.get(id).cloned()
    }

    fn by_id(&self, id: i64) -> Option<Peer> {
        self.inner.read().peers.get(&id).cloned()
    }
}
