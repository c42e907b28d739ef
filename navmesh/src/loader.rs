//! Active navmesh holder with change notifications.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Mutex, RwLock};

use crate::mesh::NavMesh;

/// Callback invoked with the new active navmesh, or `None` when cleared.
pub type NavMeshChangedFn = dyn Fn(Option<&Arc<NavMesh>>) + Send + Sync;

/// Token returned by [`MeshLoader::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Owns the active navmesh and notifies subscribers whenever it changes.
///
/// Callbacks run synchronously on the thread that changed the mesh, after
/// the new mesh is stored and with no internal lock held, so a callback may
/// read [`navmesh`](Self::navmesh) or unsubscribe.
pub struct MeshLoader {
    navmesh: RwLock<Option<Arc<NavMesh>>>,
    subscribers: Mutex<Vec<(SubscriptionId, Arc<NavMeshChangedFn>)>>,
    next_id: AtomicU64,
}

static_assertions::assert_impl_all!(MeshLoader: Send, Sync);

impl MeshLoader {
    pub fn new() -> Self {
        Self {
            navmesh: RwLock::new(None),
            subscribers: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// The active navmesh.
    pub fn navmesh(&self) -> Option<Arc<NavMesh>> {
        self.navmesh.read().clone()
    }

    /// Register a navmesh-changed callback.
    pub fn subscribe(
        &self,
        callback: impl Fn(Option<&Arc<NavMesh>>) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers.lock().push((id, Arc::new(callback)));
        log::debug!("MeshLoader: subscription {:?} added", id);
        id
    }

    /// Remove a callback. Returns `false` if `id` was not subscribed.
    ///
    /// Once this returns the callback is never invoked by later changes.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.lock();
        let before = subscribers.len();
        subscribers.retain(|(sub, _)| *sub != id);
        let removed = subscribers.len() != before;
        if removed {
            log::debug!("MeshLoader: subscription {:?} removed", id);
        }
        removed
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }

    /// Make `navmesh` the active mesh and notify subscribers.
    pub fn set_navmesh(&self, navmesh: Arc<NavMesh>) {
        log::info!(
            "MeshLoader: navmesh changed ({} tiles, {} polys)",
            navmesh.tiles().len(),
            navmesh.poly_count()
        );
        *self.navmesh.write() = Some(Arc::clone(&navmesh));
        self.notify(Some(&navmesh));
    }

    /// Drop the active mesh and notify subscribers.
    pub fn clear(&self) {
        let previous = self.navmesh.write().take();
        if previous.is_some() {
            log::info!("MeshLoader: navmesh cleared");
        }
        self.notify(None);
    }

    fn notify(&self, navmesh: Option<&Arc<NavMesh>>) {
        let callbacks: Vec<_> = self
            .subscribers
            .lock()
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();
        for callback in callbacks {
            callback(navmesh);
        }
    }
}

impl Default for MeshLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_notifies_subscribers() {
        let loader = MeshLoader::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let last_polys = Arc::new(Mutex::new(None));

        let id = {
            let calls = Arc::clone(&calls);
            let last_polys = Arc::clone(&last_polys);
            loader.subscribe(move |mesh| {
                calls.fetch_add(1, Ordering::SeqCst);
                *last_polys.lock() = mesh.map(|m| m.poly_count());
            })
        };

        loader.set_navmesh(Arc::new(NavMesh::grid(1, 1, 2, 1.0)));
        assert_eq!(*last_polys.lock(), Some(4));
        loader.clear();
        assert_eq!(*last_polys.lock(), None);
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        assert!(loader.unsubscribe(id));
        assert!(!loader.unsubscribe(id));
        loader.clear();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_callback_may_read_loader() {
        let loader = Arc::new(MeshLoader::new());
        let seen = Arc::new(AtomicUsize::new(0));
        {
            let weak = Arc::downgrade(&loader);
            let seen = Arc::clone(&seen);
            loader.subscribe(move |_| {
                if let Some(loader) = weak.upgrade() {
                    if let Some(mesh) = loader.navmesh() {
                        seen.store(mesh.poly_count(), Ordering::SeqCst);
                    }
                }
            });
        }

        loader.set_navmesh(Arc::new(NavMesh::grid(1, 1, 3, 1.0)));
        assert_eq!(seen.load(Ordering::SeqCst), 9);
    }
}
