//! Observable registry
//!
//! Monitoring views watch a set of live objects without the objects (or
//! the lifecycle coordinator) knowing about them. The registry keeps the
//! set and publishes add/remove events to its subscribers.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use dashmap::DashMap;
use log::debug;

use super::error::{LifecycleError, LifecycleResult};

/// Compare two shared handles by allocation, ignoring trait object metadata.
pub(crate) fn same_instance<T: ?Sized>(a: &Arc<T>, b: &Arc<T>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/// Change published to registry subscribers
pub enum RegistryEvent<T: ?Sized> {
    Added(Arc<T>),
    Removed(Arc<T>),
}

/// Handle returned by [`ObservableRegistry::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener<T> = Arc<dyn Fn(&RegistryEvent<T>) + Send + Sync>;

/// Registry of live objects with add/remove notifications
pub struct ObservableRegistry<T: ?Sized> {
    entries: DashMap<u64, Arc<T>>,
    listeners: DashMap<u64, Listener<T>>,
    next_seq: AtomicU64,
}

impl<T: ?Sized> Default for ObservableRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> ObservableRegistry<T> {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            listeners: DashMap::new(),
            next_seq: AtomicU64::new(0),
        }
    }

    fn next_seq(&self) -> u64 {
        self.next_seq.fetch_add(1, Ordering::Relaxed)
    }

    /// Add an entry and notify subscribers
    pub fn add(&self, item: Arc<T>) {
        let seq = self.next_seq();
        debug!("Registry entry {} added", seq);
        self.entries.insert(seq, item.clone());
        self.notify(&RegistryEvent::Added(item));
    }

    /// Remove an entry by identity and notify subscribers
    pub fn remove(&self, item: &Arc<T>) -> LifecycleResult<()> {
        let seq = self
            .entries
            .iter()
            .find(|entry| same_instance(entry.value(), item))
            .map(|entry| *entry.key())
            .ok_or_else(|| LifecycleError::NotFound("registry entry".to_string()))?;

        let (_, removed) = self
            .entries
            .remove(&seq)
            .ok_or_else(|| LifecycleError::NotFound("registry entry".to_string()))?;
        debug!("Registry entry {} removed", seq);
        self.notify(&RegistryEvent::Removed(removed));
        Ok(())
    }

    /// All entries in the order they were added
    pub fn list(&self) -> Vec<Arc<T>> {
        let mut entries: Vec<(u64, Arc<T>)> = self
            .entries
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();
        entries.sort_by_key(|(seq, _)| *seq);
        entries.into_iter().map(|(_, item)| item).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&RegistryEvent<T>) + Send + Sync + 'static,
    {
        let id = self.next_seq();
        self.listeners.insert(id, Arc::new(listener));
        SubscriptionId(id)
    }

    /// Returns false if the subscription was already gone
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.listeners.remove(&id.0).is_some()
    }

    fn notify(&self, event: &RegistryEvent<T>) {
        // listeners may subscribe or unsubscribe while handling an event
        let listeners: Vec<Listener<T>> = self
            .listeners
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        for listener in listeners {
            listener(event);
        }
    }
}
