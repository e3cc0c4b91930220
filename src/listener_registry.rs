use std::collections::BTreeMap;
use std::sync::Arc;

use crate::change_listener::AnyChangeListener;

pub(crate) type ListenerId = u64;

/// Listeners keyed by a monotonically increasing id, so iteration order is
/// registration order and removal never compares callbacks.
pub(crate) struct ListenerRegistry<T>
where
    T: Send + Sync + 'static,
{
    listeners: BTreeMap<ListenerId, AnyChangeListener<T>>,
    next_id: ListenerId,
}

impl<T> ListenerRegistry<T>
where
    T: Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            listeners: BTreeMap::new(),
            next_id: 0,
        }
    }

    pub fn insert(&mut self, listener: AnyChangeListener<T>) -> ListenerId {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.insert(id, listener);
        id
    }

    /// The removed listener is handed back so the caller can drop it after
    /// releasing the registry lock.
    pub fn remove(&mut self, id: ListenerId) -> Option<AnyChangeListener<T>> {
        self.listeners.remove(&id)
    }

    /// Removes the oldest registration of this exact listener instance.
    pub fn remove_first<L: ?Sized>(
        &mut self,
        listener: &Arc<L>,
    ) -> Option<(ListenerId, AnyChangeListener<T>)> {
        let target = Arc::as_ptr(listener).cast::<()>();
        let id = self
            .listeners
            .iter()
            .find(|(_, registered)| Arc::as_ptr(*registered).cast::<()>() == target)
            .map(|(id, _)| *id)?;
        self.listeners.remove(&id).map(|removed| (id, removed))
    }

    pub fn contains(&self, id: ListenerId) -> bool {
        self.listeners.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn snapshot(&self) -> Vec<(ListenerId, AnyChangeListener<T>)> {
        self.listeners
            .iter()
            .map(|(id, listener)| (*id, listener.clone()))
            .collect()
    }
}
