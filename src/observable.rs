use std::fmt::Display;
use std::hash::Hash;
use std::sync::Arc;

use anyhow::Context;
use parking_lot::Mutex;

use crate::change_event::ChangeEvent;
use crate::change_listener::ChangeListener;
use crate::listener_registry::ListenerRegistry;
use crate::registration::Registration;
use crate::value_ref::ValueRef;

type Comparator<T> = Box<dyn Fn(&T, &T) -> bool + Send + Sync>;

/// A value that notifies its listeners whenever it is replaced. Clones share the
/// value and the listeners.
///
/// Listeners run after every internal lock is released, so they may read, set or
/// (un)register re-entrantly. Concurrent setters may reach different listeners
/// interleaved.
pub struct ObservableValue<T>
where
    T: Send + Sync + 'static,
{
    inner: Arc<Inner<T>>,
}

struct Inner<T>
where
    T: Send + Sync + 'static,
{
    value: Mutex<Arc<T>>,
    same: Comparator<T>,
    listeners: Mutex<ListenerRegistry<T>>,
}

impl<T> ObservableValue<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    pub fn new(initial: T) -> Self {
        Self::with_comparator(initial, |current, candidate| current == candidate)
    }
}

impl<U> ObservableValue<Arc<U>>
where
    U: ?Sized + Send + Sync + 'static,
{
    /// Setting an equal but distinct `Arc` counts as a change.
    pub fn by_identity(initial: Arc<U>) -> Self {
        Self::with_comparator(initial, |current, candidate| Arc::ptr_eq(current, candidate))
    }
}

impl<T> ObservableValue<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// `same(current, candidate)` returns true when setting `candidate` should not
    /// notify listeners.
    pub fn with_comparator(
        initial: T,
        same: impl Fn(&T, &T) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                value: Mutex::new(Arc::new(initial)),
                same: Box::new(same),
                listeners: Mutex::new(ListenerRegistry::new()),
            }),
        }
    }

    pub fn get(&self) -> T {
        T::clone(&self.snapshot())
    }

    pub fn read(&self) -> ValueRef<T> {
        ValueRef::new(self.snapshot())
    }

    /// Always stores `new_value`. Listeners are notified, in registration order,
    /// only when the comparison policy reports a change. The first listener error
    /// aborts the remaining dispatch and is returned; the value is not rolled back.
    pub fn set(&self, new_value: T) -> anyhow::Result<()> {
        let mut value = self.inner.value.lock();
        let changed = !(self.inner.same)(&**value, &new_value);
        let old_value = std::mem::replace(&mut *value, Arc::new(new_value));
        let new_value = Arc::clone(&value);
        drop(value);

        if !changed {
            log::trace!("Value unchanged, skipping dispatch");
            return Ok(());
        }

        let old_value = Arc::try_unwrap(old_value).unwrap_or_else(|shared| T::clone(&shared));
        let event = ChangeEvent::new(T::clone(&new_value), old_value, self.clone());
        self.dispatch(&event)
    }

    fn dispatch(&self, event: &ChangeEvent<T>) -> anyhow::Result<()> {
        let listeners = self.inner.listeners.lock().snapshot();
        log::debug!("Dispatching change to {} listener(s)", listeners.len());

        for (id, listener) in listeners {
            // Cancelled by an earlier listener in this dispatch.
            if !self.inner.listeners.lock().contains(id) {
                continue;
            }
            if listener.is_closed() {
                let removed = self.inner.listeners.lock().remove(id);
                if removed.is_some() {
                    log::trace!("Dropped closed change listener #{id}");
                }
                continue;
            }
            if let Err(err) = listener.on_change(event) {
                log::warn!("Change listener #{id} failed, aborting dispatch: {err:#}");
                return Err(err).with_context(|| format!("change listener #{id} failed"));
            }
        }
        Ok(())
    }

    pub fn add_listener<L>(&self, listener: Arc<L>) -> Registration
    where
        L: ChangeListener<T> + 'static,
    {
        let id = self.inner.listeners.lock().insert(listener);
        log::trace!("Registered change listener #{id}");

        let inner = Arc::downgrade(&self.inner);
        Registration::new(move || {
            let Some(inner) = inner.upgrade() else {
                return;
            };
            let removed = inner.listeners.lock().remove(id);
            if removed.is_some() {
                log::trace!("Unregistered change listener #{id}");
            }
        })
    }

    pub fn on_change<F>(&self, listener: F) -> Registration
    where
        F: Fn(&ChangeEvent<T>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.add_listener(Arc::new(listener))
    }
}

impl<T> ObservableValue<T>
where
    T: Send + Sync + 'static,
{
    fn snapshot(&self) -> Arc<T> {
        self.inner.value.lock().clone()
    }

    /// Removes the oldest registration of this exact listener instance.
    pub fn remove_listener<L: ?Sized>(&self, listener: &Arc<L>) -> bool {
        let removed = self.inner.listeners.lock().remove_first(listener);
        match removed {
            Some((id, _)) => {
                log::trace!("Unregistered change listener #{id}");
                true
            }
            None => false,
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.lock().len()
    }

    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Arc::ptr_eq(&this.inner, &other.inner)
    }

    pub fn value_eq(&self, other: &T) -> bool
    where
        T: PartialEq,
    {
        *self.snapshot() == *other
    }
}

impl<T> Clone for ObservableValue<T>
where
    T: Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Default for ObservableValue<T>
where
    T: Default + Clone + PartialEq + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> From<T> for ObservableValue<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T> PartialEq for ObservableValue<T>
where
    T: PartialEq + Send + Sync + 'static,
{
    fn eq(&self, other: &Self) -> bool {
        Self::ptr_eq(self, other) || *self.snapshot() == *other.snapshot()
    }
}

impl<T> Eq for ObservableValue<T> where T: Eq + Send + Sync + 'static {}

impl<T> Hash for ObservableValue<T>
where
    T: Hash + Send + Sync + 'static,
{
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.snapshot().hash(state);
    }
}

impl<T> Display for ObservableValue<T>
where
    T: Display + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&*self.snapshot(), f)
    }
}

impl<T> std::fmt::Debug for ObservableValue<T>
where
    T: std::fmt::Debug + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObservableValue")
            .field("value", &*self.snapshot())
            .field("listeners", &self.listener_count())
            .finish()
    }
}
