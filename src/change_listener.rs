use crate::change_event::ChangeEvent;

/// Returning an error stops the dispatch of that change.
pub trait ChangeListener<T>: Send + Sync
where
    T: Send + Sync + 'static,
{
    fn on_change(&self, event: &ChangeEvent<T>) -> anyhow::Result<()>;

    /// A closed listener is unregistered at the next dispatch instead of being called.
    fn is_closed(&self) -> bool {
        false
    }
}

impl<T, F> ChangeListener<T> for F
where
    T: Send + Sync + 'static,
    F: Fn(&ChangeEvent<T>) -> anyhow::Result<()> + Send + Sync,
{
    fn on_change(&self, event: &ChangeEvent<T>) -> anyhow::Result<()> {
        self(event)
    }
}

pub(crate) type AnyChangeListener<T> = std::sync::Arc<dyn ChangeListener<T>>;
