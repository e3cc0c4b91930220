use std::sync::Arc;

use tokio::sync::broadcast;

use crate::change_event::ChangeEvent;
use crate::change_listener::ChangeListener;
use crate::observable::ObservableValue;
use crate::registration::Registration;

/// Number of events a lagging receiver can fall behind before it starts missing them.
pub const OBSERVER_CHANNEL_CAPACITY: usize = 16;

/// The channel closes once the returned [`Registration`] is cancelled and every
/// buffered event has been received. Dropping every receiver unregisters the
/// forwarding listener at the next change.
pub trait ChangeObserver<T>
where
    T: Send + Sync + 'static,
{
    fn observe(&self) -> (broadcast::Receiver<ChangeEvent<T>>, Registration);
}

struct BroadcastForwarder<T>
where
    T: Send + Sync + 'static,
{
    sender: broadcast::Sender<ChangeEvent<T>>,
}

impl<T> ChangeListener<T> for BroadcastForwarder<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn on_change(&self, event: &ChangeEvent<T>) -> anyhow::Result<()> {
        if self.sender.send(event.clone()).is_err() {
            log::trace!("No receiver for change event, dropping it");
        }
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.sender.receiver_count() == 0
    }
}

impl<T> ChangeObserver<T> for ObservableValue<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn observe(&self) -> (broadcast::Receiver<ChangeEvent<T>>, Registration) {
        let (sender, receiver) = broadcast::channel(OBSERVER_CHANNEL_CAPACITY);
        let registration = self.add_listener(Arc::new(BroadcastForwarder { sender }));
        (receiver, registration)
    }
}
