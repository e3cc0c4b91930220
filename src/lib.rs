mod change_event;
mod change_listener;
mod change_observer;
mod listener_registry;
mod observable;
mod registration;
mod value_ref;

pub use change_event::ChangeEvent;
pub use change_listener::ChangeListener;
pub use change_observer::{ChangeObserver, OBSERVER_CHANNEL_CAPACITY};
pub use observable::ObservableValue;
pub use registration::Registration;
pub use value_ref::ValueRef;
