use std::ops::Deref;
use std::sync::Arc;

/// The value as it was when [`read`](crate::ObservableValue::read) was called.
/// Holds no lock.
pub struct ValueRef<T> {
    value: Arc<T>,
}

impl<T> ValueRef<T> {
    pub(crate) fn new(value: Arc<T>) -> Self {
        Self { value }
    }
}

impl<T> Clone for ValueRef<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
        }
    }
}

impl<T> Deref for ValueRef<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for ValueRef<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&*self.value, f)
    }
}
