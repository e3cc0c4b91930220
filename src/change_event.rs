use std::fmt::Display;

use crate::observable::ObservableValue;

/// Equality and hashing include the source, which compares by its current value,
/// so an event's hash changes when its source is set again.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct ChangeEvent<T>
where
    T: Send + Sync + 'static,
{
    new_value: T,
    old_value: T,
    source: ObservableValue<T>,
}

impl<T> ChangeEvent<T>
where
    T: Send + Sync + 'static,
{
    pub(crate) fn new(new_value: T, old_value: T, source: ObservableValue<T>) -> Self {
        Self {
            new_value,
            old_value,
            source,
        }
    }

    pub fn new_value(&self) -> &T {
        &self.new_value
    }

    pub fn old_value(&self) -> &T {
        &self.old_value
    }

    pub fn source(&self) -> &ObservableValue<T> {
        &self.source
    }

    pub fn into_values(self) -> (T, T) {
        (self.new_value, self.old_value)
    }
}

impl<T> Display for ChangeEvent<T>
where
    T: Display + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ChangeEvent[source={},new_value={},old_value={}]",
            self.source, self.new_value, self.old_value
        )
    }
}
