type Unregister = Box<dyn FnOnce() + Send + Sync>;

/// Dropping the handle leaves the listener registered.
#[must_use = "dropping a Registration keeps the listener registered with no way to remove it"]
pub struct Registration {
    unregister: Option<Unregister>,
}

impl Registration {
    pub(crate) fn new(unregister: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            unregister: Some(Box::new(unregister)),
        }
    }

    pub fn cancel(&mut self) {
        if let Some(unregister) = self.unregister.take() {
            unregister();
        }
    }

    pub fn is_active(&self) -> bool {
        self.unregister.is_some()
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("active", &self.is_active())
            .finish()
    }
}
