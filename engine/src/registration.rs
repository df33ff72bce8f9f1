use std::fmt;

type Release = Box<dyn FnOnce() -> bool + Send + Sync + 'static>;

/// Handle returned by `register`; removes exactly the entry it was issued for.
///
/// Dropping the handle without calling [`Registration::unregister`] leaves the
/// entry registered.
pub struct Registration {
    id: String,
    release: Release,
}

impl Registration {
    pub(crate) fn new<F>(id: impl Into<String>, release: F) -> Self
    where
        F: FnOnce() -> bool + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            release: Box::new(release),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns false when the entry was already gone (or its registry dropped).
    pub fn unregister(self) -> bool {
        (self.release)()
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration").field("id", &self.id).finish()
    }
}
