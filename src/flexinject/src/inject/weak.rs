use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::{Arc, Weak};

/// A weak reference to a dependency resolved when the wrapper was built.
///
/// Built by [`InjectOptions::weak`](super::InjectOptions::weak). The wrapper
/// never keeps the dependency alive. A shared dependency lives as long as the
/// registry caches it, or as long as anything else holds a strong reference.
pub struct WeakInject<T>
where
    T: ?Sized,
{
    object: Weak<T>,
}

impl<T> WeakInject<T>
where
    T: ?Sized,
{
    pub(super) fn new(object: Weak<T>) -> Self {
        Self { object }
    }

    /// Returns the dependency, or `None` once nothing owns it any more.
    pub fn get(&self) -> Option<Arc<T>> {
        self.object.upgrade()
    }

    pub fn is_alive(&self) -> bool {
        self.object.strong_count() > 0
    }
}

impl<T> Clone for WeakInject<T>
where
    T: ?Sized,
{
    fn clone(&self) -> Self {
        Self::new(Weak::clone(&self.object))
    }
}

impl<T> Debug for WeakInject<T>
where
    T: ?Sized,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("WeakInject")
            .field("alive", &self.is_alive())
            .finish()
    }
}
