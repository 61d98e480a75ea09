use std::fmt::{Debug, Formatter, Result as FmtResult};

use once_cell::sync::OnceCell;

use crate::container::{Managed, ResolveError};
use crate::inject::{inject, InjectOptions};

/// A dependency resolved on first access.
///
/// Building a [`LazyInject`] never touches the registry, so it may be created
/// before the dependency is registered. The first successful resolution is
/// kept for the lifetime of the wrapper. A failed one is not, and the next
/// access tries again.
///
/// # Examples
///
/// ```rust
/// # use std::sync::Arc;
/// # use flexinject::prelude::*;
/// let registry = Registry::new();
/// let number = inject::<Arc<u32>>().from(&registry).lazy();
/// assert!(number.get().is_err());
///
/// registry.register_type(|| Arc::new(42u32));
/// assert_eq!(**number.get().unwrap(), 42);
/// assert!(number.is_resolved());
/// ```
pub struct LazyInject<T>
where
    T: Managed + Clone,
{
    options: InjectOptions<T>,
    value: OnceCell<T>,
}

impl<T> LazyInject<T>
where
    T: Managed + Clone,
{
    pub(super) fn new(options: InjectOptions<T>) -> Self {
        Self {
            options,
            value: OnceCell::new(),
        }
    }

    /// Returns the dependency, resolving it if this is the first successful
    /// access.
    ///
    /// # Errors
    ///
    /// Fails in the same cases as
    /// [`Registry::resolve`](crate::container::Registry::resolve).
    pub fn get(&self) -> Result<&T, ResolveError> {
        self.value.get_or_try_init(|| self.options.resolve_value())
    }

    /// Returns the dependency, resolving it if this is the first successful
    /// access.
    ///
    /// # Panics
    ///
    /// Panics if the dependency can't be resolved.
    pub fn value(&self) -> &T {
        match self.get() {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.value.get().is_some()
    }
}

impl<T> Default for LazyInject<T>
where
    T: Managed + Clone,
{
    /// Resolves `T` from the default registry under its type key.
    fn default() -> Self {
        inject::<T>().lazy()
    }
}

impl<T> Debug for LazyInject<T>
where
    T: Managed + Clone,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("LazyInject")
            .field("options", &self.options)
            .field("resolved", &self.is_resolved())
            .finish()
    }
}
