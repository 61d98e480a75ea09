//! Values populated by resolving a dependency from a registry.
//!
//! Start with [`inject`], adjust where and how the dependency is resolved,
//! then pick one of three wrappers:
//!
//! - [`InjectOptions::resolve`] resolves immediately into an [`Inject`].
//! - [`InjectOptions::lazy`] defers resolution to the first access of a
//!   [`LazyInject`], which lets mutually dependent objects be declared before
//!   their factories are registered.
//! - [`InjectOptions::weak`] resolves immediately but only keeps a
//!   [`WeakInject`], which observes the object while something else owns it.
//!
//! # Examples
//!
//! ```rust
//! # use std::sync::Arc;
//! # use flexinject::prelude::*;
//! let registry = Registry::new();
//! let greeting = inject::<Arc<String>>().from(&registry).named("greeting").lazy();
//!
//! registry.register("greeting", || Arc::new(String::from("hello")));
//! assert_eq!(greeting.value().as_str(), "hello");
//! ```

mod immediate;
mod lazy;
mod weak;

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::marker::PhantomData;
use std::sync::Arc;

use crate::container::{self, Managed, Registry, ResolveError};
use crate::key::{self, Key};
use crate::mode::ResolveMode;

pub use immediate::Inject;
pub use lazy::LazyInject;
pub use weak::WeakInject;

/// Starts describing how a `T` is resolved.
///
/// By default the dependency is resolved from the process-wide default
/// registry, under the key derived from `T`, in [`ResolveMode::Shared`].
pub fn inject<T>() -> InjectOptions<T>
where
    T: Managed + Clone,
{
    InjectOptions::new(container::shared().clone(), None, ResolveMode::default())
}

/// The registry, key and mode a resolution wrapper resolves with.
pub struct InjectOptions<T>
where
    T: Managed + Clone,
{
    registry: Registry,
    key: Option<Key>,
    mode: ResolveMode,
    _marker: PhantomData<fn() -> T>,
}

impl<T> InjectOptions<T>
where
    T: Managed + Clone,
{
    fn new(registry: Registry, key: Option<Key>, mode: ResolveMode) -> Self {
        Self {
            registry,
            key,
            mode,
            _marker: PhantomData,
        }
    }

    /// Resolves from `registry` instead of the default registry.
    pub fn from(self, registry: &Registry) -> Self {
        Self::new(registry.clone(), self.key, self.mode)
    }

    /// Resolves under an explicit key instead of the key derived from `T`.
    pub fn named(self, key: impl Into<Key>) -> Self {
        Self::new(self.registry, Some(key.into()), self.mode)
    }

    pub fn mode(self, mode: ResolveMode) -> Self {
        Self::new(self.registry, self.key, mode)
    }

    /// Returns the key that will be resolved.
    pub fn key(&self) -> Key {
        self.key.clone().unwrap_or_else(key::of::<T>)
    }

    /// Resolves the dependency now.
    ///
    /// # Errors
    ///
    /// Fails in the same cases as [`Registry::resolve`].
    pub fn resolve(self) -> Result<Inject<T>, ResolveError> {
        self.resolve_value().map(Inject::new)
    }

    /// Resolves the dependency now.
    ///
    /// # Panics
    ///
    /// Panics if the dependency can't be resolved. A missing or mistyped
    /// registration is a programming error and this surfaces it at once.
    pub fn resolve_or_panic(self) -> Inject<T> {
        match self.resolve() {
            Ok(inject) => inject,
            Err(err) => panic!("{err}"),
        }
    }

    /// Defers resolution to the first access of the returned wrapper.
    pub fn lazy(self) -> LazyInject<T> {
        LazyInject::new(self)
    }

    fn resolve_value(&self) -> Result<T, ResolveError> {
        self.registry.resolve(self.key(), self.mode)
    }
}

impl<T> InjectOptions<Arc<T>>
where
    T: ?Sized + Send + Sync + 'static,
{
    /// Resolves the dependency now and keeps only a weak reference to it.
    ///
    /// Combining this with [`ResolveMode::New`] is discouraged: nothing else
    /// owns the newly constructed object, so it is dropped before the
    /// wrapper can be read.
    ///
    /// Only dependencies held in an [`Arc`] can be observed weakly:
    ///
    /// ```compile_fail
    /// # use flexinject::prelude::*;
    /// let _ = inject::<String>().weak();
    /// ```
    ///
    /// # Errors
    ///
    /// Fails in the same cases as [`Registry::resolve`].
    pub fn weak(self) -> Result<WeakInject<T>, ResolveError> {
        let object = self.resolve_value()?;
        Ok(WeakInject::new(Arc::downgrade(&object)))
    }
}

impl<T> Clone for InjectOptions<T>
where
    T: Managed + Clone,
{
    fn clone(&self) -> Self {
        Self::new(self.registry.clone(), self.key.clone(), self.mode)
    }
}

impl<T> Debug for InjectOptions<T>
where
    T: Managed + Clone,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("InjectOptions")
            .field("key", &self.key())
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inject_options_default_to_shared_registry_type_key_and_shared_mode() {
        let options = inject::<Arc<u32>>();

        assert!(options.registry.ptr_eq(container::shared()));
        assert_eq!(options.key(), key::of::<Arc<u32>>());
        assert_eq!(options.mode, ResolveMode::Shared);
    }

    #[test]
    fn inject_options_override_succeeds() {
        let registry = Registry::new();
        let options = inject::<Arc<u32>>()
            .from(&registry)
            .named("number")
            .mode(ResolveMode::New);

        assert!(options.registry.ptr_eq(&registry));
        assert_eq!(options.key(), key::named("number"));
        assert_eq!(options.mode, ResolveMode::New);
    }

    #[test]
    #[should_panic(expected = "could not find a dependency registered for the key missing")]
    fn inject_options_resolve_or_panic_fails_when_not_registered() {
        let registry = Registry::new();
        let _ = inject::<u8>().from(&registry).named("missing").resolve_or_panic();
    }
}
