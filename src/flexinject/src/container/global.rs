//! The process-wide default registry and shortcuts operating on it.
//!
//! The default registry lives as long as the process and is only reset by
//! [`remove_all`], which affects every user of it. Tests touching it should
//! run serially and reset it between cases.

use once_cell::sync::Lazy;

use crate::container::{Managed, Registry, ResolveError};
use crate::key::Key;
use crate::mode::ResolveMode;

// Created on first access.
static SHARED_REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);

/// Returns the process-wide default registry.
///
/// Resolution wrappers built by [`inject`] use it unless told otherwise.
///
/// [`inject`]: crate::inject::inject
pub fn shared() -> &'static Registry {
    &SHARED_REGISTRY
}

/// Registers `factory` under `key` in the default registry.
pub fn register<T, F>(key: impl Into<Key>, factory: F)
where
    T: Managed,
    F: Fn() -> T + Send + Sync + 'static,
{
    shared().register(key, factory);
}

/// Registers `factory` under the key derived from `T` in the default registry.
pub fn register_type<T, F>(factory: F)
where
    T: Managed,
    F: Fn() -> T + Send + Sync + 'static,
{
    shared().register_type(factory);
}

/// Resolves the object registered under `key` in the default registry.
///
/// # Errors
///
/// Fails in the same cases as [`Registry::resolve`].
pub fn resolve<T>(key: impl Into<Key>, mode: ResolveMode) -> Result<T, ResolveError>
where
    T: Managed + Clone,
{
    shared().resolve(key, mode)
}

/// Resolves the object registered under the key derived from `T` in the
/// default registry.
///
/// # Errors
///
/// Fails in the same cases as [`Registry::resolve`].
pub fn resolve_type<T>(mode: ResolveMode) -> Result<T, ResolveError>
where
    T: Managed + Clone,
{
    shared().resolve_type(mode)
}

/// Constructs a new object from the factory registered under `key` in the
/// default registry. `T` need not be [`Clone`].
///
/// # Errors
///
/// Fails in the same cases as [`Registry::resolve_new`].
pub fn resolve_new<T>(key: impl Into<Key>) -> Result<T, ResolveError>
where
    T: Managed,
{
    shared().resolve_new(key)
}

/// Constructs a new object from the factory registered under the key derived
/// from `T` in the default registry.
///
/// # Errors
///
/// Fails in the same cases as [`Registry::resolve_new`].
pub fn resolve_new_type<T>() -> Result<T, ResolveError>
where
    T: Managed,
{
    shared().resolve_new_type()
}

pub fn remove(key: impl Into<Key>) {
    shared().remove(key);
}

pub fn remove_type<T>()
where
    T: ?Sized + 'static,
{
    shared().remove_type::<T>();
}

/// Resets the default registry.
pub fn remove_all() {
    shared().remove_all();
}
