mod core;
mod factory_map;
mod global;
mod handle;

use snafu::prelude::*;

use crate::key::Key;
use crate::util::any::AsAny;

pub use global::{
    register, register_type, remove, remove_all, remove_type, resolve, resolve_new,
    resolve_new_type, resolve_type, shared,
};
pub use handle::{Registry, RegistryBuilder};

/// Bound on every object a registry can construct and store.
pub trait Managed: AsAny + Send + Sync + 'static {}

impl<T> Managed for T where T: AsAny + Send + Sync + 'static {}

#[derive(Debug, Clone, Snafu)]
#[non_exhaustive]
pub enum ResolveError {
    #[snafu(display("could not find a dependency registered for the key {key}"))]
    #[non_exhaustive]
    NotRegistered { key: Key },
    #[snafu(display(
        "could not narrow the dependency {key} of type {found} to the requested type {expected}"
    ))]
    #[non_exhaustive]
    TypeMismatch {
        key: Key,
        expected: &'static str,
        found: &'static str,
    },
    #[snafu(display("could not construct the shared dependency {key} which depends on itself"))]
    #[non_exhaustive]
    CyclicDependency { key: Key },
    #[snafu(display("the construction of the shared dependency {key} was aborted by a panic"))]
    #[non_exhaustive]
    ConstructionAborted { key: Key },
}

impl ResolveError {
    /// Returns the key whose resolution failed.
    pub fn key(&self) -> &Key {
        match self {
            Self::NotRegistered { key }
            | Self::TypeMismatch { key, .. }
            | Self::CyclicDependency { key }
            | Self::ConstructionAborted { key } => key,
        }
    }
}
