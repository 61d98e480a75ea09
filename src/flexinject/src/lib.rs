#![allow(clippy::new_without_default)]

pub mod container;
pub mod factory;
pub mod inject;
pub mod key;
pub mod mode;
mod util;

pub use container::{
    register, register_type, remove, remove_all, remove_type, resolve, resolve_new,
    resolve_new_type, resolve_type, shared, Registry, ResolveError,
};
pub use mode::ResolveMode;

pub mod prelude {
    pub use crate::container::{shared, Registry, RegistryBuilder, ResolveError};
    pub use crate::inject::{inject, Inject, LazyInject, WeakInject};
    pub use crate::key;
    pub use crate::mode::ResolveMode;
}
