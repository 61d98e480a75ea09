use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::marker::PhantomData;

use crate::container::Managed;
use crate::factory::TypedFactory;

/// A [`Factory`] which constructs objects by calling a zero-argument closure.
///
/// A closure may capture a [`Registry`] handle and resolve its own
/// dependencies from it, since no registry lock is held while it runs.
///
/// # Examples
///
/// ```rust
/// # use std::sync::Arc;
/// # use flexinject::factory::{ClosureFactory, TypedFactory};
/// let factory = ClosureFactory::new(|| Arc::new(String::from("made")));
/// assert_eq!(factory.make().as_str(), "made");
/// ```
///
/// [`Factory`]: crate::factory::Factory
/// [`Registry`]: crate::container::Registry
pub struct ClosureFactory<T, F>
where
    T: Managed,
    F: Fn() -> T + Send + Sync + 'static,
{
    closure: F,
    _marker: PhantomData<fn() -> T>,
}

impl<T, F> ClosureFactory<T, F>
where
    T: Managed,
    F: Fn() -> T + Send + Sync + 'static,
{
    pub fn new(closure: F) -> Self {
        Self {
            closure,
            _marker: PhantomData,
        }
    }
}

impl<T, F> Debug for ClosureFactory<T, F>
where
    T: Managed,
    F: Fn() -> T + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ClosureFactory<T, F>")
            .finish_non_exhaustive()
    }
}

impl<T, F> TypedFactory for ClosureFactory<T, F>
where
    T: Managed,
    F: Fn() -> T + Send + Sync + 'static,
{
    type Output = T;

    fn make(&self) -> Self::Output {
        (self.closure)()
    }
}
