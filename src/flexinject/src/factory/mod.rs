mod closure;

use crate::container::Managed;

pub use closure::ClosureFactory;

/// A type-erased constructor of objects of one type.
///
/// Each call to [`Factory::dyn_make`] should construct a new object. Whether
/// that object is then shared is decided by the registry, not the factory.
///
/// Usually you don't need to implement [`Factory`] manually, since this is
/// done by [`TypedFactory`]'s blanket implementation, and closures are
/// wrapped in a [`ClosureFactory`] by [`Registry::register`].
///
/// [`Registry::register`]: crate::container::Registry::register
#[cfg_attr(test, mockall::automock)]
pub trait Factory: Send + Sync + 'static {
    /// Constructs a new type-erased object.
    fn dyn_make(&self) -> Box<dyn Managed>;

    /// Returns the name of the type that [`Factory::dyn_make`] produces.
    fn output_type_name(&self) -> &'static str;
}

/// A static variant of the [`Factory`] trait.
pub trait TypedFactory: Factory {
    type Output: Managed;

    /// Constructs a new object of type [`TypedFactory::Output`].
    fn make(&self) -> Self::Output;
}

impl<T: TypedFactory> Factory for T {
    fn dyn_make(&self) -> Box<dyn Managed> {
        Box::new(self.make())
    }

    fn output_type_name(&self) -> &'static str {
        std::any::type_name::<T::Output>()
    }
}
