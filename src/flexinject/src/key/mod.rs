use std::any;
use std::borrow::Cow;
use std::fmt::{Debug, Display, Formatter, Result as FmtResult};

/// An identifier under which a factory and its shared instance are stored.
///
/// Keys built from a type and keys built from a string share one keyspace.
/// A string equal to the derived name of some type refers to the same entry
/// as that type.
///
/// # Examples
///
/// ```rust
/// # use flexinject::key;
/// assert_eq!(key::named("i32"), key::of::<i32>());
/// assert_ne!(key::of::<i32>(), key::of::<i64>());
/// ```
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Key {
    name: Cow<'static, str>,
}

impl Key {
    fn new(name: Cow<'static, str>) -> Self {
        Self { name }
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl Debug for Key {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "Key({:?})", self.name)
    }
}

impl Display for Key {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.name)
    }
}

impl From<&'static str> for Key {
    fn from(name: &'static str) -> Self {
        Self::new(Cow::Borrowed(name))
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Self::new(Cow::Owned(name))
    }
}

impl From<&Key> for Key {
    fn from(key: &Key) -> Self {
        key.clone()
    }
}

/// Returns the key derived from the fully qualified name of `T`.
///
/// The name comes from [`std::any::type_name`], so it includes the crate
/// path and generic arguments, e.g. `alloc::sync::Arc<dyn app::Greeter>`.
pub fn of<T>() -> Key
where
    T: ?Sized + 'static,
{
    Key::from(any::type_name::<T>())
}

/// Returns an explicit string key.
pub fn named<N>(name: N) -> Key
where
    N: Into<Cow<'static, str>>,
{
    Key::new(name.into())
}
