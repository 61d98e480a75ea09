use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::ops::Deref;

use crate::container::Managed;

/// A dependency resolved when the wrapper was built.
///
/// Built by [`InjectOptions::resolve`](super::InjectOptions::resolve).
pub struct Inject<T>
where
    T: Managed + Clone,
{
    value: T,
}

impl<T> Inject<T>
where
    T: Managed + Clone,
{
    pub(super) fn new(value: T) -> Self {
        Self { value }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T> Deref for Inject<T>
where
    T: Managed + Clone,
{
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl<T> Clone for Inject<T>
where
    T: Managed + Clone,
{
    fn clone(&self) -> Self {
        Self::new(self.value.clone())
    }
}

impl<T> Debug for Inject<T>
where
    T: Managed + Clone + Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_tuple("Inject").field(&self.value).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use crate::container::{Registry, ResolveError};
    use crate::inject::inject;
    use crate::mode::ResolveMode;

    #[test]
    fn inject_resolve_succeeds() {
        let registry = Registry::new();
        registry.register_type(|| Arc::new(String::from("hello")));

        let greeting = inject::<Arc<String>>().from(&registry).resolve().unwrap();
        let cached: Arc<String> = registry.resolve_type(ResolveMode::Shared).unwrap();

        assert_eq!(greeting.as_str(), "hello");
        assert!(Arc::ptr_eq(greeting.get(), &cached));
        assert!(Arc::ptr_eq(&greeting.into_inner(), &cached));
    }

    #[test]
    fn inject_resolve_invokes_registry_exactly_once() {
        let registry = Registry::new();
        let calls = Arc::new(AtomicUsize::new(0));
        registry.register("counter", {
            let calls = Arc::clone(&calls);
            move || calls.fetch_add(1, Ordering::SeqCst)
        });

        let value = inject::<usize>()
            .from(&registry)
            .named("counter")
            .mode(ResolveMode::New)
            .resolve()
            .unwrap();
        let _ = value.clone();
        let _ = *value + 1;

        assert_eq!(*value, 0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn inject_resolve_fails_when_type_mismatches() {
        let registry = Registry::new();
        registry.register("value", || 1u8);

        let res = inject::<u16>().from(&registry).named("value").resolve();
        assert!(matches!(res, Err(ResolveError::TypeMismatch { .. })));
    }
}
