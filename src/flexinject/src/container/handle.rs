use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use crate::container::core::{RegistryConfig, RegistryCore};
use crate::container::{Managed, ResolveError};
use crate::factory::{ClosureFactory, Factory};
use crate::key::{self, Key};
use crate::mode::ResolveMode;

/// A registry of factories and of the shared objects they constructed.
///
/// A [`Registry`] is a handle: clones are cheap and operate on the same
/// state. Every operation takes `&self` and may be called from any thread.
///
/// Resolution narrows the stored object to the requested type and never
/// returns an object of another type. Shared objects are cloned out of the
/// cache, so register pointer types such as `Arc<T>` when callers should
/// observe one identical instance.
///
/// # Examples
///
/// ```rust
/// # use std::sync::Arc;
/// # use flexinject::prelude::*;
/// let registry = Registry::new();
/// registry.register("greeting", || Arc::new(String::from("hello")));
///
/// let first: Arc<String> = registry.resolve("greeting", ResolveMode::Shared).unwrap();
/// let second: Arc<String> = registry.resolve("greeting", ResolveMode::Shared).unwrap();
/// assert!(Arc::ptr_eq(&first, &second));
///
/// let fresh: Arc<String> = registry.resolve("greeting", ResolveMode::New).unwrap();
/// assert!(!Arc::ptr_eq(&first, &fresh));
/// ```
#[derive(Clone)]
pub struct Registry {
    core: Arc<RegistryCore>,
}

impl Registry {
    /// Creates an empty registry with the default configuration.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Registers `factory` under `key`, replacing any factory registered
    /// before.
    ///
    /// Unless the registry is built with
    /// [`RegistryBuilder::evict_shared_on_register`], a shared object
    /// already constructed for `key` stays cached and is still returned by
    /// [`ResolveMode::Shared`] resolutions until the key is removed.
    ///
    /// Factories may run on any thread, so both the factory and its objects
    /// must be [`Send`] and [`Sync`]:
    ///
    /// ```compile_fail
    /// # use std::rc::Rc;
    /// # use flexinject::prelude::*;
    /// let registry = Registry::new();
    /// let local = Rc::new(1u8);
    /// registry.register("local", move || *local);
    /// ```
    ///
    /// ```compile_fail
    /// # use std::rc::Rc;
    /// # use flexinject::prelude::*;
    /// let registry = Registry::new();
    /// registry.register("local", || Rc::new(1u8));
    /// ```
    pub fn register<T, F>(&self, key: impl Into<Key>, factory: F)
    where
        T: Managed,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.register_factory(key, ClosureFactory::new(factory));
    }

    /// Registers `factory` under the key derived from `T`.
    pub fn register_type<T, F>(&self, factory: F)
    where
        T: Managed,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.register(key::of::<T>(), factory);
    }

    /// Registers a hand-written [`Factory`] under `key`.
    pub fn register_factory<F>(&self, key: impl Into<Key>, factory: F)
    where
        F: Factory,
    {
        self.core.register(key.into(), Arc::new(factory));
    }

    /// Resolves the object registered under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::NotRegistered`] if no factory is registered
    /// under `key`, and [`ResolveError::TypeMismatch`] if the object is not a
    /// `T`. See [`ResolveError`] for failures specific to shared objects.
    pub fn resolve<T>(&self, key: impl Into<Key>, mode: ResolveMode) -> Result<T, ResolveError>
    where
        T: Managed + Clone,
    {
        self.core.resolve(&key.into(), mode)
    }

    /// Resolves the object registered under the key derived from `T`.
    ///
    /// # Errors
    ///
    /// Fails in the same cases as [`Registry::resolve`].
    pub fn resolve_type<T>(&self, mode: ResolveMode) -> Result<T, ResolveError>
    where
        T: Managed + Clone,
    {
        self.resolve(key::of::<T>(), mode)
    }

    /// Constructs a new object from the factory registered under `key`.
    ///
    /// Equivalent to [`Registry::resolve`] with [`ResolveMode::New`], but
    /// `T` need not be [`Clone`] since the object is moved out of the
    /// factory and never cached.
    ///
    /// ```rust
    /// # use flexinject::prelude::*;
    /// struct Connection;
    ///
    /// let registry = Registry::new();
    /// registry.register_type(|| Connection);
    /// let _connection: Connection = registry.resolve_new_type().unwrap();
    /// ```
    ///
    /// Shared resolution hands out clones of the cached object and so still
    /// requires [`Clone`]:
    ///
    /// ```compile_fail
    /// # use flexinject::prelude::*;
    /// struct Connection;
    ///
    /// let registry = Registry::new();
    /// registry.register_type(|| Connection);
    /// let _connection: Connection = registry.resolve_type(ResolveMode::Shared).unwrap();
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::NotRegistered`] or
    /// [`ResolveError::TypeMismatch`].
    pub fn resolve_new<T>(&self, key: impl Into<Key>) -> Result<T, ResolveError>
    where
        T: Managed,
    {
        self.core.resolve_new(&key.into())
    }

    /// Constructs a new object from the factory registered under the key
    /// derived from `T`.
    ///
    /// # Errors
    ///
    /// Fails in the same cases as [`Registry::resolve_new`].
    pub fn resolve_new_type<T>(&self) -> Result<T, ResolveError>
    where
        T: Managed,
    {
        self.resolve_new(key::of::<T>())
    }

    pub fn contains(&self, key: impl Into<Key>) -> bool {
        self.core.contains(&key.into())
    }

    pub fn contains_type<T>(&self) -> bool
    where
        T: ?Sized + 'static,
    {
        self.contains(key::of::<T>())
    }

    /// Returns true if a shared object is cached under `key`.
    pub fn is_cached(&self, key: impl Into<Key>) -> bool {
        self.core.is_cached(&key.into())
    }

    /// Removes the factory and the shared object registered under `key`.
    /// Removing a key which is not registered does nothing.
    pub fn remove(&self, key: impl Into<Key>) {
        self.core.remove(&key.into());
    }

    pub fn remove_type<T>(&self)
    where
        T: ?Sized + 'static,
    {
        self.remove(key::of::<T>());
    }

    /// Removes every factory and every shared object.
    pub fn remove_all(&self) {
        self.core.remove_all();
    }

    /// Returns true if both handles refer to the same registry.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.core, &other.core)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for Registry {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Registry")
            .field("config", &self.core.config())
            .finish_non_exhaustive()
    }
}

/// Configures a [`Registry`] before it is built.
#[derive(Debug, Clone, Default)]
pub struct RegistryBuilder {
    config: RegistryConfig,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self {
            config: RegistryConfig::default(),
        }
    }

    /// Sets whether registering a factory drops the shared object already
    /// cached under the same key. Disabled by default.
    pub fn evict_shared_on_register(mut self, evict: bool) -> Self {
        self.config.evict_shared_on_register = evict;
        self
    }

    pub fn build(self) -> Registry {
        Registry {
            core: Arc::new(RegistryCore::new(self.config)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    use parking_lot::Mutex;

    use crate::factory::TypedFactory;

    use super::*;

    trait Greeter: Send + Sync {
        fn greet(&self) -> String;
    }

    struct EnglishGreeter {
        greeted: Mutex<usize>,
    }

    impl EnglishGreeter {
        fn new() -> Self {
            Self {
                greeted: Mutex::new(0),
            }
        }
    }

    impl Greeter for EnglishGreeter {
        fn greet(&self) -> String {
            *self.greeted.lock() += 1;
            format!("hello #{}", self.greeted.lock())
        }
    }

    struct GreeterFactory {
        made: AtomicUsize,
    }

    impl TypedFactory for GreeterFactory {
        type Output = Arc<dyn Greeter>;

        fn make(&self) -> Self::Output {
            self.made.fetch_add(1, Ordering::SeqCst);
            Arc::new(EnglishGreeter::new())
        }
    }

    #[test]
    fn registry_register_factory_succeeds() {
        let registry = Registry::new();
        registry.register_factory(
            key::of::<Arc<dyn Greeter>>(),
            GreeterFactory {
                made: AtomicUsize::new(0),
            },
        );

        let greeter = registry
            .resolve_type::<Arc<dyn Greeter>>(ResolveMode::Shared)
            .unwrap();
        let _ = registry
            .resolve_type::<Arc<dyn Greeter>>(ResolveMode::Shared)
            .unwrap();

        assert_eq!(greeter.greet(), "hello #1");
        assert!(registry.is_cached(key::of::<Arc<dyn Greeter>>()));
    }

    #[test]
    fn registry_resolve_by_key_succeeds() {
        let registry = Registry::new();
        registry.register("Dependency", || -> Arc<dyn Greeter> {
            Arc::new(EnglishGreeter::new())
        });

        let first: Arc<dyn Greeter> = registry.resolve("Dependency", ResolveMode::Shared).unwrap();
        let second: Arc<dyn Greeter> = registry.resolve("Dependency", ResolveMode::Shared).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.greet(), "hello #1");
        assert_eq!(second.greet(), "hello #2");
    }

    #[test]
    fn registry_resolve_by_type_succeeds() {
        let registry = Registry::new();
        registry.register_type(|| -> Arc<dyn Greeter> { Arc::new(EnglishGreeter::new()) });

        let first = registry
            .resolve_type::<Arc<dyn Greeter>>(ResolveMode::New)
            .unwrap();
        let second = registry
            .resolve_type::<Arc<dyn Greeter>>(ResolveMode::New)
            .unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert!(registry.contains_type::<Arc<dyn Greeter>>());
        assert!(!registry.is_cached(key::of::<Arc<dyn Greeter>>()));
    }

    #[test]
    fn registry_resolve_new_succeeds_when_object_is_not_clone() {
        struct Connection {
            id: usize,
        }

        let registry = Registry::new();
        let opened = Arc::new(AtomicUsize::new(0));
        registry.register("conn", {
            let opened = Arc::clone(&opened);
            move || Connection {
                id: opened.fetch_add(1, Ordering::SeqCst),
            }
        });
        registry.register_type({
            let opened = Arc::clone(&opened);
            move || Connection {
                id: opened.fetch_add(1, Ordering::SeqCst),
            }
        });

        let first = registry.resolve_new::<Connection>("conn").unwrap();
        let second = registry.resolve_new::<Connection>("conn").unwrap();
        let typed = registry.resolve_new_type::<Connection>().unwrap();

        assert_eq!((first.id, second.id, typed.id), (0, 1, 2));
        assert!(!registry.is_cached("conn"));
        assert!(matches!(
            registry.resolve_new::<u8>("conn"),
            Err(ResolveError::TypeMismatch { .. })
        ));
        assert!(matches!(
            registry.resolve_new::<Connection>("missing"),
            Err(ResolveError::NotRegistered { .. })
        ));
    }

    #[test]
    fn registry_resolve_fails_when_type_not_registered() {
        let registry = Registry::new();

        let res = registry.resolve_type::<Arc<dyn Greeter>>(ResolveMode::Shared);
        assert!(matches!(
            res,
            Err(ResolveError::NotRegistered { key: missing })
                if missing == key::of::<Arc<dyn Greeter>>()
        ));
    }

    #[test]
    fn registry_type_and_string_keys_share_keyspace() {
        let registry = Registry::new();
        registry.register_type(|| 7u16);

        assert_eq!(registry.resolve::<u16>("u16", ResolveMode::New).unwrap(), 7);

        registry.remove("u16");
        assert!(!registry.contains_type::<u16>());
    }

    #[test]
    fn registry_remove_type_behaves_as_never_registered() {
        let registry = Registry::new();
        registry.register_type(|| Arc::new(EnglishGreeter::new()));
        let _ = registry
            .resolve_type::<Arc<EnglishGreeter>>(ResolveMode::Shared)
            .unwrap();

        registry.remove_type::<Arc<EnglishGreeter>>();

        assert!(!registry.is_cached(key::of::<Arc<EnglishGreeter>>()));
        assert!(registry
            .resolve_type::<Arc<EnglishGreeter>>(ResolveMode::Shared)
            .is_err());
    }

    #[test]
    fn registry_clones_share_state() {
        let registry = Registry::new();
        let clone = registry.clone();
        clone.register("value", || 1u8);

        assert!(registry.ptr_eq(&clone));
        assert!(!registry.ptr_eq(&Registry::new()));
        assert_eq!(registry.resolve::<u8>("value", ResolveMode::Shared).unwrap(), 1);

        registry.remove_all();
        assert!(!clone.contains("value"));
    }

    #[test]
    fn registry_builder_evict_shared_on_register_succeeds() {
        let default = Registry::new();
        let evicting = Registry::builder().evict_shared_on_register(true).build();

        for registry in [&default, &evicting] {
            registry.register("value", || String::from("old"));
            let _ = registry.resolve::<String>("value", ResolveMode::Shared).unwrap();
            registry.register("value", || String::from("new"));
        }

        assert_eq!(
            default.resolve::<String>("value", ResolveMode::Shared).unwrap(),
            "old"
        );
        assert_eq!(
            evicting.resolve::<String>("value", ResolveMode::Shared).unwrap(),
            "new"
        );
    }

    #[test]
    fn registry_factory_may_resolve_its_dependencies() {
        let registry = Registry::new();
        let constructed = Arc::new(AtomicUsize::new(0));
        registry.register("name", || String::from("world"));
        registry.register("greeting", {
            let registry = registry.clone();
            let constructed = Arc::clone(&constructed);
            move || {
                constructed.fetch_add(1, Ordering::SeqCst);
                let name: String = registry.resolve("name", ResolveMode::Shared).unwrap();
                Arc::new(format!("hello {name}"))
            }
        });

        let greeting: Arc<String> = registry.resolve("greeting", ResolveMode::Shared).unwrap();
        assert_eq!(greeting.as_str(), "hello world");

        let handle = thread::spawn({
            let registry = registry.clone();
            move || {
                registry
                    .resolve::<Arc<String>>("greeting", ResolveMode::Shared)
                    .unwrap()
            }
        });
        let other = handle.join().expect("thread should not `panic!()`");
        assert!(Arc::ptr_eq(&greeting, &other));
        assert_eq!(constructed.load(Ordering::SeqCst), 1);

        registry.remove_all();
    }
}
