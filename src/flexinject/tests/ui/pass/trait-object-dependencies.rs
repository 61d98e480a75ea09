use std::sync::Arc;

use flexinject::prelude::*;

pub trait Repository: Send + Sync {
    fn find(&self, id: u32) -> Option<String>;
}

pub struct MemoryRepository;

impl Repository for MemoryRepository {
    fn find(&self, id: u32) -> Option<String> {
        Some(id.to_string())
    }
}

pub struct Service {
    repository: Inject<Arc<dyn Repository>>,
    cache: LazyInject<Arc<String>>,
    observer: WeakInject<dyn Repository>,
}

impl Service {
    pub fn new(registry: &Registry) -> Result<Self, ResolveError> {
        Ok(Self {
            repository: inject().from(registry).resolve()?,
            cache: inject().from(registry).named("cache").lazy(),
            observer: inject::<Arc<dyn Repository>>().from(registry).weak()?,
        })
    }

    pub fn describe(&self, id: u32) -> Option<String> {
        let cache = self.cache.get().ok()?;
        let alive = self.observer.is_alive();
        self.repository
            .find(id)
            .map(|found| format!("{cache}:{found}:{alive}"))
    }
}

fn main() {
    let registry = Registry::builder().evict_shared_on_register(true).build();
    registry.register_type(|| -> Arc<dyn Repository> { Arc::new(MemoryRepository) });
    registry.register(key::named("cache"), || Arc::new(String::from("memory")));

    let service = Service::new(&registry).unwrap();
    assert_eq!(service.describe(1).as_deref(), Some("memory:1:true"));
}
