use std::collections::HashMap;
use std::sync::Arc;

use crate::factory::Factory;
use crate::key::Key;

#[derive(Default)]
pub struct FactoryMap {
    factories: HashMap<Key, Arc<dyn Factory>>,
}

impl FactoryMap {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Inserts `factory` under `key`, returning the factory it replaces.
    pub fn insert(&mut self, key: Key, factory: Arc<dyn Factory>) -> Option<Arc<dyn Factory>> {
        self.factories.insert(key, factory)
    }

    pub fn get(&self, key: &Key) -> Option<&Arc<dyn Factory>> {
        self.factories.get(key)
    }

    pub fn contains(&self, key: &Key) -> bool {
        self.factories.contains_key(key)
    }

    pub fn remove(&mut self, key: &Key) -> Option<Arc<dyn Factory>> {
        self.factories.remove(key)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }
}
