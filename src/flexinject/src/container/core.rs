use std::any;
use std::collections::HashMap;
use std::mem;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, ThreadId};

use oneshot::{Receiver, Sender};
use parking_lot::RwLock;
use tracing::{debug, trace, warn};

use crate::container::factory_map::FactoryMap;
use crate::container::{Managed, ResolveError};
use crate::factory::Factory;
use crate::key::Key;
use crate::mode::ResolveMode;
use crate::util::any::Downcast;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryConfig {
    pub evict_shared_on_register: bool,
}

pub struct RegistryCore {
    state: RwLock<RegistryState>,
    config: RegistryConfig,
    next_ticket: AtomicU64,
}

impl RegistryCore {
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            state: RwLock::new(RegistryState::new()),
            config,
            next_ticket: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> RegistryConfig {
        self.config
    }

    pub fn register(&self, key: Key, factory: Arc<dyn Factory>) {
        let output = factory.output_type_name();
        let mut state = self.state.write();
        let replaced = state.factories.insert(key.clone(), factory);

        let mut evicted = None;
        let mut detached = None;
        if self.config.evict_shared_on_register {
            evicted = state.shared.remove(&key);
            detached = state.constructing.remove(&key);
        } else if state.shared.contains_key(&key) {
            warn!(key = %key, "re-registered factory while a stale shared instance stays cached");
        }
        drop(state);

        if let Some(context) = detached {
            context.notify(WaitResponse::Detached);
        }
        if evicted.is_some() {
            debug!(key = %key, "evicted shared instance on re-registration");
        }
        debug!(key = %key, output, replaced = replaced.is_some(), "registered factory");
    }

    pub fn resolve<T>(&self, key: &Key, mode: ResolveMode) -> Result<T, ResolveError>
    where
        T: Managed + Clone,
    {
        match mode {
            ResolveMode::New => self.resolve_new(key),
            ResolveMode::Shared => self.resolve_shared(key),
        }
    }

    pub fn contains(&self, key: &Key) -> bool {
        self.state.read().factories.contains(key)
    }

    pub fn is_cached(&self, key: &Key) -> bool {
        self.state.read().shared.contains_key(key)
    }

    pub fn remove(&self, key: &Key) {
        let mut state = self.state.write();
        let factory = state.factories.remove(key);
        let object = state.shared.remove(key);
        let context = state.constructing.remove(key);
        drop(state);

        if let Some(context) = context {
            context.notify(WaitResponse::Detached);
        }
        if factory.is_some() || object.is_some() {
            debug!(key = %key, cached = object.is_some(), "removed dependency");
        }
    }

    pub fn remove_all(&self) {
        let mut state = self.state.write();
        let removed = mem::take(&mut *state);
        drop(state);

        debug!(
            factories = removed.factories.len(),
            cached = removed.shared.len(),
            "removed all dependencies"
        );
        for (_, context) in removed.constructing {
            context.notify(WaitResponse::Detached);
        }
    }

    pub fn resolve_new<T>(&self, key: &Key) -> Result<T, ResolveError>
    where
        T: Managed,
    {
        let factory = self.try_get_factory(key)?;
        let object = factory.dyn_make();
        trace!(key = %key, "constructed new instance");
        take_object(key, object)
    }

    fn resolve_shared<T>(&self, key: &Key) -> Result<T, ResolveError>
    where
        T: Managed + Clone,
    {
        loop {
            if let Some(res) = self.try_get_shared_object(key) {
                trace!(key = %key, "resolved cached shared instance");
                return res;
            }

            let mut state = self.state.write();
            if let Some(object) = state.shared.get(key) {
                return clone_object(key, object.as_ref());
            }

            if let Some(context) = state.constructing.get_mut(key) {
                if context.is_constructed_by_current_thread() {
                    return Err(ResolveError::CyclicDependency { key: key.clone() });
                }
                let receiver = context.register_waiter();
                drop(state);
                self.wait_for_constructed_object(receiver, key)?;
                continue;
            }

            let Some(factory) = state.factories.get(key).cloned() else {
                return Err(ResolveError::NotRegistered { key: key.clone() });
            };
            let ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed);
            state
                .constructing
                .insert(key.clone(), ConstructingObjectContext::new(ticket));
            drop(state);

            return self.construct_shared_object(key, ticket, factory.as_ref());
        }
    }

    fn try_get_factory(&self, key: &Key) -> Result<Arc<dyn Factory>, ResolveError> {
        let state = self.state.read();
        match state.factories.get(key) {
            Some(factory) => Ok(Arc::clone(factory)),
            None => Err(ResolveError::NotRegistered { key: key.clone() }),
        }
    }

    fn try_get_shared_object<T>(&self, key: &Key) -> Option<Result<T, ResolveError>>
    where
        T: Managed + Clone,
    {
        let state = self.state.read();
        state
            .shared
            .get(key)
            .map(|object| clone_object(key, object.as_ref()))
    }

    fn wait_for_constructed_object(
        &self,
        receiver: Receiver<WaitResponse>,
        key: &Key,
    ) -> Result<(), ResolveError> {
        match receiver.recv() {
            // The cache or the construction state has changed. Either way the
            // caller starts over and observes the new state.
            Ok(WaitResponse::Constructed | WaitResponse::Detached) => Ok(()),
            Err(_) => Err(ResolveError::ConstructionAborted { key: key.clone() }),
        }
    }

    fn construct_shared_object<T>(
        &self,
        key: &Key,
        ticket: u64,
        factory: &dyn Factory,
    ) -> Result<T, ResolveError>
    where
        T: Managed + Clone,
    {
        let guard = ConstructionGuard::new(self, key, ticket);
        let object = factory.dyn_make();
        let res = clone_object(key, object.as_ref());
        guard.disarm();

        let mut state = self.state.write();
        if state.is_constructing(key, ticket) {
            let Some(context) = state.constructing.remove(key) else {
                unreachable!("the construction context of `key` should have been checked")
            };
            // A wrongly typed object is still cached, since its factory is
            // the one registered for `key`.
            state.shared.insert(key.clone(), object);
            drop(state);

            debug!(key = %key, "constructed shared instance");
            context.notify(WaitResponse::Constructed);
        } else {
            drop(state);
            debug!(key = %key, "discarded shared instance of a removed key");
        }
        res
    }

    fn abort_construction(&self, key: &Key, ticket: u64) {
        let mut state = self.state.write();
        if state.is_constructing(key, ticket) {
            // Dropping the context drops the senders, which wakes every
            // waiter with an error.
            let context = state.constructing.remove(key);
            drop(state);
            drop(context);
            warn!(key = %key, "shared instance construction panicked");
        }
    }
}

fn take_object<T>(key: &Key, object: Box<dyn Managed>) -> Result<T, ResolveError>
where
    T: Managed,
{
    let found = (*object).type_name();
    match object.downcast::<T>() {
        Ok(object) => Ok(*object),
        Err(_) => Err(ResolveError::TypeMismatch {
            key: key.clone(),
            expected: any::type_name::<T>(),
            found,
        }),
    }
}

fn clone_object<T>(key: &Key, object: &dyn Managed) -> Result<T, ResolveError>
where
    T: Managed + Clone,
{
    match object.as_any().downcast_ref::<T>() {
        Some(object) => Ok(object.clone()),
        None => Err(ResolveError::TypeMismatch {
            key: key.clone(),
            expected: any::type_name::<T>(),
            found: object.type_name(),
        }),
    }
}

#[derive(Default)]
struct RegistryState {
    factories: FactoryMap,
    shared: HashMap<Key, Box<dyn Managed>>,
    constructing: HashMap<Key, ConstructingObjectContext>,
}

impl RegistryState {
    fn new() -> Self {
        Self {
            factories: FactoryMap::new(),
            shared: HashMap::new(),
            constructing: HashMap::new(),
        }
    }

    fn is_constructing(&self, key: &Key, ticket: u64) -> bool {
        self.constructing
            .get(key)
            .is_some_and(|context| context.ticket == ticket)
    }
}

struct ConstructingObjectContext {
    ticket: u64,
    on_thread: ThreadId,
    waiters: Vec<Sender<WaitResponse>>,
}

impl ConstructingObjectContext {
    fn new(ticket: u64) -> Self {
        Self {
            ticket,
            on_thread: thread::current().id(),
            waiters: Vec::new(),
        }
    }

    fn is_constructed_by_current_thread(&self) -> bool {
        thread::current().id() == self.on_thread
    }

    fn register_waiter(&mut self) -> Receiver<WaitResponse> {
        let (sender, receiver) = oneshot::channel();
        self.waiters.push(sender);
        receiver
    }

    fn notify(self, response: WaitResponse) {
        for sender in self.waiters {
            let _ = sender.send(response);
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum WaitResponse {
    Constructed,
    Detached,
}

/// Clears the construction context if the factory unwinds.
struct ConstructionGuard<'a> {
    core: &'a RegistryCore,
    key: &'a Key,
    ticket: u64,
    armed: bool,
}

impl<'a> ConstructionGuard<'a> {
    fn new(core: &'a RegistryCore, key: &'a Key, ticket: u64) -> Self {
        Self {
            core,
            key,
            ticket,
            armed: true,
        }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for ConstructionGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.core.abort_construction(self.key, self.ticket);
        }
    }
}
