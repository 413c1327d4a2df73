//! The main `Container` struct and its associated methods.

use crate::argument::Arguments;
use crate::class::{ClassRegistry, ClassResolver};
use crate::component::{downcast, Shared};
use crate::core::ResolutionGuard;
use crate::definition::{ServiceDefinition, Strategy};
use crate::error::{Error, Result};
use crate::resolver::Resolver;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use std::any::Any;
use std::fmt;
use std::sync::{Arc, Weak};

/// Groups a set of registrations so they can be applied in one call.
pub trait ServiceProvider {
  fn register(&self, container: &Container);
}

/// Observes every construction the container performs.
///
/// Cache hits on shared services are not reported, only actual builds.
pub trait ResolveListener: Send + Sync {
  fn before_resolve(&self, id: &str, args: Option<&Arguments>) {
    let _ = (id, args);
  }

  fn after_resolve(&self, id: &str, instance: &Shared) {
    let _ = (id, instance);
  }
}

// One registered id. Replacing the registration drops its cached instance
// along with it.
struct Registration {
  definition: Arc<RwLock<ServiceDefinition>>,
  instance: OnceCell<Shared>,
}

impl Registration {
  fn new(definition: ServiceDefinition) -> Self {
    Self {
      definition: Arc::new(RwLock::new(definition)),
      instance: OnceCell::new(),
    }
  }
}

struct Inner {
  services: DashMap<String, Arc<Registration>>,
  // Shared instances of ids that were built through the class fallback.
  fallback_instances: DashMap<String, Arc<OnceCell<Shared>>>,
  classes: Arc<dyn ClassResolver>,
  listeners: RwLock<Vec<Arc<dyn ResolveListener>>>,
}

/// The dependency injection container.
///
/// This is a cheap, clonable handle: clones share the same registrations and
/// shared-instance cache. It is thread-safe, and registration may happen at any
/// point of the application's lifetime.
#[derive(Clone)]
pub struct Container {
  inner: Arc<Inner>,
}

/// A non-owning reference to a [`Container`].
#[derive(Clone)]
pub struct WeakContainer {
  inner: Weak<Inner>,
}

impl WeakContainer {
  pub fn upgrade(&self) -> Option<Container> {
    self.inner.upgrade().map(|inner| Container { inner })
  }
}

impl Default for Container {
  fn default() -> Self {
    Self::new()
  }
}

impl Container {
  /// Creates a new, empty `Container` with an empty [`ClassRegistry`].
  pub fn new() -> Self {
    Self::with_class_resolver(Arc::new(ClassRegistry::new()))
  }

  /// Creates a container that falls back to `classes` for class names.
  pub fn with_class_resolver(classes: Arc<dyn ClassResolver>) -> Self {
    Self {
      inner: Arc::new(Inner {
        services: DashMap::new(),
        fallback_instances: DashMap::new(),
        classes,
        listeners: RwLock::new(Vec::new()),
      }),
    }
  }

  pub fn classes(&self) -> &Arc<dyn ClassResolver> {
    &self.inner.classes
  }

  pub fn downgrade(&self) -> WeakContainer {
    WeakContainer {
      inner: Arc::downgrade(&self.inner),
    }
  }

  /// Returns `true` if both handles refer to the same container.
  pub fn ptr_eq(&self, other: &Container) -> bool {
    Arc::ptr_eq(&self.inner, &other.inner)
  }

  fn scope(&self) -> usize {
    Arc::as_ptr(&self.inner) as usize
  }

  // --- Registration ---

  /// Registers a transient service, replacing any existing definition for `id`
  /// and evicting its cached shared instance.
  pub fn set(&self, id: impl Into<String>, strategy: impl Into<Strategy>) {
    self.set_definition(id, ServiceDefinition::new(strategy, false));
  }

  /// Registers a shared service. Equivalent to `set` with `shared = true`.
  pub fn set_shared(&self, id: impl Into<String>, strategy: impl Into<Strategy>) {
    self.set_definition(id, ServiceDefinition::new(strategy, true));
  }

  /// Registers a prebuilt definition.
  pub fn set_definition(&self, id: impl Into<String>, definition: ServiceDefinition) {
    let id = id.into();
    let shared = definition.is_shared();
    let previous = self
      .inner
      .services
      .insert(id.clone(), Arc::new(Registration::new(definition)));
    self.inner.fallback_instances.remove(&id);

    if previous.is_some_and(|registration| registration.instance.get().is_some()) {
      tracing::debug!(service = %id, "evicted cached shared instance");
    }
    tracing::debug!(service = %id, shared, "registered service");
  }

  /// Registers `strategy` only if `id` is not registered yet.
  ///
  /// Returns `true` if the registration took place.
  pub fn attempt(&self, id: impl Into<String>, strategy: impl Into<Strategy>, shared: bool) -> bool {
    match self.inner.services.entry(id.into()) {
      Entry::Occupied(_) => false,
      Entry::Vacant(vacant) => {
        tracing::debug!(service = %vacant.key(), shared, "registered service");
        self.inner.fallback_instances.remove(vacant.key());
        let definition = ServiceDefinition::new(strategy, shared);
        vacant.insert(Arc::new(Registration::new(definition)));
        true
      }
    }
  }

  /// Applies all registrations of `provider`.
  pub fn register(&self, provider: &impl ServiceProvider) {
    provider.register(self);
  }

  pub fn add_listener(&self, listener: Arc<dyn ResolveListener>) {
    self.inner.listeners.write().push(listener);
  }

  /// Removes the definition and any cached shared instance for `id`.
  ///
  /// Returns `true` if a definition was removed.
  pub fn remove(&self, id: &str) -> bool {
    let removed = self.inner.services.remove(id).is_some();
    self.inner.fallback_instances.remove(id);
    if removed {
      tracing::debug!(service = %id, "removed service");
    }
    removed
  }

  // --- Inspection ---

  pub fn has(&self, id: &str) -> bool {
    self.inner.services.contains_key(id)
  }

  /// The stored definition for `id`, for in-place modification.
  ///
  /// Changes apply to future builds only; an instance that is already cached
  /// stays as it is until the id is registered again.
  pub fn definition(&self, id: &str) -> Result<Arc<RwLock<ServiceDefinition>>> {
    self
      .registration(id)
      .map(|registration| Arc::clone(&registration.definition))
      .ok_or_else(|| Error::ServiceNotFound { id: id.to_owned() })
  }

  /// All registered ids, sorted.
  pub fn ids(&self) -> Vec<String> {
    let mut ids: Vec<String> = self
      .inner
      .services
      .iter()
      .map(|entry| entry.key().clone())
      .collect();
    ids.sort();
    ids
  }

  /// Whether a shared instance of `id` is currently cached.
  pub fn is_resolved(&self, id: &str) -> bool {
    match self.registration(id) {
      Some(registration) => registration.instance.get().is_some(),
      None => self
        .inner
        .fallback_instances
        .get(id)
        .is_some_and(|cell| cell.get().is_some()),
    }
  }

  // --- Resolution ---

  /// Resolves `id`, honouring the definition's own `shared` flag.
  pub fn get(&self, id: &str) -> Result<Shared> {
    self.resolve(id, None, false)
  }

  /// Resolves `id` with call-time constructor or factory arguments.
  ///
  /// A shared service that is already cached is returned as is and `args` are
  /// not used.
  pub fn get_with(&self, id: &str, args: Arguments) -> Result<Shared> {
    self.resolve(id, Some(args), false)
  }

  /// Resolves `id` as a shared service regardless of its definition.
  pub fn get_shared(&self, id: &str) -> Result<Shared> {
    self.resolve(id, None, true)
  }

  pub fn get_shared_with(&self, id: &str, args: Arguments) -> Result<Shared> {
    self.resolve(id, Some(args), true)
  }

  /// Resolves `id` and downcasts it to `T`.
  pub fn get_as<T: Any + Send + Sync>(&self, id: &str) -> Result<Arc<T>> {
    let service = self.get(id)?;
    downcast::<T>(service).ok_or_else(|| type_mismatch::<T>(id))
  }

  /// Resolves `id` as a shared service and downcasts it to `T`.
  pub fn get_shared_as<T: Any + Send + Sync>(&self, id: &str) -> Result<Arc<T>> {
    let service = self.get_shared(id)?;
    downcast::<T>(service).ok_or_else(|| type_mismatch::<T>(id))
  }

  fn registration(&self, id: &str) -> Option<Arc<Registration>> {
    // Clone out of the map so no shard lock is held while building.
    self
      .inner
      .services
      .get(id)
      .map(|entry| Arc::clone(entry.value()))
  }

  fn resolve(&self, id: &str, args: Option<Arguments>, force_shared: bool) -> Result<Shared> {
    let _guard = ResolutionGuard::enter(self.scope(), id)?;

    let Some(registration) = self.registration(id) else {
      return self.resolve_unregistered(id, args, force_shared);
    };

    let shared = force_shared || registration.definition.read().is_shared();
    if shared {
      if let Some(instance) = registration.instance.get() {
        tracing::trace!(service = %id, "shared instance cache hit");
        return Ok(Arc::clone(instance));
      }
    }

    // Work on a snapshot so the definition lock is not held across recursion.
    let definition = registration.definition.read().clone();
    if !shared {
      return self.build(id, args, |resolver, args| {
        resolver.resolve(id, &definition, args)
      });
    }
    let instance = registration.instance.get_or_try_init(|| {
      self.build(id, args, |resolver, args| {
        resolver.resolve(id, &definition, args)
      })
    })?;
    Ok(Arc::clone(instance))
  }

  fn resolve_unregistered(
    &self,
    id: &str,
    args: Option<Arguments>,
    force_shared: bool,
  ) -> Result<Shared> {
    tracing::trace!(service = %id, "no definition, trying class fallback");
    if !force_shared {
      return self.build(id, args, |resolver, args| resolver.resolve_fallback(id, args));
    }

    let cached = self
      .inner
      .fallback_instances
      .get(id)
      .and_then(|cell| cell.get().cloned());
    if let Some(instance) = cached {
      tracing::trace!(service = %id, "shared fallback instance cache hit");
      return Ok(instance);
    }
    // Unknown ids never get a cache slot.
    if self.inner.classes.resolve(id).is_none() {
      return Err(Error::ServiceNotFound { id: id.to_owned() });
    }

    let cell = Arc::clone(
      self
        .inner
        .fallback_instances
        .entry(id.to_owned())
        .or_default()
        .value(),
    );
    let result = cell
      .get_or_try_init(|| {
        self.build(id, args, |resolver, args| resolver.resolve_fallback(id, args))
      })
      .map(Arc::clone);
    if result.is_err() {
      self
        .inner
        .fallback_instances
        .remove_if(id, |_, cell| cell.get().is_none());
    }
    result
  }

  fn build(
    &self,
    id: &str,
    args: Option<Arguments>,
    run: impl FnOnce(&Resolver<'_>, Option<Arguments>) -> Result<Shared>,
  ) -> Result<Shared> {
    let listeners = self.inner.listeners.read().clone();
    for listener in &listeners {
      listener.before_resolve(id, args.as_ref());
    }

    let instance = run(&Resolver::new(self), args)?;
    tracing::debug!(service = %id, "constructed service");

    for listener in &listeners {
      listener.after_resolve(id, &instance);
    }
    Ok(instance)
  }

  /// Makes this container the process-wide default.
  pub fn set_as_default(&self) -> Option<Container> {
    crate::global::set_default(self)
  }
}

fn type_mismatch<T>(id: &str) -> Error {
  Error::TypeMismatch {
    id: id.to_owned(),
    expected: std::any::type_name::<T>(),
  }
}

impl fmt::Debug for Container {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Container")
      .field("services", &self.inner.services.len())
      .finish()
  }
}
