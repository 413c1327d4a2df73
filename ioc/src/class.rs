//! The fallback class-resolution mechanism.

use crate::argument::Arguments;
use crate::component::Component;
use crate::error::BoxError;
use dashmap::DashMap;
use std::sync::Arc;

/// Builds a component from its resolved constructor arguments.
pub type Constructor =
  Arc<dyn Fn(Arguments) -> Result<Box<dyn Component>, BoxError> + Send + Sync>;

/// Maps a bare type name to something constructible.
///
/// The container consults its resolver for `ClassName` and declarative
/// definitions, for inline instances, and for ids that have no definition at
/// all.
pub trait ClassResolver: Send + Sync {
  fn resolve(&self, type_name: &str) -> Option<Constructor>;
}

/// A thread-safe, name-keyed table of constructors.
#[derive(Default)]
pub struct ClassRegistry {
  classes: DashMap<String, Constructor>,
}

impl ClassRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Registers `constructor` under `name`, replacing any earlier entry.
  pub fn register<C, F>(&self, name: impl Into<String>, build: F)
  where
    C: Component,
    F: Fn(Arguments) -> Result<C, BoxError> + Send + Sync + 'static,
  {
    let constructor: Constructor = Arc::new(move |args: Arguments| {
      build(args).map(|component| Box::new(component) as Box<dyn Component>)
    });
    self.classes.insert(name.into(), constructor);
  }

  /// Registers a type built with `Default::default()`, ignoring arguments.
  pub fn register_default<C: Component + Default>(&self, name: impl Into<String>) {
    self.register(name, |_| Ok(C::default()));
  }

  pub fn contains(&self, name: &str) -> bool {
    self.classes.contains_key(name)
  }

  pub fn remove(&self, name: &str) -> bool {
    self.classes.remove(name).is_some()
  }

  pub fn len(&self) -> usize {
    self.classes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.classes.is_empty()
  }
}

impl ClassResolver for ClassRegistry {
  fn resolve(&self, type_name: &str) -> Option<Constructor> {
    self.classes.get(type_name).map(|entry| Arc::clone(entry.value()))
  }
}
