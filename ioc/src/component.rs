//! The `Component` trait implemented by every constructed service.

use crate::argument::Arguments;
use crate::container::{Container, WeakContainer};
use crate::error::{BoxError, MemberError};
use parking_lot::RwLock;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A resolved argument value.
pub type Value = Arc<dyn Any + Send + Sync>;

/// A resolved service as handed out by the container.
pub type Shared = Arc<dyn Component>;

/// Type-erasure helpers, implemented for every `Send + Sync + 'static` type.
pub trait AsAny: Any + Send + Sync {
  fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
  fn type_name(&self) -> &'static str;
}

impl<T: Any + Send + Sync> AsAny for T {
  fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
    self
  }

  fn type_name(&self) -> &'static str {
    std::any::type_name::<T>()
  }
}

/// A value the container knows how to build and wire.
///
/// Plain services need nothing beyond `impl Component for MyService {}`. Types
/// registered declaratively override [`call`](Component::call) and
/// [`set_property`](Component::set_property) for the setters and properties
/// they accept, and types that want to receive their container return a
/// [`ContainerSlot`] from [`container_slot`](Component::container_slot).
pub trait Component: AsAny {
  /// Invokes a setter with its resolved arguments.
  fn call(&mut self, method: &str, args: Arguments) -> Result<(), BoxError> {
    let _ = args;
    Err(Box::new(MemberError::UnknownMethod {
      type_name: AsAny::type_name(&*self),
      method: method.to_owned(),
    }))
  }

  /// Assigns a resolved value to a named property.
  fn set_property(&mut self, name: &str, value: Value) -> Result<(), BoxError> {
    let _ = value;
    Err(Box::new(MemberError::UnknownProperty {
      type_name: AsAny::type_name(&*self),
      property: name.to_owned(),
    }))
  }

  /// The "accepts container" capability. Checked once after construction.
  fn container_slot(&self) -> Option<&ContainerSlot> {
    None
  }
}

impl fmt::Debug for dyn Component {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_tuple("Component").field(&type_name_of(self)).finish()
  }
}

/// Converts a service into a plain argument value.
pub fn into_value(service: Shared) -> Value {
  <dyn Component as AsAny>::into_any_arc(service)
}

/// Downcasts a service to its concrete type.
pub fn downcast<T: Any + Send + Sync>(service: Shared) -> Option<Arc<T>> {
  into_value(service).downcast::<T>().ok()
}

/// The concrete type name of a service, for diagnostics.
pub fn type_name_of(service: &dyn Component) -> &'static str {
  <dyn Component as AsAny>::type_name(service)
}

/// A settable container reference embedded in container-aware components.
///
/// The slot holds a [`WeakContainer`] so that a shared service keeping a handle
/// to the container that caches it does not keep that container alive.
#[derive(Default)]
pub struct ContainerSlot {
  inner: RwLock<Option<WeakContainer>>,
}

impl ContainerSlot {
  pub fn new() -> Self {
    Self::default()
  }

  /// Stores `container`, replacing any earlier reference.
  pub fn set(&self, container: &Container) {
    *self.inner.write() = Some(container.downgrade());
  }

  /// The injected container, if one was set and is still alive.
  pub fn get(&self) -> Option<Container> {
    self.inner.read().as_ref().and_then(WeakContainer::upgrade)
  }

  pub fn is_set(&self) -> bool {
    self.inner.read().is_some()
  }
}

impl fmt::Debug for ContainerSlot {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ContainerSlot")
      .field("set", &self.is_set())
      .finish()
  }
}

// Common leaf types that are handy to register directly.
impl Component for String {}
impl Component for bool {}
impl Component for i32 {}
impl Component for i64 {}
impl Component for u32 {}
impl Component for u64 {}
impl Component for usize {}
impl Component for f64 {}
impl Component for serde_json::Value {}
impl<T: Any + Send + Sync> Component for Vec<T> {}
