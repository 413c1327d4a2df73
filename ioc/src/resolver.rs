//! Turns a service definition into a concrete instance.

use crate::argument::{resolve_all, Arguments};
use crate::component::{Component, Shared};
use crate::container::Container;
use crate::definition::{Declaration, ServiceDefinition, Strategy};
use crate::error::{Error, Result, UnknownClass};
use std::sync::Arc;

/// Builds services on behalf of one container.
///
/// The resolver itself is stateless. The resolution context lives in the
/// thread-local guard stack, which every `Service` argument re-enters through
/// the container.
pub(crate) struct Resolver<'c> {
  container: &'c Container,
}

impl<'c> Resolver<'c> {
  pub(crate) fn new(container: &'c Container) -> Self {
    Self { container }
  }

  /// Builds `definition` for `id`.
  ///
  /// Call-time `args` replace the definition's own constructor arguments. They
  /// are forwarded to factories and ignored for pre-built instances.
  pub(crate) fn resolve(
    &self,
    id: &str,
    definition: &ServiceDefinition,
    args: Option<Arguments>,
  ) -> Result<Shared> {
    let service: Shared = match definition.strategy() {
      Strategy::ClassName(class_name) => {
        let component = self.construct(id, class_name, args.unwrap_or_default())?;
        Arc::from(component)
      }
      Strategy::Factory(factory) => {
        let component = factory(self.container, args.unwrap_or_default())
          .map_err(|cause| Error::resolution(id, cause))?;
        Arc::from(component)
      }
      Strategy::Instance(instance) => Arc::clone(instance),
      Strategy::Declarative(declaration) => {
        Arc::from(self.build_declarative(id, declaration, args)?)
      }
    };
    self.inject(&*service);
    Ok(service)
  }

  /// Builds an id with no definition by treating it as a class name.
  pub(crate) fn resolve_fallback(&self, id: &str, args: Option<Arguments>) -> Result<Shared> {
    let constructor = self
      .container
      .classes()
      .resolve(id)
      .ok_or_else(|| Error::ServiceNotFound { id: id.to_owned() })?;
    let component = constructor(args.unwrap_or_default())
      .map_err(|cause| Error::resolution(id, cause))?;
    let service: Shared = Arc::from(component);
    self.inject(&*service);
    Ok(service)
  }

  /// Builds an unregistered inline instance of `class_name` for service `owner`.
  pub(crate) fn construct_inline(
    &self,
    owner: &str,
    class_name: &str,
    args: Arguments,
  ) -> Result<Shared> {
    let service: Shared = Arc::from(self.construct(owner, class_name, args)?);
    self.inject(&*service);
    Ok(service)
  }

  fn build_declarative(
    &self,
    id: &str,
    declaration: &Declaration,
    args: Option<Arguments>,
  ) -> Result<Box<dyn Component>> {
    let args = match args {
      Some(args) => args,
      None => resolve_all(id, declaration.arguments(), self.container)?,
    };
    let mut component = self.construct(id, declaration.class_name(), args)?;

    for call in declaration.calls() {
      let args = resolve_all(id, &call.arguments, self.container)?;
      component
        .call(&call.method, args)
        .map_err(|cause| Error::resolution(id, cause))?;
    }
    for property in declaration.properties() {
      let value = property.value.resolve_for(Some(id), self.container)?;
      component
        .set_property(&property.name, value)
        .map_err(|cause| Error::resolution(id, cause))?;
    }
    Ok(component)
  }

  fn construct(&self, id: &str, class_name: &str, args: Arguments) -> Result<Box<dyn Component>> {
    let constructor = self
      .container
      .classes()
      .resolve(class_name)
      .ok_or_else(|| Error::resolution(id, Box::new(UnknownClass(class_name.to_owned()))))?;
    constructor(args).map_err(|cause| Error::resolution(id, cause))
  }

  fn inject(&self, component: &dyn Component) {
    if let Some(slot) = component.container_slot() {
      slot.set(self.container);
    }
  }
}
