//! Service definitions: the stored recipe for one service id.

use crate::argument::{Argument, Arguments};
use crate::component::{Component, Shared};
use crate::container::Container;
use crate::error::{BoxError, DefinitionError};
use std::fmt;
use std::sync::Arc;

pub(crate) type FactoryFn =
  Arc<dyn Fn(&Container, Arguments) -> Result<Box<dyn Component>, BoxError> + Send + Sync>;

/// How a service is built.
#[derive(Clone)]
pub enum Strategy {
  /// Instantiate a class by name through the container's class resolver.
  ClassName(String),
  /// Invoke a closure. Call-time arguments are forwarded to it.
  Factory(FactoryFn),
  /// Hand out a pre-built object unchanged.
  Instance(Shared),
  /// Build a class from declared constructor arguments, setter calls and
  /// property assignments.
  Declarative(Declaration),
}

impl Strategy {
  pub fn class(name: impl Into<String>) -> Self {
    Strategy::ClassName(name.into())
  }

  /// Wraps a closure building a component.
  ///
  /// The closure receives the resolving container and the call-time
  /// arguments (empty unless the caller supplied some).
  pub fn factory<C, F>(factory: F) -> Self
  where
    C: Component,
    F: Fn(&Container, Arguments) -> Result<C, BoxError> + Send + Sync + 'static,
  {
    Strategy::Factory(Arc::new(move |container: &Container, args: Arguments| {
      factory(container, args).map(|component| Box::new(component) as Box<dyn Component>)
    }))
  }

  pub fn instance<C: Component>(instance: C) -> Self {
    Strategy::Instance(Arc::new(instance))
  }

  pub fn kind(&self) -> &'static str {
    match self {
      Strategy::ClassName(_) => "class name",
      Strategy::Factory(_) => "factory",
      Strategy::Instance(_) => "instance",
      Strategy::Declarative(_) => "declarative",
    }
  }
}

impl From<&str> for Strategy {
  fn from(class_name: &str) -> Self {
    Strategy::ClassName(class_name.to_owned())
  }
}

impl From<String> for Strategy {
  fn from(class_name: String) -> Self {
    Strategy::ClassName(class_name)
  }
}

impl From<Declaration> for Strategy {
  fn from(declaration: Declaration) -> Self {
    Strategy::Declarative(declaration)
  }
}

impl From<Shared> for Strategy {
  fn from(instance: Shared) -> Self {
    Strategy::Instance(instance)
  }
}

impl fmt::Debug for Strategy {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Strategy::ClassName(name) => f.debug_tuple("ClassName").field(name).finish(),
      Strategy::Factory(_) => f.write_str("Factory(..)"),
      Strategy::Instance(_) => f.write_str("Instance(..)"),
      Strategy::Declarative(declaration) => {
        f.debug_tuple("Declarative").field(declaration).finish()
      }
    }
  }
}

/// A setter invocation applied after construction.
#[derive(Clone, Debug)]
pub struct SetterCall {
  pub method: String,
  pub arguments: Vec<Argument>,
}

/// A property assignment applied after the setter calls.
#[derive(Clone, Debug)]
pub struct PropertyAssignment {
  pub name: String,
  pub value: Argument,
}

/// The declarative recipe: a class name plus ordered constructor arguments,
/// setter calls and property assignments.
#[derive(Clone, Debug)]
pub struct Declaration {
  class_name: String,
  arguments: Vec<Argument>,
  calls: Vec<SetterCall>,
  properties: Vec<PropertyAssignment>,
}

impl Declaration {
  pub fn new(class_name: impl Into<String>) -> Self {
    Self {
      class_name: class_name.into(),
      arguments: Vec::new(),
      calls: Vec::new(),
      properties: Vec::new(),
    }
  }

  pub fn argument(mut self, argument: Argument) -> Self {
    self.arguments.push(argument);
    self
  }

  pub fn call(mut self, method: impl Into<String>, arguments: Vec<Argument>) -> Self {
    self.append_call(method, arguments);
    self
  }

  pub fn property(mut self, name: impl Into<String>, value: Argument) -> Self {
    self.append_property(name, value);
    self
  }

  pub fn class_name(&self) -> &str {
    &self.class_name
  }

  pub fn arguments(&self) -> &[Argument] {
    &self.arguments
  }

  pub fn calls(&self) -> &[SetterCall] {
    &self.calls
  }

  pub fn properties(&self) -> &[PropertyAssignment] {
    &self.properties
  }

  pub fn set_class_name(&mut self, class_name: impl Into<String>) {
    self.class_name = class_name.into();
  }

  pub fn append_argument(&mut self, argument: Argument) {
    self.arguments.push(argument);
  }

  /// Replaces the constructor argument at `index`, or appends when `index` is
  /// past the end.
  pub fn set_argument(&mut self, index: usize, argument: Argument) {
    match self.arguments.get_mut(index) {
      Some(slot) => *slot = argument,
      None => self.arguments.push(argument),
    }
  }

  pub fn append_call(&mut self, method: impl Into<String>, arguments: Vec<Argument>) {
    self.calls.push(SetterCall {
      method: method.into(),
      arguments,
    });
  }

  pub fn append_property(&mut self, name: impl Into<String>, value: Argument) {
    self.properties.push(PropertyAssignment {
      name: name.into(),
      value,
    });
  }
}

/// The stored recipe for one service id.
#[derive(Clone, Debug)]
pub struct ServiceDefinition {
  strategy: Strategy,
  shared: bool,
}

impl ServiceDefinition {
  pub fn new(strategy: impl Into<Strategy>, shared: bool) -> Self {
    Self {
      strategy: strategy.into(),
      shared,
    }
  }

  pub fn strategy(&self) -> &Strategy {
    &self.strategy
  }

  pub fn set_strategy(&mut self, strategy: impl Into<Strategy>) {
    self.strategy = strategy.into();
  }

  pub fn is_shared(&self) -> bool {
    self.shared
  }

  pub fn set_shared(&mut self, shared: bool) {
    self.shared = shared;
  }

  /// The declarative recipe, if this definition has one.
  pub fn declaration(&self) -> Option<&Declaration> {
    match &self.strategy {
      Strategy::Declarative(declaration) => Some(declaration),
      _ => None,
    }
  }

  fn declaration_mut(&mut self) -> Result<&mut Declaration, DefinitionError> {
    match &mut self.strategy {
      Strategy::Declarative(declaration) => Ok(declaration),
      other => Err(DefinitionError::NotDeclarative {
        strategy: other.kind(),
      }),
    }
  }

  /// Changes the class a declarative or class-name definition builds.
  pub fn set_class_name(&mut self, class_name: impl Into<String>) -> Result<(), DefinitionError> {
    if let Strategy::ClassName(name) = &mut self.strategy {
      *name = class_name.into();
      return Ok(());
    }
    self.declaration_mut()?.set_class_name(class_name);
    Ok(())
  }

  pub fn append_argument(&mut self, argument: Argument) -> Result<(), DefinitionError> {
    self.declaration_mut()?.append_argument(argument);
    Ok(())
  }

  pub fn set_argument(&mut self, index: usize, argument: Argument) -> Result<(), DefinitionError> {
    self.declaration_mut()?.set_argument(index, argument);
    Ok(())
  }

  pub fn append_call(
    &mut self,
    method: impl Into<String>,
    arguments: Vec<Argument>,
  ) -> Result<(), DefinitionError> {
    self.declaration_mut()?.append_call(method, arguments);
    Ok(())
  }

  pub fn append_property(
    &mut self,
    name: impl Into<String>,
    value: Argument,
  ) -> Result<(), DefinitionError> {
    self.declaration_mut()?.append_property(name, value);
    Ok(())
  }
}
