//! Argument descriptors and resolved argument lists.

use crate::component::{into_value, Value};
use crate::container::Container;
use crate::error::{ArgumentError, Result};
use crate::resolver::Resolver;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Describes one constructor, setter or property argument.
///
/// Descriptors are resolved lazily, at the moment the owning service is built,
/// never at registration time.
#[derive(Clone)]
pub enum Argument {
  /// A value passed through as-is.
  Literal(Value),
  /// Another service, looked up by id. With `shared` set the reference goes
  /// through [`Container::get_shared`] instead of [`Container::get`].
  Service { id: String, shared: bool },
  /// A fresh object built from a class name and its own argument list. It is
  /// never registered or cached.
  Instance {
    class_name: String,
    arguments: Vec<Argument>,
  },
}

impl Argument {
  pub fn literal<T: Any + Send + Sync>(value: T) -> Self {
    Argument::Literal(Arc::new(value))
  }

  pub fn service(id: impl Into<String>) -> Self {
    Argument::Service {
      id: id.into(),
      shared: false,
    }
  }

  pub fn shared_service(id: impl Into<String>) -> Self {
    Argument::Service {
      id: id.into(),
      shared: true,
    }
  }

  pub fn instance(class_name: impl Into<String>, arguments: Vec<Argument>) -> Self {
    Argument::Instance {
      class_name: class_name.into(),
      arguments,
    }
  }

  /// Converts a configuration literal into its native Rust value.
  ///
  /// Scalars become `bool`, `i64` (`u64` past `i64::MAX`), `f64`, `String` or
  /// `()` for null. Arrays and objects are kept as `serde_json::Value`.
  pub fn from_json(value: serde_json::Value) -> Self {
    use serde_json::Value as Json;
    match value {
      Json::Null => Argument::literal(()),
      Json::Bool(b) => Argument::literal(b),
      Json::Number(n) => {
        if let Some(i) = n.as_i64() {
          Argument::literal(i)
        } else if let Some(u) = n.as_u64() {
          Argument::literal(u)
        } else {
          Argument::literal(n.as_f64().unwrap_or(f64::NAN))
        }
      }
      Json::String(s) => Argument::literal(s),
      other => Argument::literal(other),
    }
  }

  /// Resolves this descriptor against `container`.
  ///
  /// Service references re-enter the container and so share the caller's
  /// resolution context, including references nested in inline instances.
  pub fn resolve(&self, container: &Container) -> Result<Value> {
    self.resolve_for(None, container)
  }

  /// Like [`resolve`](Argument::resolve), with failures of inline instances
  /// reported against `owner`, the service being built.
  pub(crate) fn resolve_for(&self, owner: Option<&str>, container: &Container) -> Result<Value> {
    match self {
      Argument::Literal(value) => Ok(Arc::clone(value)),
      Argument::Service { id, shared } => {
        let service = if *shared {
          container.get_shared(id)?
        } else {
          container.get(id)?
        };
        Ok(into_value(service))
      }
      Argument::Instance {
        class_name,
        arguments,
      } => {
        let owner = owner.unwrap_or(class_name.as_str());
        let args = resolve_all(owner, arguments, container)?;
        let service = Resolver::new(container).construct_inline(owner, class_name, args)?;
        Ok(into_value(service))
      }
    }
  }
}

/// Resolves `descriptors` in declared order on behalf of `owner`.
pub(crate) fn resolve_all(
  owner: &str,
  descriptors: &[Argument],
  container: &Container,
) -> Result<Arguments> {
  descriptors
    .iter()
    .map(|argument| argument.resolve_for(Some(owner), container))
    .collect()
}

impl fmt::Debug for Argument {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Argument::Literal(_) => f.write_str("Literal(..)"),
      Argument::Service { id, shared } => f
        .debug_struct("Service")
        .field("id", id)
        .field("shared", shared)
        .finish(),
      Argument::Instance {
        class_name,
        arguments,
      } => f
        .debug_struct("Instance")
        .field("class_name", class_name)
        .field("arguments", arguments)
        .finish(),
    }
  }
}

/// An ordered list of resolved argument values.
#[derive(Clone, Default)]
pub struct Arguments {
  values: Vec<Value>,
}

impl Arguments {
  pub fn new() -> Self {
    Self::default()
  }

  /// Appends a value, builder style.
  pub fn with<T: Any + Send + Sync>(mut self, value: T) -> Self {
    self.values.push(Arc::new(value));
    self
  }

  pub fn push(&mut self, value: Value) {
    self.values.push(value);
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = &Value> {
    self.values.iter()
  }

  pub fn value(&self, index: usize) -> Result<&Value, ArgumentError> {
    self.values.get(index).ok_or(ArgumentError::Missing {
      index,
      len: self.values.len(),
    })
  }

  /// The argument at `index`, downcast to `T`.
  pub fn get<T: Any + Send + Sync>(&self, index: usize) -> Result<Arc<T>, ArgumentError> {
    Arc::clone(self.value(index)?)
      .downcast::<T>()
      .map_err(|_| ArgumentError::TypeMismatch {
        index,
        expected: std::any::type_name::<T>(),
      })
  }

  /// Like [`get`](Arguments::get), but clones the value out of its `Arc`.
  pub fn cloned<T: Any + Send + Sync + Clone>(&self, index: usize) -> Result<T, ArgumentError> {
    self.get::<T>(index).map(|value| (*value).clone())
  }

  pub fn into_vec(self) -> Vec<Value> {
    self.values
  }
}

impl From<Vec<Value>> for Arguments {
  fn from(values: Vec<Value>) -> Self {
    Self { values }
  }
}

impl FromIterator<Value> for Arguments {
  fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
    Self {
      values: iter.into_iter().collect(),
    }
  }
}

impl fmt::Debug for Arguments {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Arguments")
      .field("len", &self.values.len())
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_typed_access() {
    let args = Arguments::new().with(7_i64).with(String::from("seven"));
    assert_eq!(args.len(), 2);
    assert_eq!(args.cloned::<i64>(0).unwrap(), 7);
    assert_eq!(*args.get::<String>(1).unwrap(), "seven");
  }

  #[test]
  fn test_access_errors() {
    let args = Arguments::new().with(1_i64);
    assert_eq!(
      args.get::<String>(0).unwrap_err(),
      ArgumentError::TypeMismatch {
        index: 0,
        expected: std::any::type_name::<String>(),
      }
    );
    assert_eq!(
      args.value(3).unwrap_err(),
      ArgumentError::Missing { index: 3, len: 1 }
    );
  }

  #[test]
  fn test_json_literals_become_native_values() {
    let cases = [
      (serde_json::json!(42), "i64"),
      (serde_json::json!(u64::MAX), "u64"),
      (serde_json::json!(1.5), "f64"),
      (serde_json::json!(true), "bool"),
      (serde_json::json!("text"), "String"),
      (serde_json::json!(null), "()"),
      (serde_json::json!([1, 2]), "Value"),
    ];
    for (json, expected) in cases {
      let Argument::Literal(value) = Argument::from_json(json) else {
        panic!("expected a literal");
      };
      let matched = match expected {
        "i64" => value.is::<i64>(),
        "u64" => value.is::<u64>(),
        "f64" => value.is::<f64>(),
        "bool" => value.is::<bool>(),
        "String" => value.is::<String>(),
        "()" => value.is::<()>(),
        _ => value.is::<serde_json::Value>(),
      };
      assert!(matched, "literal was not converted to {expected}");
    }
  }
}
