//! Error types surfaced by the container.

use thiserror::Error;

/// Boxed error returned by constructors, factories, setters and property hooks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The main error type for the `locus_ioc` library.
///
/// Every variant is terminal for the `get` call that produced it. The container
/// never retries a failed resolution on its own.
#[derive(Debug, Error)]
pub enum Error {
  /// No definition exists for the id and the fallback class resolver does not
  /// know it as a type name either.
  #[error("Service not found: '{id}'")]
  ServiceNotFound { id: String },

  /// A service transitively depends on itself. `chain` starts and ends with the
  /// same id.
  #[error("Circular dependency detected: {}", .chain.join(" -> "))]
  CircularDependency { chain: Vec<String> },

  /// Construction, a setter call or a property assignment failed.
  #[error("Failed to resolve service '{id}': {cause}")]
  Resolution {
    id: String,
    #[source]
    cause: BoxError,
  },

  /// The service resolved, but is not of the requested concrete type.
  #[error("Service '{id}' is not of type {expected}")]
  TypeMismatch { id: String, expected: &'static str },

  #[error("Failed to read service configuration: {0}")]
  ConfigRead(#[from] std::io::Error),

  #[error("Failed to parse service configuration: {0}")]
  ConfigParse(String),

  #[error("Unsupported service configuration format: {0}")]
  UnsupportedConfigFormat(String),
}

impl Error {
  /// Wraps a construction failure for `id`.
  ///
  /// A nested `ServiceNotFound` or `CircularDependency` propagated by a
  /// factory with `?` is passed through untouched. Every other cause, container
  /// errors included, is wrapped so the error names `id`.
  pub(crate) fn resolution(id: &str, cause: BoxError) -> Self {
    match cause.downcast::<Error>() {
      Ok(inner) if inner.is_not_found() || inner.is_circular() => *inner,
      Ok(inner) => Error::Resolution {
        id: id.to_owned(),
        cause: inner,
      },
      Err(cause) => Error::Resolution {
        id: id.to_owned(),
        cause,
      },
    }
  }

  /// Returns `true` for [`Error::ServiceNotFound`].
  pub fn is_not_found(&self) -> bool {
    matches!(self, Error::ServiceNotFound { .. })
  }

  /// Returns `true` for [`Error::CircularDependency`].
  pub fn is_circular(&self) -> bool {
    matches!(self, Error::CircularDependency { .. })
  }
}

/// Errors raised while reading an [`Arguments`](crate::Arguments) list.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ArgumentError {
  #[error("argument {index} is missing (got {len} arguments)")]
  Missing { index: usize, len: usize },

  #[error("argument {index} is not of type {expected}")]
  TypeMismatch { index: usize, expected: &'static str },
}

/// Errors raised by the default capability hooks of a [`Component`](crate::Component).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MemberError {
  #[error("{type_name} has no method '{method}'")]
  UnknownMethod {
    type_name: &'static str,
    method: String,
  },

  #[error("{type_name} has no property '{property}'")]
  UnknownProperty {
    type_name: &'static str,
    property: String,
  },
}

/// Raised when the container cannot find a constructor for a class name.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("class '{0}' cannot be resolved")]
pub struct UnknownClass(pub String);

/// Errors raised when mutating a [`ServiceDefinition`](crate::ServiceDefinition).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DefinitionError {
  #[error("a {strategy} definition cannot be modified declaratively")]
  NotDeclarative { strategy: &'static str },
}

/// A specialized `Result` type for `locus_ioc` operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
