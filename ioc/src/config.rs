//! Loading service definitions from YAML or JSON.
//!
//! The document is a mapping from service id to either a class name or a
//! declarative definition:
//!
//! ```yaml
//! logger: FileLogger
//! mailer:
//!   className: Mailer
//!   shared: true
//!   arguments:
//!     - { type: service, name: logger }
//!     - { type: parameter, value: "smtp.example.com" }
//!   calls:
//!     - method: setPort
//!       arguments:
//!         - { type: parameter, value: 587 }
//!   properties:
//!     - name: from
//!       value: { type: parameter, value: "noreply@example.com" }
//! ```

use crate::argument::Argument;
use crate::container::Container;
use crate::definition::{Declaration, ServiceDefinition};
use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// A whole configuration document.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct ServicesConfig {
  pub services: BTreeMap<String, ServiceConfig>,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ServiceConfig {
  /// Shorthand for a transient class-name service.
  ClassName(String),
  Declarative(DeclarativeConfig),
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DeclarativeConfig {
  pub class_name: String,
  #[serde(default)]
  pub arguments: Vec<ArgumentConfig>,
  #[serde(default)]
  pub calls: Vec<CallConfig>,
  #[serde(default)]
  pub properties: Vec<PropertyConfig>,
  #[serde(default)]
  pub shared: bool,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ArgumentConfig {
  Parameter {
    value: serde_json::Value,
  },
  Service {
    name: String,
    #[serde(default)]
    shared: bool,
  },
  Instance {
    #[serde(rename = "className")]
    class_name: String,
    #[serde(default)]
    arguments: Vec<ArgumentConfig>,
  },
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CallConfig {
  pub method: String,
  #[serde(default)]
  pub arguments: Vec<ArgumentConfig>,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PropertyConfig {
  pub name: String,
  pub value: ArgumentConfig,
}

impl From<ArgumentConfig> for Argument {
  fn from(config: ArgumentConfig) -> Self {
    match config {
      ArgumentConfig::Parameter { value } => Argument::from_json(value),
      ArgumentConfig::Service { name, shared } => Argument::Service { id: name, shared },
      ArgumentConfig::Instance {
        class_name,
        arguments,
      } => Argument::Instance {
        class_name,
        arguments: arguments.into_iter().map(Argument::from).collect(),
      },
    }
  }
}

impl From<ServiceConfig> for ServiceDefinition {
  fn from(config: ServiceConfig) -> Self {
    match config {
      ServiceConfig::ClassName(class_name) => ServiceDefinition::new(class_name, false),
      ServiceConfig::Declarative(declarative) => {
        let mut declaration = Declaration::new(declarative.class_name);
        for argument in declarative.arguments {
          declaration.append_argument(argument.into());
        }
        for call in declarative.calls {
          let arguments = call.arguments.into_iter().map(Argument::from).collect();
          declaration.append_call(call.method, arguments);
        }
        for property in declarative.properties {
          declaration.append_property(property.name, property.value.into());
        }
        ServiceDefinition::new(declaration, declarative.shared)
      }
    }
  }
}

impl ServicesConfig {
  pub fn from_yaml(source: &str) -> Result<Self> {
    serde_yaml::from_str(source).map_err(|e| Error::ConfigParse(e.to_string()))
  }

  pub fn from_json(source: &str) -> Result<Self> {
    serde_json::from_str(source).map_err(|e| Error::ConfigParse(e.to_string()))
  }

  /// Reads a file, picking the format from its extension.
  pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let extension = path
      .extension()
      .and_then(|ext| ext.to_str())
      .map(str::to_ascii_lowercase);
    let source = std::fs::read_to_string(path)?;
    match extension.as_deref() {
      Some("yaml") | Some("yml") => Self::from_yaml(&source),
      Some("json") => Self::from_json(&source),
      _ => Err(Error::UnsupportedConfigFormat(path.display().to_string())),
    }
  }

  /// Registers every service in the document, replacing existing ids.
  pub fn apply(self, container: &Container) -> usize {
    let count = self.services.len();
    for (id, service) in self.services {
      container.set_definition(id, service.into());
    }
    tracing::debug!(count, "loaded services from configuration");
    count
  }
}

impl Container {
  /// Registers the services described by a YAML document.
  pub fn load_yaml(&self, source: &str) -> Result<usize> {
    Ok(ServicesConfig::from_yaml(source)?.apply(self))
  }

  /// Registers the services described by a JSON document.
  pub fn load_json(&self, source: &str) -> Result<usize> {
    Ok(ServicesConfig::from_json(source)?.apply(self))
  }

  /// Registers the services described by a `.yaml`, `.yml` or `.json` file.
  pub fn load_file(&self, path: impl AsRef<Path>) -> Result<usize> {
    Ok(ServicesConfig::from_file(path)?.apply(self))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::definition::Strategy;
  use pretty_assertions::assert_eq;

  #[test]
  fn test_parse_yaml_document() {
    let config = ServicesConfig::from_yaml(
      r#"
logger: FileLogger
mailer:
  className: Mailer
  shared: true
  arguments:
    - { type: service, name: logger }
    - { type: parameter, value: 587 }
    - type: instance
      className: Tls
      arguments:
        - { type: parameter, value: true }
  calls:
    - method: setRetries
      arguments:
        - { type: parameter, value: 3 }
  properties:
    - name: from
      value: { type: parameter, value: "ops@example.com" }
"#,
    )
    .unwrap();

    assert_eq!(
      config.services["logger"],
      ServiceConfig::ClassName("FileLogger".to_string())
    );
    let ServiceConfig::Declarative(mailer) = &config.services["mailer"] else {
      panic!("mailer should be declarative");
    };
    assert!(mailer.shared);
    assert_eq!(
      mailer.arguments[0],
      ArgumentConfig::Service {
        name: "logger".to_string(),
        shared: false
      }
    );
    assert_eq!(mailer.calls[0].method, "setRetries");
    assert_eq!(mailer.properties[0].name, "from");
  }

  #[test]
  fn test_json_and_yaml_agree() {
    let yaml = ServicesConfig::from_yaml(
      "cache:\n  className: Cache\n  arguments:\n    - { type: parameter, value: 64 }\n",
    )
    .unwrap();
    let json = ServicesConfig::from_json(
      r#"{"cache": {"className": "Cache", "arguments": [{"type": "parameter", "value": 64}]}}"#,
    )
    .unwrap();
    assert_eq!(yaml, json);
  }

  #[test]
  fn test_unknown_fields_are_rejected() {
    let err = ServicesConfig::from_json(r#"{"cache": {"className": "Cache", "lazy": true}}"#)
      .unwrap_err();
    assert!(matches!(err, Error::ConfigParse(_)));
  }

  #[test]
  fn test_conversion_to_definition() {
    let config = ServicesConfig::from_json(
      r#"{"db": {"className": "Db", "shared": true, "arguments": [{"type": "service", "name": "dsn", "shared": true}]}}"#,
    )
    .unwrap();
    let definition: ServiceDefinition = config.services.into_values().next().unwrap().into();

    assert!(definition.is_shared());
    let Strategy::Declarative(declaration) = definition.strategy() else {
      panic!("expected a declarative definition");
    };
    assert_eq!(declaration.class_name(), "Db");
    assert!(matches!(
      &declaration.arguments()[0],
      Argument::Service { id, shared: true } if id == "dsn"
    ));
  }
}
