//! # Locus IoC
//!
//! A thread-safe service locator and dependency injection container for Rust.
//!
//! The container maps string ids to construction recipes and builds services
//! lazily, on the first `get`. A recipe is one of:
//!
//! - a **class name**, built through the container's [`ClassResolver`];
//! - a **factory** closure;
//! - a pre-built **instance**;
//! - a **declarative** [`Declaration`]: class name, constructor arguments,
//!   setter calls and property assignments, each argument being a literal, a
//!   reference to another service or an inline instance.
//!
//! ## Core Concepts
//!
//! - **Shared services** are built at most once per container, even under
//!   concurrent first access. `get_shared` forces this on any definition.
//! - **Fallback**: an id with no definition is tried as a class name.
//! - **Container injection**: components exposing a [`ContainerSlot`] receive
//!   the container that built them, whatever the strategy.
//! - **Cycle detection**: a service that transitively needs itself fails with
//!   [`Error::CircularDependency`] instead of recursing.
//! - **Default container**: an explicit, optional process-wide reference set
//!   with [`set_default`] and read with [`default_container`].
//!
//! ## Quick Start
//!
//! ```
//! use locus_ioc::{Argument, Arguments, ClassRegistry, Component, Container, Declaration, Strategy};
//! use std::sync::Arc;
//!
//! struct Database {
//!   dsn: String,
//! }
//! impl Component for Database {}
//!
//! struct UserRepository {
//!   db: Arc<Database>,
//!   table: String,
//! }
//! impl Component for UserRepository {}
//!
//! let classes = Arc::new(ClassRegistry::new());
//! classes.register("UserRepository", |args: Arguments| {
//!   Ok(UserRepository {
//!     db: args.get::<Database>(0)?,
//!     table: args.cloned::<String>(1)?,
//!   })
//! });
//!
//! let container = Container::with_class_resolver(classes);
//! container.set_shared(
//!   "db",
//!   Strategy::factory(|_, _| Ok(Database { dsn: "postgres://localhost/app".into() })),
//! );
//! container.set(
//!   "users",
//!   Declaration::new("UserRepository")
//!     .argument(Argument::service("db"))
//!     .argument(Argument::literal(String::from("users"))),
//! );
//!
//! let users = container.get_as::<UserRepository>("users").unwrap();
//! assert_eq!(users.db.dsn, "postgres://localhost/app");
//! assert_eq!(users.table, "users");
//! ```

mod argument;
mod class;
mod component;
pub mod config;
mod container;
mod core;
mod definition;
pub mod error;
mod global;
mod macros;
mod resolver;

pub use argument::{Argument, Arguments};
pub use class::{ClassRegistry, ClassResolver, Constructor};
pub use component::{downcast, into_value, type_name_of, AsAny, Component, ContainerSlot, Shared, Value};
pub use container::{Container, ResolveListener, ServiceProvider, WeakContainer};
pub use definition::{Declaration, PropertyAssignment, ServiceDefinition, SetterCall, Strategy};
pub use error::{BoxError, Error, Result};
pub use global::{default_container, reset_default, set_default};
