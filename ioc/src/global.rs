//! The process-wide default container reference.

use crate::container::Container;
use once_cell::sync::Lazy;
use parking_lot::RwLock;

// Starts out empty. Nothing here ever creates a container on its own.
static DEFAULT_CONTAINER: Lazy<RwLock<Option<Container>>> = Lazy::new(|| RwLock::new(None));

/// Designates `container` as the process-wide default.
///
/// Returns the previous default, if any. Handles already obtained from the
/// previous container are not affected.
///
/// # Examples
///
/// ```
/// use locus_ioc::{default_container, set_default, Container};
///
/// let container = Container::new();
/// set_default(&container);
/// assert!(default_container().unwrap().ptr_eq(&container));
/// ```
pub fn set_default(container: &Container) -> Option<Container> {
  DEFAULT_CONTAINER.write().replace(container.clone())
}

/// The current default container, or `None` if none has been set.
pub fn default_container() -> Option<Container> {
  DEFAULT_CONTAINER.read().clone()
}

/// Clears the default, returning the container that held the role.
pub fn reset_default() -> Option<Container> {
  DEFAULT_CONTAINER.write().take()
}
