//! Public macros for ergonomic, typed service resolution.
//!
//! These are thin wrappers over [`Container::get_as`](crate::Container::get_as)
//! and [`Container::get_shared_as`](crate::Container::get_shared_as). The
//! `resolve` variants panic on failure; the `maybe_` variants return an
//! `Option` instead.

/// Resolves a typed service from the default container.
///
/// # Panics
///
/// Panics if no default container is set or the service cannot be resolved.
/// For a non-panicking version, use `maybe_resolve!` or `get_as` directly.
///
/// # Examples
///
/// ```
/// use locus_ioc::{resolve, Container, Strategy};
///
/// let container = Container::new();
/// container.set_shared("greeting", Strategy::instance(String::from("hello")));
/// container.set_as_default();
///
/// let message = resolve!(String, "greeting");
/// assert_eq!(*message, "hello");
/// ```
#[macro_export]
macro_rules! resolve {
  ($type:ty, $id:expr) => {
    $crate::resolve_from!(
      $crate::default_container()
        .unwrap_or_else(|| panic!("No default container has been set")),
      $type,
      $id
    )
  };
}

/// Resolves a typed service from the given container, panicking on failure.
#[macro_export]
macro_rules! resolve_from {
  ($container:expr, $type:ty, $id:expr) => {
    $container
      .get_as::<$type>($id)
      .unwrap_or_else(|err| {
        panic!(
          "Failed to resolve required service '{}' as {}: {}",
          $id,
          std::any::type_name::<$type>(),
          err
        )
      })
  };
}

/// Like `resolve!`, but returns `None` instead of panicking.
#[macro_export]
macro_rules! maybe_resolve {
  ($type:ty, $id:expr) => {
    $crate::default_container().and_then(|container| $crate::maybe_resolve_from!(container, $type, $id))
  };
}

/// Like `resolve_from!`, but returns `None` instead of panicking.
#[macro_export]
macro_rules! maybe_resolve_from {
  ($container:expr, $type:ty, $id:expr) => {
    $container.get_as::<$type>($id).ok()
  };
}
