//! Tests for the process-wide default container and the resolution macros.
//!
//! The default container is process state, so everything touching it runs
//! inside a single test to keep the sequence deterministic.

use locus_ioc::{
  default_container, maybe_resolve, maybe_resolve_from, reset_default, resolve, resolve_from,
  set_default, Container, Strategy,
};
use std::panic;

struct MacroTestService {
  value: i32,
}
impl locus_ioc::Component for MacroTestService {}

#[test]
fn test_default_container_lifecycle_and_macros() {
  // Nothing is created implicitly.
  assert!(default_container().is_none());
  assert!(maybe_resolve!(String, "anything").is_none());
  assert!(panic::catch_unwind(|| resolve!(String, "anything")).is_err());

  // Arrange
  let first = Container::new();
  first.set_shared("service", Strategy::instance(MacroTestService { value: 1 }));
  let second = Container::new();
  second.set_shared("service", Strategy::instance(MacroTestService { value: 2 }));

  // Act & Assert
  assert!(set_default(&first).is_none());
  assert_eq!(resolve!(MacroTestService, "service").value, 1);

  let previous = second.set_as_default().unwrap();
  assert!(previous.ptr_eq(&first));
  assert_eq!(resolve!(MacroTestService, "service").value, 2);
  // The replaced container keeps working for whoever holds it.
  assert_eq!(resolve_from!(first, MacroTestService, "service").value, 1);

  let cleared = reset_default().unwrap();
  assert!(cleared.ptr_eq(&second));
  assert!(default_container().is_none());
}

#[test]
fn test_resolve_from_explicit_container() {
  // Arrange
  let container = Container::new();
  container.set("number", Strategy::instance(7_i64));

  // Act & Assert
  assert_eq!(*resolve_from!(container, i64, "number"), 7);
  assert!(maybe_resolve_from!(container, String, "number").is_none());
  assert!(maybe_resolve_from!(container, i64, "missing").is_none());
}

#[test]
#[should_panic(expected = "Failed to resolve required service 'missing'")]
fn test_resolve_from_panics_on_missing_service() {
  let container = Container::new();
  resolve_from!(container, i64, "missing");
}
