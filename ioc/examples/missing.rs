use locus_ioc::{resolve_from, Container, Error};
use std::panic;

fn main() {
  let container = Container::new();

  // --- Using the panicking `resolve_from!` macro ---
  println!("Attempting to resolve a service that was never registered...");
  let result = panic::catch_unwind(|| {
    let _service = resolve_from!(Container::new(), String, "unregistered");
  });
  assert!(result.is_err(), "resolve_from! should have panicked.");
  println!("Successfully caught the expected panic from resolve_from!.");

  // --- Using the fallible `get()` method ---
  println!("\nNow, attempting to resolve using the fallible `get()` method...");
  match container.get("unregistered") {
    Ok(_) => panic!("Should not have found the service!"),
    Err(Error::ServiceNotFound { id }) => println!("Correctly received ServiceNotFound for '{id}'."),
    Err(other) => panic!("Unexpected error: {other}"),
  }
}
