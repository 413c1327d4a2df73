use locus_ioc::{resolve, Component, Container, Strategy};
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};

// A simple service that gets a unique ID upon creation.
struct RequestTracker {
  id: usize,
}
impl Component for RequestTracker {}

static ID_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn next_tracker() -> RequestTracker {
  RequestTracker {
    id: ID_COUNTER.fetch_add(1, Ordering::SeqCst),
  }
}

fn main() {
  let container = Container::new();
  container.set_as_default();

  // Built once, on first resolution.
  container.set_shared(
    "shared_tracker",
    Strategy::factory(|_, _| {
      println!("Creating SHARED RequestTracker...");
      Ok(next_tracker())
    }),
  );

  // Built on every resolution.
  container.set(
    "transient_tracker",
    Strategy::factory(|_, _| {
      println!("Creating TRANSIENT RequestTracker...");
      Ok(next_tracker())
    }),
  );

  println!("--- Resolving shared services ---");
  let s1 = resolve!(RequestTracker, "shared_tracker");
  let s2 = resolve!(RequestTracker, "shared_tracker");
  println!("Shared 1 ID: {}, Shared 2 ID: {}", s1.id, s2.id);
  assert!(Arc::ptr_eq(&s1, &s2), "Shared instances should be identical");

  println!("\n--- Resolving transient services ---");
  let t1 = resolve!(RequestTracker, "transient_tracker");
  let t2 = resolve!(RequestTracker, "transient_tracker");
  println!("Transient 1 ID: {}, Transient 2 ID: {}", t1.id, t2.id);
  assert!(!Arc::ptr_eq(&t1, &t2), "Transient instances should differ");

  println!("\n--- Forcing a transient definition to be shared ---");
  let f1 = container.get_shared_as::<RequestTracker>("transient_tracker").unwrap();
  let f2 = container.get_shared_as::<RequestTracker>("transient_tracker").unwrap();
  println!("Forced 1 ID: {}, Forced 2 ID: {}", f1.id, f2.id);
  assert!(Arc::ptr_eq(&f1, &f2));
}
