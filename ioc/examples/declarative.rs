//! Registers services from a YAML document and resolves them.
//!
//! Run with `RUST_LOG=locus_ioc=debug` to see the container's events.

use locus_ioc::{Arguments, BoxError, ClassRegistry, Component, Container, ContainerSlot};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

struct Database {
  dsn: String,
}
impl Component for Database {}

struct Controller {
  db: Arc<Database>,
  page_size: i64,
  slot: ContainerSlot,
}

impl Component for Controller {
  fn call(&mut self, method: &str, args: Arguments) -> Result<(), BoxError> {
    match method {
      "setPageSize" => {
        self.page_size = args.cloned::<i64>(0)?;
        Ok(())
      }
      other => Err(format!("Controller has no method '{other}'").into()),
    }
  }

  fn container_slot(&self) -> Option<&ContainerSlot> {
    Some(&self.slot)
  }
}

const SERVICES: &str = r#"
db:
  className: Database
  shared: true
  arguments:
    - { type: parameter, value: "postgres://localhost/app" }
controller:
  className: Controller
  arguments:
    - { type: service, name: db }
  calls:
    - method: setPageSize
      arguments:
        - { type: parameter, value: 50 }
"#;

fn main() -> Result<(), locus_ioc::Error> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  let classes = Arc::new(ClassRegistry::new());
  classes.register("Database", |args: Arguments| {
    Ok(Database {
      dsn: args.cloned::<String>(0)?,
    })
  });
  classes.register("Controller", |args: Arguments| {
    Ok(Controller {
      db: args.get::<Database>(0)?,
      page_size: 20,
      slot: ContainerSlot::new(),
    })
  });

  let container = Container::with_class_resolver(classes);
  let loaded = container.load_yaml(SERVICES)?;
  println!("Loaded {loaded} services: {:?}", container.ids());

  let controller = container.get_as::<Controller>("controller")?;
  println!(
    "Controller uses {} with page size {}",
    controller.db.dsn, controller.page_size
  );

  let injected = controller
    .slot
    .get()
    .map(|c| c.ptr_eq(&container))
    .unwrap_or(false);
  println!("Controller received its container: {injected}");
  Ok(())
}
