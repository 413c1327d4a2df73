//! Core, non-public data structures for the container.

use crate::error::Error;
use std::cell::RefCell;

thread_local! {
  // The services currently being resolved on this thread, in resolution order.
  // Entries are scoped by container so that two containers may resolve the same
  // id within one call tree without tripping the cycle check.
  static RESOLVING_STACK: RefCell<Vec<(usize, String)>> = const { RefCell::new(Vec::new()) };
}

/// An RAII guard that tracks the active resolution context.
///
/// Entering pushes `(scope, id)` onto the thread-local stack. If the pair is
/// already present the call tree has looped back onto itself and
/// [`Error::CircularDependency`] is returned instead. Dropping the guard pops
/// the entry again, including on early returns.
pub(crate) struct ResolutionGuard {
  scope: usize,
}

impl ResolutionGuard {
  pub(crate) fn enter(scope: usize, id: &str) -> Result<Self, Error> {
    RESOLVING_STACK.with(|stack| {
      let mut stack = stack.borrow_mut();
      if let Some(start) = stack
        .iter()
        .position(|(s, entry)| *s == scope && entry == id)
      {
        let mut chain: Vec<String> = stack[start..]
          .iter()
          .filter(|(s, _)| *s == scope)
          .map(|(_, entry)| entry.clone())
          .collect();
        chain.push(id.to_owned());
        tracing::warn!(chain = ?chain, "circular dependency detected");
        return Err(Error::CircularDependency { chain });
      }
      stack.push((scope, id.to_owned()));
      Ok(Self { scope })
    })
  }
}

impl Drop for ResolutionGuard {
  fn drop(&mut self) {
    RESOLVING_STACK.with(|stack| {
      let mut stack = stack.borrow_mut();
      // Guards nest strictly, so ours is the innermost entry for this scope.
      if let Some(pos) = stack.iter().rposition(|(s, _)| *s == self.scope) {
        stack.remove(pos);
      }
    });
  }
}
