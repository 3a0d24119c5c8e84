//! Lazy resolution of command implementations.
//!
//! Registration stores a factory, not a command. The factory may pull in
//! arbitrary initialization code belonging to the contributing package, so it
//! must not run until its command is actually dispatched, and must run at
//! most once per process.

use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::command::{Command, Factory, Origin};
use crate::error::{NimbelinkError, Result};

/// The implementation slot of a command node: the contributing origin, its
/// deferred factory, and the resolution cache.
pub struct Implementation {
    origin: Origin,
    help: Option<String>,
    factory: Factory,
    resolved: OnceCell<std::result::Result<Arc<dyn Command>, String>>,
}

impl Implementation {
    pub(crate) fn new(origin: Origin, help: Option<String>, factory: Factory) -> Self {
        Self {
            origin,
            help,
            factory,
            resolved: OnceCell::new(),
        }
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Resolves the deferred factory into a concrete command.
    ///
    /// The factory runs at most once per process; both success and failure
    /// are cached. A failed resolution stays failed; retrying would re-run
    /// the contributing package's initialization code.
    pub fn resolve(&self, path: &str) -> Result<Arc<dyn Command>> {
        let outcome = self
            .resolved
            .get_or_init(|| (self.factory)().map(Arc::from).map_err(|e| e.to_string()));

        match outcome {
            Ok(command) => Ok(Arc::clone(command)),
            Err(reason) => Err(NimbelinkError::Resolution {
                path: path.to_string(),
                origin: self.origin.to_string(),
                reason: reason.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_implementation(calls: Arc<AtomicUsize>) -> Implementation {
        Implementation::new(
            Origin::new("test-pkg"),
            None,
            Box::new(move || {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(Box::new(|_: &[String]| 0) as Box<dyn Command>)
            }),
        )
    }

    #[test]
    fn factory_runs_exactly_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let implementation = counting_implementation(Arc::clone(&calls));

        implementation.resolve("a b").unwrap();
        implementation.resolve("a b").unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failure_carries_path_and_origin() {
        let implementation = Implementation::new(
            Origin::new("broken-pkg"),
            None,
            Box::new(|| Err("missing backend".into())),
        );

        let err = match implementation.resolve("device flash") {
            Ok(_) => panic!("expected resolution to fail"),
            Err(e) => e,
        };
        let message = err.to_string();
        assert!(message.contains("device flash"));
        assert!(message.contains("broken-pkg"));
        assert!(message.contains("missing backend"));
    }

    #[test]
    fn failure_is_cached_and_not_retried() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_in_factory = Arc::clone(&calls);
        let implementation = Implementation::new(
            Origin::new("broken-pkg"),
            None,
            Box::new(move || {
                calls_in_factory.fetch_add(1, Ordering::SeqCst);
                Err("still broken".into())
            }),
        );

        assert!(implementation.resolve("x").is_err());
        assert!(implementation.resolve("x").is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
