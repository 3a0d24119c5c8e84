//! Argv dispatch over the command tree.
//!
//! The dispatcher walks the registry along the leading argv tokens, stops at
//! the deepest matching node, and either invokes that node's implementation
//! with the leftover tokens or reports why nothing ran. It performs no
//! terminal I/O itself: the result carries leveled notices and a child
//! listing for the CLI layer to print.
//!
//! Exit status contract (stable for scripting):
//!
//! - [`SUCCESS`] (0): the invoked command succeeded
//! - [`UNKNOWN_COMMAND`] (2): a token matched no registered command; the
//!   offending token is named
//! - [`NO_COMMAND_SELECTED`] (3): the tokens named a namespace (or nothing);
//!   a listing of its sub-commands is produced instead
//! - [`COMMAND_UNAVAILABLE`] (4): the matched command's implementation
//!   failed to load; path and origin are named
//! - any other status is the invoked command's own, passed through unchanged

use crate::registry::{ChildInfo, Registry, Walk};

pub const SUCCESS: i32 = 0;
pub const UNKNOWN_COMMAND: i32 = 2;
pub const NO_COMMAND_SELECTED: i32 = 3;
pub const COMMAND_UNAVAILABLE: i32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A message for the CLI layer to render.
#[derive(Debug, Clone)]
pub struct Notice {
    pub level: NoticeLevel,
    pub content: String,
}

impl Notice {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            content: content.into(),
        }
    }
}

/// What one dispatch did: the status to exit with, the path that matched,
/// and anything the CLI should print.
#[derive(Default)]
pub struct DispatchResult {
    pub status: i32,
    pub matched: Vec<String>,
    pub notices: Vec<Notice>,
    /// Sub-commands to render as a help listing, when nothing was invoked.
    pub listing: Vec<ChildInfo>,
}

/// Walks `tokens` against `registry`, resolving and invoking the deepest
/// matching command with the leftover tokens.
pub fn run(registry: &Registry, tokens: &[String]) -> DispatchResult {
    let walk = registry.descend(tokens);
    let leftover = &tokens[walk.consumed..];

    let implementation = match &walk.implementation {
        Some(implementation) => implementation,
        None => {
            return if leftover.is_empty() {
                namespace_listing(walk)
            } else {
                unknown_command(walk, &leftover[0])
            };
        }
    };

    let path = walk.matched.join(" ");
    match implementation.resolve(&path) {
        Ok(command) => DispatchResult {
            status: command.run(leftover),
            matched: walk.matched,
            ..DispatchResult::default()
        },
        Err(err) => DispatchResult {
            status: COMMAND_UNAVAILABLE,
            matched: walk.matched,
            notices: vec![Notice::error(err.to_string())],
            ..DispatchResult::default()
        },
    }
}

fn namespace_listing(walk: Walk) -> DispatchResult {
    let mut notices = Vec::new();
    if walk.children.is_empty() {
        notices.push(Notice::warning("No commands are registered."));
    } else if walk.matched.is_empty() {
        notices.push(Notice::info("Available commands:"));
    } else {
        notices.push(Notice::info(format!(
            "Available '{}' sub-commands:",
            walk.matched.join(" ")
        )));
    }

    DispatchResult {
        status: NO_COMMAND_SELECTED,
        matched: walk.matched,
        notices,
        listing: walk.children,
    }
}

fn unknown_command(walk: Walk, token: &str) -> DispatchResult {
    let mut notices = vec![Notice::error(if walk.matched.is_empty() {
        format!("Unknown command '{}'", token)
    } else {
        format!(
            "Unknown command '{}' under '{}'",
            token,
            walk.matched.join(" ")
        )
    })];
    if !walk.children.is_empty() {
        notices.push(Notice::info("Available commands:"));
    }

    DispatchResult {
        status: UNKNOWN_COMMAND,
        matched: walk.matched,
        notices,
        listing: walk.children,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use crate::registry::Registration;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn tokens(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    fn registry_with(paths: &[&[&str]]) -> Registry {
        let registry = Registry::new();
        for path in paths {
            registry
                .register(Registration::new(
                    path.to_vec(),
                    "test-pkg",
                    || Ok(Box::new(|_: &[String]| 0) as Box<dyn Command>),
                ))
                .unwrap();
        }
        registry
    }

    #[test]
    fn empty_argv_lists_and_selects_nothing() {
        let registry = registry_with(&[&["a", "b"]]);

        let result = run(&registry, &[]);
        assert_eq!(result.status, NO_COMMAND_SELECTED);
        assert_eq!(result.listing.len(), 1);
        assert_eq!(result.listing[0].name, "a");
    }

    #[test]
    fn unknown_token_is_named() {
        let registry = registry_with(&[&["a"]]);

        let result = run(&registry, &tokens(&["nosuchcmd"]));
        assert_eq!(result.status, UNKNOWN_COMMAND);
        assert!(result.notices[0].content.contains("nosuchcmd"));
    }

    #[test]
    fn unknown_token_below_a_namespace_is_named_with_its_parent() {
        let registry = registry_with(&[&["a", "b"]]);

        let result = run(&registry, &tokens(&["a", "nosuch"]));
        assert_eq!(result.status, UNKNOWN_COMMAND);
        assert!(result.notices[0].content.contains("nosuch"));
        assert!(result.notices[0].content.contains('a'));
    }

    #[test]
    fn namespace_match_lists_its_children() {
        let registry = registry_with(&[&["a", "b"], &["a", "c"]]);

        let result = run(&registry, &tokens(&["a"]));
        assert_eq!(result.status, NO_COMMAND_SELECTED);
        let names: Vec<_> = result.listing.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["b", "c"]);
    }

    #[test]
    fn leftover_tokens_reach_the_command_and_its_status_passes_through() {
        let registry = Registry::new();
        let seen: Arc<std::sync::Mutex<Vec<String>>> = Arc::default();
        let seen_in_command = Arc::clone(&seen);
        registry
            .register(Registration::new(["a", "b"], "test-pkg", move || {
                let seen = Arc::clone(&seen_in_command);
                Ok(Box::new(move |args: &[String]| {
                    seen.lock().unwrap().extend(args.iter().cloned());
                    42
                }) as Box<dyn Command>)
            }))
            .unwrap();

        let result = run(&registry, &tokens(&["a", "b", "extra1", "extra2"]));
        assert_eq!(result.status, 42);
        assert_eq!(result.matched, vec!["a", "b"]);
        assert_eq!(*seen.lock().unwrap(), tokens(&["extra1", "extra2"]));
    }

    #[test]
    fn factory_is_invoked_once_across_dispatches() {
        let registry = Registry::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_in_factory = Arc::clone(&calls);
        registry
            .register(Registration::new(["a"], "test-pkg", move || {
                calls_in_factory.fetch_add(1, Ordering::SeqCst);
                Ok(Box::new(|_: &[String]| 0) as Box<dyn Command>)
            }))
            .unwrap();

        assert_eq!(run(&registry, &tokens(&["a"])).status, 0);
        assert_eq!(run(&registry, &tokens(&["a"])).status, 0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failing_factory_reports_unavailable_and_spares_other_commands() {
        let registry = registry_with(&[&["ok"]]);
        registry
            .register(Registration::new(
                ["broken"],
                "broken-pkg",
                || Err("no backend".into()),
            ))
            .unwrap();

        let result = run(&registry, &tokens(&["broken"]));
        assert_eq!(result.status, COMMAND_UNAVAILABLE);
        assert!(result.notices[0].content.contains("broken-pkg"));
        assert!(result.notices[0].content.contains("no backend"));

        // The registry stays usable for unrelated commands.
        assert_eq!(run(&registry, &tokens(&["ok"])).status, SUCCESS);
    }

    #[test]
    fn command_with_children_still_runs_its_default_behavior() {
        let registry = Registry::new();
        registry
            .register(Registration::new(["git"], "pynl-git", || {
                Ok(Box::new(|_: &[String]| 5) as Box<dyn Command>)
            }))
            .unwrap();
        registry
            .register(Registration::new(["git", "version"], "pynl-git", || {
                Ok(Box::new(|_: &[String]| 6) as Box<dyn Command>)
            }))
            .unwrap();

        assert_eq!(run(&registry, &tokens(&["git"])).status, 5);
        assert_eq!(run(&registry, &tokens(&["git", "version"])).status, 6);
    }
}
