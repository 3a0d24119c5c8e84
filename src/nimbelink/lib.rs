//! # Nimbelink Architecture
//!
//! Nimbelink is a **command registry with a CLI front**, not a CLI that happens
//! to hard-code its sub-commands. The `nimbelink` binary owns nothing but a
//! few builtins; every other command arrives from an independently installed
//! package that registers a subtree during its own initialization.
//!
//! ```text
//! contributing package init        nimbelink binary
//!          |                              |
//!          v                              v
//!   registry::register()  ---->  [ Registry: command tree ]
//!                                         |
//!                                dispatch::run(argv)
//!                                         |
//!                            walk argv prefix, deepest match
//!                                         |
//!                          loader: resolve factory (once, cached)
//!                                         |
//!                          command.run(leftover args) -> status
//! ```
//!
//! Three rules hold the design together:
//!
//! 1. **Registration is cheap.** A registration stores a path, an origin name,
//!    and a zero-argument factory. No contributed code runs until the user
//!    actually invokes that command, so installing forty packages does not
//!    slow down `nimbelink --help`.
//!
//! 2. **Conflicts fail fast, at startup.** Two packages claiming the same path
//!    is an error naming both, raised at registration time rather than
//!    surfacing as whichever-loaded-last at dispatch time. A deliberate
//!    override is possible and leaves the displaced origin on record.
//!
//! 3. **The core does no terminal I/O.** `dispatch::run` returns a structured
//!    result (status, notices, child listing); `main.rs` is the only place
//!    that prints, colors, or exits. Leaf commands own their I/O like any
//!    external process would.
//!
//! ## Module Overview
//!
//! - [`registry`]: the command tree; registration, lookup, listing
//! - [`dispatch`]: argv walking and the exit-status contract
//! - [`loader`]: once-per-process factory resolution
//! - [`command`]: the `Command` trait, `Origin`, and `Factory` types
//! - [`config`]: persisted CLI display options
//! - [`builtins`]: the commands this package itself contributes
//! - [`error`]: error types

pub mod builtins;
pub mod command;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod loader;
pub mod registry;

pub use command::{Command, Factory, Origin};
pub use error::{NimbelinkError, Result};
pub use registry::{register, Registration, Registry};
