//! The shared command tree.
//!
//! A [`Registry`] maps segmented command paths (`device flash`) to command
//! nodes. Any number of independently installed packages contribute subtrees
//! by calling [`register`] during their own initialization; none of them needs
//! to know the others exist. The tree is mutated only under the registry's
//! lock, and the lock is never held while a command's factory runs.
//!
//! Registering the same path twice from different origins is a conflict and
//! fails fast, unless the later registration explicitly opts into
//! replacement, in which case the displaced origin is recorded as shadowed and
//! stays retrievable for diagnostics. Re-registration by the same origin
//! replaces silently, so a package re-running its own initialization is
//! harmless.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use once_cell::sync::Lazy;

use crate::command::{Command, Factory, FactoryError, Origin};
use crate::error::{NimbelinkError, Result};
use crate::loader::Implementation;

/// A single node in the command tree. The node's name is its key in the
/// parent's child map.
struct Node {
    children: BTreeMap<String, Node>,
    implementation: Option<Arc<Implementation>>,
    shadowed: Vec<Origin>,
}

impl Node {
    fn new() -> Self {
        Self {
            children: BTreeMap::new(),
            implementation: None,
            shadowed: Vec::new(),
        }
    }

    fn child_infos(&self) -> Vec<ChildInfo> {
        self.children
            .iter()
            .map(|(name, child)| ChildInfo {
                name: name.clone(),
                help: child
                    .implementation
                    .as_ref()
                    .and_then(|i| i.help().map(str::to_string)),
                origin: child.implementation.as_ref().map(|i| i.origin().clone()),
                has_implementation: child.implementation.is_some(),
                has_children: !child.children.is_empty(),
            })
            .collect()
    }
}

/// One command contribution: a path, the contributing origin, a deferred
/// factory, and optional help text for listings.
pub struct Registration {
    path: Vec<String>,
    origin: Origin,
    help: Option<String>,
    replace: bool,
    factory: Factory,
}

impl Registration {
    pub fn new<I, S, F>(path: I, origin: impl Into<Origin>, factory: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn() -> std::result::Result<Box<dyn Command>, FactoryError> + Send + Sync + 'static,
    {
        Self {
            path: path.into_iter().map(Into::into).collect(),
            origin: origin.into(),
            help: None,
            replace: false,
            factory: Box::new(factory),
        }
    }

    /// One-line description shown in help listings.
    pub fn help(mut self, text: impl Into<String>) -> Self {
        self.help = Some(text.into());
        self
    }

    /// Deliberately replace an implementation another origin already
    /// registered at this path. Without this, such a registration is a
    /// conflict error.
    pub fn replace_existing(mut self) -> Self {
        self.replace = true;
        self
    }
}

/// One row of a node's child listing.
#[derive(Debug, Clone)]
pub struct ChildInfo {
    pub name: String,
    pub help: Option<String>,
    pub origin: Option<Origin>,
    pub has_implementation: bool,
    pub has_children: bool,
}

/// A read-only snapshot of one command node.
pub struct NodeInfo {
    pub implementation: Option<Arc<Implementation>>,
    pub shadowed: Vec<Origin>,
    pub children: Vec<ChildInfo>,
}

/// An implemented command, as reported by [`Registry::commands`].
#[derive(Debug, Clone)]
pub struct CommandInfo {
    pub path: Vec<String>,
    pub origin: Origin,
    pub help: Option<String>,
}

/// Result of walking the tree along an argv prefix.
pub struct Walk {
    /// The path segments that matched, root-down.
    pub matched: Vec<String>,
    /// How many leading tokens the walk consumed.
    pub consumed: usize,
    /// The matched node's implementation, if any.
    pub implementation: Option<Arc<Implementation>>,
    /// The matched node's children, for help listings.
    pub children: Vec<ChildInfo>,
}

pub struct Registry {
    root: Mutex<Node>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            root: Mutex::new(Node::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Node> {
        self.root.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Adds one command contribution to the tree, creating any missing
    /// intermediate namespace nodes along its path.
    ///
    /// The factory is stored, never called; no contributed code runs here.
    pub fn register(&self, registration: Registration) -> Result<()> {
        let Registration {
            path,
            origin,
            help,
            replace,
            factory,
        } = registration;

        validate_path(&path)?;

        let mut root = self.lock();
        let mut node = &mut *root;
        for segment in &path {
            node = node.children.entry(segment.clone()).or_insert_with(Node::new);
        }

        if let Some(existing) = &node.implementation {
            if existing.origin() != &origin {
                if !replace {
                    return Err(NimbelinkError::RegistrationConflict {
                        path: path.join(" "),
                        existing: existing.origin().to_string(),
                        incoming: origin.to_string(),
                    });
                }
                node.shadowed.push(existing.origin().clone());
            }
        }

        node.implementation = Some(Arc::new(Implementation::new(origin, help, factory)));
        Ok(())
    }

    /// Follows `path` one segment at a time. Absent is `None`, not an error:
    /// an unknown command is not a structural problem.
    pub fn lookup<S: AsRef<str>>(&self, path: &[S]) -> Option<NodeInfo> {
        let root = self.lock();
        let mut node = &*root;
        for segment in path {
            node = node.children.get(segment.as_ref())?;
        }
        Some(NodeInfo {
            implementation: node.implementation.clone(),
            shadowed: node.shadowed.clone(),
            children: node.child_infos(),
        })
    }

    /// The children of the node at `path`, name-ordered. Empty if the path
    /// doesn't exist. Resolves nothing.
    pub fn list_children<S: AsRef<str>>(&self, path: &[S]) -> Vec<ChildInfo> {
        self.lookup(path).map(|info| info.children).unwrap_or_default()
    }

    /// Walks the tree along the leading `tokens`, stopping at the first token
    /// that names no child. The returned snapshot is detached from the tree,
    /// so no lock is held when the caller later resolves the implementation.
    pub fn descend(&self, tokens: &[String]) -> Walk {
        let root = self.lock();
        let mut node = &*root;
        let mut matched = Vec::new();
        for token in tokens {
            match node.children.get(token) {
                Some(child) => {
                    node = child;
                    matched.push(token.clone());
                }
                None => break,
            }
        }
        Walk {
            consumed: matched.len(),
            matched,
            implementation: node.implementation.clone(),
            children: node.child_infos(),
        }
    }

    /// Every implemented command in the tree, in path order.
    pub fn commands(&self) -> Vec<CommandInfo> {
        fn collect(node: &Node, path: &mut Vec<String>, out: &mut Vec<CommandInfo>) {
            if let Some(implementation) = &node.implementation {
                out.push(CommandInfo {
                    path: path.clone(),
                    origin: implementation.origin().clone(),
                    help: implementation.help().map(str::to_string),
                });
            }
            for (name, child) in &node.children {
                path.push(name.clone());
                collect(child, path, out);
                path.pop();
            }
        }

        let root = self.lock();
        let mut out = Vec::new();
        collect(&root, &mut Vec::new(), &mut out);
        out
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_path(path: &[String]) -> Result<()> {
    if path.is_empty() {
        return Err(NimbelinkError::InvalidPath("path is empty".to_string()));
    }
    for segment in path {
        if segment.is_empty() {
            return Err(NimbelinkError::InvalidPath("empty path segment".to_string()));
        }
        let bad = |c: char| c.is_whitespace() || c.is_control() || c == '/' || c == '\\';
        if segment.chars().any(bad) {
            return Err(NimbelinkError::InvalidPath(format!(
                "invalid path segment '{}'",
                segment
            )));
        }
    }
    Ok(())
}

static GLOBAL: Lazy<Registry> = Lazy::new(Registry::new);

/// The process-wide registry the `nimbelink` binary dispatches against.
///
/// Created on first touch, discarded at process exit. Contributing packages
/// register against it during their own initialization; dispatch only reads.
pub fn global() -> &'static Registry {
    &GLOBAL
}

/// Registers a command contribution against the process-wide registry.
///
/// This is the sole boundary a contributing package needs: call it during
/// initialization, before dispatch runs.
pub fn register(registration: Registration) -> Result<()> {
    GLOBAL.register(registration)
}
