use std::fmt;

/// An executable command implementation.
///
/// A command receives the argument tokens left over after the dispatcher's
/// tree walk and returns a process exit status. How it interprets those
/// tokens is entirely its own business; the dispatcher passes them through
/// untouched and propagates the returned status unchanged.
pub trait Command: Send + Sync {
    fn run(&self, args: &[String]) -> i32;
}

/// Any `Fn(&[String]) -> i32` closure is a command. Handy for small leaf
/// commands and for tests.
impl<F> Command for F
where
    F: Fn(&[String]) -> i32 + Send + Sync,
{
    fn run(&self, args: &[String]) -> i32 {
        self(args)
    }
}

/// Identifies the contributing package that registered a command.
///
/// Used only for diagnostics and conflict reporting; the registry never
/// interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Origin(String);

impl Origin {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Origin {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for Origin {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// The error a factory may fail with while constructing its command.
pub type FactoryError = Box<dyn std::error::Error + Send + Sync>;

/// A deferred constructor for a command implementation.
///
/// The registry stores factories instead of the implementations themselves
/// so that registering a command never runs the code behind it. A factory is
/// invoked at most once per process, on first dispatch to its command.
pub type Factory = Box<dyn Fn() -> std::result::Result<Box<dyn Command>, FactoryError> + Send + Sync>;
