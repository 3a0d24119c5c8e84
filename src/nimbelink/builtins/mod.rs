//! Commands the root package itself contributes.
//!
//! Builtins go through the same [`crate::registry::register`] call any
//! external package uses; nothing here is special-cased in the dispatcher.

use crate::error::Result;
use crate::registry;

pub mod config;
pub mod module;

/// Origin name the root package registers its own commands under.
pub const ORIGIN: &str = "nimbelink";

/// Registers the built-in commands against the process-wide registry.
///
/// Safe to call more than once: re-registration by the same origin replaces
/// silently.
pub fn install() -> Result<()> {
    registry::register(module::registration())?;
    registry::register(config::registration())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn install_is_idempotent() {
        install().unwrap();
        install().unwrap();

        let paths: Vec<_> = registry::global()
            .commands()
            .into_iter()
            .filter(|c| c.origin.name() == ORIGIN)
            .map(|c| c.path.join(" "))
            .collect();
        assert!(paths.contains(&"module list".to_string()));
        assert!(paths.contains(&"config".to_string()));
    }
}
