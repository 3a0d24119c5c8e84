use thiserror::Error;

#[derive(Error, Debug)]
pub enum NimbelinkError {
    #[error("Invalid command path: {0}")]
    InvalidPath(String),

    #[error("Command '{path}' is already registered by '{existing}'; rejecting registration from '{incoming}'")]
    RegistrationConflict {
        path: String,
        existing: String,
        incoming: String,
    },

    #[error("Command '{path}' from '{origin}' could not be loaded: {reason}")]
    Resolution {
        path: String,
        origin: String,
        reason: String,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NimbelinkError>;
