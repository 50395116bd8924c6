use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures reported by the engine boundary.
///
/// The facade never translates these; they reach the caller wrapped in
/// [`SanderError::Native`].
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum NativeError {
    #[error("A sander system is already set up!")]
    AlreadySetUp,

    #[error("No sander system is currently set up!")]
    NotSetUp,

    #[error("sander setup failed with status {code}")]
    SetupFailed { code: i32 },

    #[error("Invalid input for the native solver: {0}")]
    InvalidInput(String),

    #[error("The native solver handle is already owned elsewhere in this process")]
    HandleInUse,
}

#[derive(Debug, Error)]
pub enum SanderError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{argument} must be {expected}, not {found}")]
    WrongType {
        argument: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),

    #[error("Failed to create a temporary topology file: {0}")]
    TemporaryFile(#[source] io::Error),

    #[error("Failed to write topology to '{}': {source}", path.display())]
    TopologyWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read restart file '{}': {source}", path.display())]
    Restart {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Coordinates name the restart file '{}', but no restart parser is registered", path.display())]
    NoRestartParser { path: PathBuf },

    #[error(transparent)]
    Native(#[from] NativeError),
}
