//! Backend errors.

use thiserror::Error;

/// Errors that can occur while configuring, building, or running a simulation.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("verilator section is missing in the description of system '{system}'")]
    MissingToolSection { system: String },

    #[error("system '{system}' is missing the mandatory parameter 'top_module'")]
    MissingTopModule { system: String },

    #[error(
        "verilator not found: set VERILATOR_ROOT to a Verilator installation \
         or put the verilator program on your PATH"
    )]
    ToolchainNotFound,

    #[error("{program} failed with {status}")]
    SubprocessFailure {
        program: String,
        status: std::process::ExitStatus,
    },

    #[error("failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid simulation arguments: {0}")]
    Arguments(#[from] clap::Error),

    #[error("unknown simulator '{name}' (available: {})", .available.join(", "))]
    UnknownTool {
        name: String,
        available: Vec<&'static str>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for backend operations.
pub type Result<T> = std::result::Result<T, BackendError>;
