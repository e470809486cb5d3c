//! Image artifact subsystem.
//!
//! # Data Flow
//! ```text
//! GET .../prog.aci (authenticated)
//!     → ArtifactBuilder::build() on a blocking thread
//!     → toolchain.rs (scratch tree → compile → stamp → package → read)
//!     → bytes returned to the router, scratch directory removed
//! ```
//!
//! # Design Decisions
//! - The router only sees the trait; tool invocation stays behind it
//! - Every call is a fresh build, nothing is cached
//! - Builds are synchronous; callers move them off the async executor

pub mod payload;
pub mod toolchain;

use std::path::PathBuf;

use thiserror::Error;

pub use toolchain::ToolchainBuilder;

/// Builds the image served at `.../prog.aci`.
pub trait ArtifactBuilder: Send + Sync + 'static {
    /// Build the image now and return its bytes.
    fn build(&self) -> Result<Vec<u8>, BuildError>;
}

/// Errors raised while building the image.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Scratch tree could not be created or populated.
    #[error("failed to build image tree at {path:?}: {source}")]
    Tree {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A required tool is not installed or not executable.
    #[error("failed to find `{tool}`: {source}")]
    ToolMissing {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// A tool ran and exited unsuccessfully.
    #[error("failed to execute `{command}`: {status}\nstdout:\n{stdout}\n\nstderr:\n{stderr}")]
    ToolFailed {
        command: String,
        status: std::process::ExitStatus,
        stdout: String,
        stderr: String,
    },

    /// Build timestamp could not be written.
    #[error("failed to write a stamp: {0}")]
    Stamp(#[source] std::io::Error),

    /// Packaged image could not be read back.
    #[error("failed to read image to memory: {0}")]
    Read(#[source] std::io::Error),

    /// The build task died before returning.
    #[error("build task panicked: {0}")]
    Panicked(String),
}
