//! Error types for bundle orchestration.
//!
//! Every failure in this layer is a single attempt: nothing is retried, and
//! errors propagate to the host pipeline which decides how to surface them.

use std::{
    fmt::Display,
    io,
    path::{Path, PathBuf},
};
use thiserror::Error as DeriveError;

/// Result alias for orchestration operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building, relocating, or cleaning up.
#[derive(Debug, DeriveError)]
#[non_exhaustive]
pub enum Error {
    /// The bundling collaborator failed for an entry. Fatal, never retried.
    #[error("failed to bundle entry `{entry}`: {source:#}")]
    Bundle {
        entry: String,
        #[source]
        source: anyhow::Error,
    },

    /// Build output could not be copied back into the service layout.
    #[error("failed to relocate {from:?} to {to:?}: {source}")]
    Relocation {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: Box<Error>,
    },

    /// I/O error with the operation and path that produced it.
    #[error("{context} {path:?}: {source}")]
    Fs {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Build folder would escape the service directory.
    #[error("invalid build folder `{0}`: must be a relative path inside the service directory")]
    InvalidBuildFolder(String),

    /// Entry directory is absolute or climbs above the service directory.
    #[error("entry `{0}` resolves outside the service directory")]
    EntryOutsideService(String),

    /// Requested function is not declared by the service.
    #[error("function `{0}` is not defined in the service")]
    UnknownFunction(String),

    /// External bundler program could not be located on PATH.
    #[error("bundler tool `{0}` not found in PATH")]
    ToolNotFound(String),

    /// Service definition is malformed.
    #[error("invalid service configuration in {path:?}: {reason}")]
    Config { path: PathBuf, reason: String },

    #[error("{0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("{0}")]
    StripPrefix(#[from] std::path::StripPrefixError),

    #[error("{0}")]
    IoError(#[from] io::Error),

    #[error("{0}")]
    GenericError(String),
}

/// Attaches file system context to I/O results.
pub trait ErrorExt<T> {
    /// Wraps an I/O error with a description of the operation and its path.
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, io::Error> {
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|source| Error::Fs {
            context,
            path: path.as_ref().to_path_buf(),
            source,
        })
    }
}

/// Converts a missing value into a [`Error::GenericError`].
pub trait Context<T> {
    fn context<C: Display>(self, context: C) -> Result<T>;
}

impl<T> Context<T> for Option<T> {
    fn context<C: Display>(self, context: C) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(context.to_string()))
    }
}

/// Returns early with a [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::bundler::Error::GenericError(format!($($arg)*)))
    };
}
