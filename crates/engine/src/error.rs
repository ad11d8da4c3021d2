use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Which filesystem step failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoOp {
    Read,
    Write,
    Persist,
}

impl fmt::Display for IoOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IoOp::Read => "read",
            IoOp::Write => "write",
            IoOp::Persist => "replace",
        })
    }
}

#[derive(Error, Debug)]
pub enum InlayError {
    #[error("File not found: {0:?}")]
    NotFound(PathBuf),
    #[error("Failed to {op} {path:?}: {source}")]
    Io {
        op: IoOp,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Artifact {0:?} is not valid base64: {1}")]
    InvalidArtifact(PathBuf, base64::DecodeError),
    #[error("Template for '{0}' has neither a {{base64}} nor a {{data_uri}} token")]
    InvalidTemplate(String),
    #[error("Manifest {0:?} is malformed: {1}")]
    Manifest(PathBuf, #[source] serde_json::Error),
    #[error("Manifest {0:?} lists no assets")]
    EmptyManifest(PathBuf),
}

impl InlayError {
    /// Classify an `io::Error` raised while touching `path`.
    pub fn io(op: IoOp, path: &Path, source: io::Error) -> Self {
        if op == IoOp::Read && source.kind() == io::ErrorKind::NotFound {
            InlayError::NotFound(path.to_path_buf())
        } else {
            InlayError::Io {
                op,
                path: path.to_path_buf(),
                source,
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, InlayError::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, InlayError>;
