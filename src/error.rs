use std::path::PathBuf;

use thiserror::Error;

/// Fatal setup/output failures. The library never terminates the process;
/// errors propagate to the binaries, which report and exit non-zero
/// without writing partial results.
#[derive(Debug, Error)]
pub enum Error {
    #[error("could not {op} {path}: {source}")]
    Io {
        op: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not read param file: {0}")]
    ParamFormat(String),

    #[error("obstacle file: {0}")]
    ObstacleFormat(String),
}

impl Error {
    pub fn io(op: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            op,
            path: path.into(),
            source,
        }
    }
}
