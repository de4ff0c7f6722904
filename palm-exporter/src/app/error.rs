/*!
Errors that can happen during the application's runtime
*/

use std::{
    fmt::{Display, Formatter, Result},
    io::Error as IoError,
    path::PathBuf,
};

use palm_archive::error::archive::ArchiveError;

/// Errors that can happen during the application's runtime
#[derive(Debug)]
pub enum RuntimeError {
    InvalidOptions(String),
    CreateError(IoError, PathBuf),
    DiskError(IoError),
    ArchiveError(ArchiveError, PathBuf),
    /// Some archives could not be exported: failed, total
    IncompleteExport(usize, usize),
}

impl Display for RuntimeError {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> Result {
        match self {
            RuntimeError::InvalidOptions(why) => write!(fmt, "Invalid options!\n{why}"),
            RuntimeError::CreateError(why, path) => write!(fmt, "{why}: {path:?}"),
            RuntimeError::DiskError(why) => write!(fmt, "{why}"),
            RuntimeError::ArchiveError(why, path) => write!(fmt, "{path:?}: {why}"),
            RuntimeError::IncompleteExport(failed, total) => {
                write!(fmt, "{failed} of {total} archives were not fully exported")
            }
        }
    }
}

impl std::error::Error for RuntimeError {}
