/*!
 Errors that can happen when reading primitive values from an archive byte stream.
*/

use std::{
    fmt::{Display, Formatter, Result},
    io::ErrorKind,
};

/// Errors that can happen when reading primitive values from the byte stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    /// Fewer bytes were available than a read required: `(offset, requested)`
    Truncated(u64, usize),
    /// The byte source failed for a reason other than running out of data
    Unreadable(u64, ErrorKind),
}

impl Display for StreamError {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> Result {
        match self {
            StreamError::Truncated(offset, requested) => {
                write!(fmt, "Short read at offset {offset:#x}: wanted {requested} bytes!")
            }
            StreamError::Unreadable(offset, kind) => {
                write!(fmt, "Unable to read stream at offset {offset:#x}: {kind}")
            }
        }
    }
}

impl std::error::Error for StreamError {}
