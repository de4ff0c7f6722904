/*!
 Errors that make an entire archive unusable.
*/

use std::fmt::{Display, Formatter, Result};

use crate::{archive::models::ArchiveKind, error::stream::StreamError};

/// Errors that can happen when reading the archive header or preparing to read its records
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveError {
    Stream(StreamError),
    CategoryOverflow(u32),
    WrongArchiveType(u32),
    UnexpectedFieldWidth(u32, u32),
    UnreasonableEntryCount(u32),
}

impl Display for ArchiveError {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> Result {
        match self {
            ArchiveError::Stream(why) => write!(fmt, "Failed to read archive header: {why}"),
            ArchiveError::CategoryOverflow(count) => {
                write!(fmt, "Too many categories: {count}")
            }
            ArchiveError::WrongArchiveType(found) => {
                write!(
                    fmt,
                    "{} archives are not supported, type={found:#010x}",
                    ArchiveKind::from_signature(*found)
                )
            }
            ArchiveError::UnexpectedFieldWidth(found, expected) => {
                write!(fmt, "Fields per row = {found}, expected {expected}")
            }
            ArchiveError::UnreasonableEntryCount(count) => {
                write!(fmt, "Unreasonable number of datebook entries: {count}")
            }
        }
    }
}

impl std::error::Error for ArchiveError {}

impl From<StreamError> for ArchiveError {
    fn from(why: StreamError) -> Self {
        ArchiveError::Stream(why)
    }
}
