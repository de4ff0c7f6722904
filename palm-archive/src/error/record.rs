/*!
 Errors that can happen when decoding a single datebook record.
*/

use std::fmt::{Display, Formatter, Result};

use crate::error::stream::StreamError;

/// Errors that can happen when decoding a single datebook record
///
/// Only [`RecordError::UnsupportedBrand`] is fatal to the archive; the others
/// discard the current record and leave the stream wherever the failure happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// The stream ended before the record was complete
    Truncated { record_id: u32, source: StreamError },
    /// A field was preceded by a type tag other than the one the format requires
    TypeTagMismatch {
        record_id: u32,
        field: &'static str,
        /// One-based position of the field in the record
        position: u8,
        expected: u32,
        actual: u32,
    },
    /// The repeat block named a recurrence kind outside `1..=6`
    UnsupportedBrand { record_id: u32, brand: u32 },
}

impl RecordError {
    /// Whether the stream position can no longer be trusted for any later record
    pub fn is_fatal(&self) -> bool {
        matches!(self, RecordError::UnsupportedBrand { .. })
    }

    /// The record id that was being decoded, `0` if the failure came before it was read
    pub fn record_id(&self) -> u32 {
        match self {
            RecordError::Truncated { record_id, .. }
            | RecordError::TypeTagMismatch { record_id, .. }
            | RecordError::UnsupportedBrand { record_id, .. } => *record_id,
        }
    }
}

impl Display for RecordError {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> Result {
        match self {
            RecordError::Truncated { record_id, source } => {
                write!(fmt, "record {record_id}: {source}")
            }
            RecordError::TypeTagMismatch {
                record_id,
                field,
                position,
                expected,
                actual,
            } => write!(
                fmt,
                "record {record_id}, field {position} ({field}), type {actual} != {expected}"
            ),
            RecordError::UnsupportedBrand { record_id, brand } => {
                write!(fmt, "record {record_id}: unrecognized repetition brand: {brand}")
            }
        }
    }
}

impl std::error::Error for RecordError {}
