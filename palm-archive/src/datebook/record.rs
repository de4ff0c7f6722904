/*!
 Contains logic to decode a single Datebook record.

 A record is a fixed sequence of fifteen fields. Each field is a four-byte type tag followed by the field's value:

 | # | Field       | Tag | Value                         |
 |---|-------------|-----|-------------------------------|
 | 1 | record id   | 1   | u32                           |
 | 2 | status      | 1   | u32, `0x04` if deleted        |
 | 3 | position    | 1   | u32                           |
 | 4 | start time  | 3   | u32 epoch seconds             |
 | 5 | end time    | 1   | u32 epoch seconds             |
 | 6 | description | 5   | u32 padding, string           |
 | 7 | duration    | 1   | u32 seconds                   |
 | 8 | note        | 5   | u32 padding, string           |
 | 9 | untimed     | 6   | u32 boolean                   |
 | 10| private     | 6   | u32 boolean                   |
 | 11| category    | 1   | u32                           |
 | 12| alarm set   | 6   | u32 boolean                   |
 | 13| alarm units | 1   | u32                           |
 | 14| alarm type  | 1   | u32                           |
 | 15| repeat      | 8   | [repeat block](crate::datebook::repeat) |

 Decoding stops at the first tag that does not match. Bytes already consumed stay consumed, and the
 rest of the record is left in the stream.
*/

use std::io::Read;

use crate::{
    datebook::{
        models::{Appointment, DatebookEntry},
        options::DecodeOptions,
        recurrence::expand,
        repeat::RepeatRule,
    },
    error::record::RecordError,
    util::{stream::ArchiveStream, text::field_text},
};

/// Number of fields in every Datebook record
pub const FIELDS_PER_ENTRY: u32 = 15;

/// Status value that marks a record as deleted
const STATUS_DELETED: u32 = 0x04;

/// Tag for integer fields
pub const TAG_INTEGER: u32 = 1;
/// Tag for date fields
pub const TAG_DATE: u32 = 3;
/// Tag for string fields
pub const TAG_TEXT: u32 = 5;
/// Tag for boolean fields
pub const TAG_BOOLEAN: u32 = 6;
/// Tag for the repeat block
pub const TAG_REPEAT: u32 = 8;

/// Reads the fields of one record, tagging every failure with the record being decoded
pub(crate) struct RecordCursor<'a, R> {
    stream: &'a mut ArchiveStream<R>,
    /// Zero until the record id field has been read
    pub(crate) record_id: u32,
}

impl<'a, R: Read> RecordCursor<'a, R> {
    fn new(stream: &'a mut ArchiveStream<R>) -> Self {
        Self {
            stream,
            record_id: 0,
        }
    }

    /// Read the type tag for the field at `position` and ensure it is the one the format requires
    pub(crate) fn expect_tag(
        &mut self,
        position: u8,
        field: &'static str,
        expected: u32,
    ) -> Result<(), RecordError> {
        let actual = self.u32()?;
        self.check(position, field, expected, actual)
    }

    pub(crate) fn check(
        &self,
        position: u8,
        field: &'static str,
        expected: u32,
        actual: u32,
    ) -> Result<(), RecordError> {
        if actual != expected {
            return Err(RecordError::TypeTagMismatch {
                record_id: self.record_id,
                field,
                position,
                expected,
                actual,
            });
        }
        Ok(())
    }

    pub(crate) fn u32(&mut self) -> Result<u32, RecordError> {
        self.stream.read_u32().map_err(|source| self.truncated(source))
    }

    pub(crate) fn u16(&mut self) -> Result<u16, RecordError> {
        self.stream.read_u16().map_err(|source| self.truncated(source))
    }

    pub(crate) fn u8(&mut self) -> Result<u8, RecordError> {
        self.stream.read_u8().map_err(|source| self.truncated(source))
    }

    pub(crate) fn bytes(&mut self, n: usize) -> Result<Vec<u8>, RecordError> {
        self.stream
            .read_exact_bytes(n)
            .map_err(|source| self.truncated(source))
    }

    /// Read a padding word followed by a string, flattened to a single line
    fn text(&mut self) -> Result<Option<String>, RecordError> {
        self.u32()?;
        let bytes = self
            .stream
            .read_string()
            .map_err(|source| self.truncated(source))?;
        Ok(field_text(bytes))
    }

    fn truncated(&self, source: crate::error::stream::StreamError) -> RecordError {
        RecordError::Truncated {
            record_id: self.record_id,
            source,
        }
    }
}

/// Decode the next record from the stream.
///
/// Deleted records are fully consumed and reported as [`DatebookEntry::Tombstone`].
/// A live record with a repeat rule has its repetitions expanded before it is returned.
pub fn read_record<R: Read>(
    stream: &mut ArchiveStream<R>,
    options: &DecodeOptions,
) -> Result<DatebookEntry, RecordError> {
    let mut cursor = RecordCursor::new(stream);

    cursor.expect_tag(1, "record ID", TAG_INTEGER)?;
    cursor.record_id = cursor.u32()?;

    cursor.expect_tag(2, "status", TAG_INTEGER)?;
    let deleted = cursor.u32()? == STATUS_DELETED;

    cursor.expect_tag(3, "position", TAG_INTEGER)?;
    cursor.u32()?;

    cursor.expect_tag(4, "start time", TAG_DATE)?;
    let start_time = cursor.u32()? as i64;

    cursor.expect_tag(5, "end time", TAG_INTEGER)?;
    let mut end_time = cursor.u32()? as i64;

    cursor.expect_tag(6, "description", TAG_TEXT)?;
    let summary = cursor.text()?;

    cursor.expect_tag(7, "duration", TAG_INTEGER)?;
    let duration = cursor.u32()? as i64;
    // Some producers store a duration instead of an end time
    if start_time == end_time && duration > 0 {
        end_time = start_time + duration;
    }

    cursor.expect_tag(8, "note", TAG_TEXT)?;
    let description = cursor.text()?;

    cursor.expect_tag(9, "untimed", TAG_BOOLEAN)?;
    let all_day = cursor.u32()? != 0;

    cursor.expect_tag(10, "private", TAG_BOOLEAN)?;
    let private = cursor.u32()? != 0;

    cursor.expect_tag(11, "category", TAG_INTEGER)?;
    let category = cursor.u32()?;

    cursor.expect_tag(12, "alarm set", TAG_BOOLEAN)?;
    cursor.u32()?;

    cursor.expect_tag(13, "alarm units", TAG_INTEGER)?;
    cursor.u32()?;

    cursor.expect_tag(14, "alarm type", TAG_INTEGER)?;
    cursor.u32()?;

    cursor.expect_tag(15, "repeat", TAG_REPEAT)?;
    let repeat = RepeatRule::read_block(&mut cursor)?;

    if deleted {
        return Ok(DatebookEntry::Tombstone {
            record_id: cursor.record_id,
        });
    }

    let mut appointment = Appointment {
        record_id: cursor.record_id,
        start_time,
        end_time,
        summary,
        description,
        private,
        all_day,
        category,
        repeat: None,
        repetitions: vec![],
    };
    if let Some(rule) = repeat {
        for occurrence in expand(start_time, &rule, options.max_repetitions) {
            appointment.add(occurrence);
        }
        appointment.repeat = Some(rule);
    }

    Ok(DatebookEntry::Appointment(appointment))
}
