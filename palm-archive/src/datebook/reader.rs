/*!
 Contains logic to walk every record of a Datebook archive.
*/

use std::{fmt::Display, io::Read};

use crate::{
    archive::{header::ArchiveHeader, models::ArchiveKind},
    datebook::{
        models::DatebookEntry,
        options::DecodeOptions,
        record::{read_record, FIELDS_PER_ENTRY},
    },
    error::{archive::ArchiveError, record::RecordError},
    util::stream::ArchiveStream,
};

/// Upper bound on the number of records an archive may declare
pub const MAX_ENTRIES: u32 = 1_000_000;

/// Counts of what happened to each record during a decode pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecodeSummary {
    /// Number of records the archive declared
    pub expected: u32,
    /// Records decoded into appointments
    pub processed: u32,
    /// Records marked as deleted
    pub deleted: u32,
    /// Records dropped because they could not be decoded
    pub discarded: u32,
    /// Whether the pass stopped early because the stream could no longer be trusted
    pub aborted: bool,
}

impl Display for DecodeSummary {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            fmt,
            "expected {}, processed {}, deleted {}, discarded {}",
            self.expected, self.processed, self.deleted, self.discarded
        )?;
        if self.aborted {
            write!(fmt, " (aborted)")?;
        }
        Ok(())
    }
}

/// Reads the records of a Datebook archive one at a time.
///
/// Records that fail to decode are yielded as errors and counted as discards; decoding then continues
/// from wherever the failure left the stream. After a fatal error, no further records are attempted.
///
/// ```no_run
/// use std::{fs::File, io::BufReader};
/// use palm_archive::datebook::{options::DecodeOptions, reader::DatebookReader};
///
/// let file = BufReader::new(File::open("datebook.dba").unwrap());
/// let mut reader = DatebookReader::new(file, DecodeOptions::default()).unwrap();
/// for entry in reader.by_ref() {
///     println!("{entry:?}");
/// }
/// println!("{}", reader.summary());
/// ```
#[derive(Debug)]
pub struct DatebookReader<R> {
    stream: ArchiveStream<R>,
    header: ArchiveHeader,
    options: DecodeOptions,
    /// Records not yet attempted
    remaining: u32,
    summary: DecodeSummary,
    /// Whether the summary has been logged
    reported: bool,
}

impl<R: Read> DatebookReader<R> {
    /// Read the archive header from `source` and prepare to read its records
    pub fn new(source: R, options: DecodeOptions) -> Result<Self, ArchiveError> {
        let mut stream = ArchiveStream::with_byte_order(source, options.byte_order);
        let header = ArchiveHeader::from_stream(&mut stream)?;
        Self::from_header(stream, header, options)
    }

    /// Prepare to read records from a stream whose header has already been read
    pub fn from_header(
        mut stream: ArchiveStream<R>,
        header: ArchiveHeader,
        options: DecodeOptions,
    ) -> Result<Self, ArchiveError> {
        if header.kind() != ArchiveKind::Datebook {
            return Err(ArchiveError::WrongArchiveType(header.signature));
        }
        if header.fields_per_row != FIELDS_PER_ENTRY {
            return Err(ArchiveError::UnexpectedFieldWidth(
                header.fields_per_row,
                FIELDS_PER_ENTRY,
            ));
        }

        // The count is of fields, not records
        let field_count = stream.read_u32()?;
        if field_count % FIELDS_PER_ENTRY != 0 {
            tracing::warn!(
                field_count,
                fields_per_entry = FIELDS_PER_ENTRY,
                "datebook entry count is not a multiple of the field width"
            );
        }
        let expected = field_count / FIELDS_PER_ENTRY;
        if expected > MAX_ENTRIES {
            return Err(ArchiveError::UnreasonableEntryCount(expected));
        }

        Ok(Self {
            stream,
            header,
            options,
            remaining: expected,
            summary: DecodeSummary {
                expected,
                ..DecodeSummary::default()
            },
            reported: false,
        })
    }

    pub fn header(&self) -> &ArchiveHeader {
        &self.header
    }

    /// Counts of the records attempted so far
    pub fn summary(&self) -> &DecodeSummary {
        &self.summary
    }

    /// Number of bytes consumed from the archive so far
    pub fn position(&self) -> u64 {
        self.stream.position()
    }
}

impl<R: Read> Iterator for DatebookReader<R> {
    type Item = Result<DatebookEntry, RecordError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            if !self.reported {
                self.reported = true;
                tracing::info!(
                    expected = self.summary.expected,
                    processed = self.summary.processed,
                    deleted = self.summary.deleted,
                    discarded = self.summary.discarded,
                    aborted = self.summary.aborted,
                    "finished reading datebook"
                );
            }
            return None;
        }
        self.remaining -= 1;

        let result = read_record(&mut self.stream, &self.options);
        match &result {
            Ok(DatebookEntry::Appointment(_)) => self.summary.processed += 1,
            Ok(DatebookEntry::Tombstone { record_id }) => {
                tracing::debug!(record_id, "skipping deleted record");
                self.summary.deleted += 1;
            }
            Err(why) if why.is_fatal() => {
                tracing::error!(record_id = why.record_id(), "{why}; aborting archive");
                self.summary.aborted = true;
                self.remaining = 0;
            }
            Err(why) => {
                tracing::warn!(record_id = why.record_id(), "{why}; record discarded");
                self.summary.discarded += 1;
            }
        }
        Some(result)
    }
}
