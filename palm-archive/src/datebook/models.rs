/*!
 Data structures produced by decoding Datebook records.
*/

use crate::datebook::repeat::RepeatRule;

/// A calendar appointment decoded from a Datebook record
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Appointment {
    /// Record id from the archive, kept for diagnostics
    pub record_id: u32,
    /// Start of the first occurrence, in seconds since the Unix epoch
    pub start_time: i64,
    /// End of the first occurrence, in seconds since the Unix epoch
    pub end_time: i64,
    /// Short description shown in calendar views
    pub summary: Option<String>,
    /// Attached note
    pub description: Option<String>,
    pub private: bool,
    /// The appointment has no time of day; `end_time` carries no clock-time meaning
    pub all_day: bool,
    /// Index into the archive's category table
    pub category: u32,
    /// The repeat rule the repetitions were generated from, if any
    pub repeat: Option<RepeatRule>,
    /// Start times of every generated occurrence after the first, in ascending order
    pub repetitions: Vec<i64>,
}

impl Appointment {
    /// Add another occurrence of this appointment
    pub fn add(&mut self, start_time: i64) {
        self.repetitions.push(start_time);
    }

    /// Length of the first occurrence, in seconds
    pub fn duration(&self) -> i64 {
        self.end_time - self.start_time
    }

    /// Get the text that best describes this appointment: the summary, or failing that, the description
    pub fn text(&self) -> Option<&str> {
        self.summary.as_deref().or(self.description.as_deref())
    }

    /// Every occurrence as `(start, end)`, starting with the original.
    ///
    /// Repetitions reuse the original occurrence's duration.
    pub fn occurrences(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        let duration = self.duration();
        std::iter::once((self.start_time, self.end_time)).chain(
            self.repetitions
                .iter()
                .map(move |start| (*start, start + duration)),
        )
    }
}

/// The outcome of decoding one Datebook record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatebookEntry {
    /// A live appointment
    Appointment(Appointment),
    /// A record marked as deleted; its bytes were consumed but it carries no data
    Tombstone { record_id: u32 },
}

impl DatebookEntry {
    pub fn record_id(&self) -> u32 {
        match self {
            DatebookEntry::Appointment(appointment) => appointment.record_id,
            DatebookEntry::Tombstone { record_id } => *record_id,
        }
    }
}
