/*!
 Contains the repeat rule carried by the final field of a Datebook record.

 The repeat block is laid out as:

 ```txt
 u16      exception count
 u32 xN   exception timestamps
 u16      flag: 0 for no repeat, 0xFFFF for a class entry, anything else for a repeat rule
 ```

 A class entry is a `u16` tag (always `1`), a `u16` length, and that many bytes of class name.
 A repeat rule is a `u32` brand, `u32` interval, `u32` end date, and `u32` week start, followed by
 the parameters of the brand. The parameters are read in a fixed order, each only if the brand uses it:

 | Parameter         | Width | Brands                                        |
 |-------------------|-------|-----------------------------------------------|
 | day-of-week index | u32   | daily, weekly, monthly by day, annual by day  |
 | day-of-week mask  | u8    | weekly                                        |
 | week-of-month     | u32   | monthly by day                                |
 | day-of-month      | u32   | monthly by date, annual by date               |
 | month index       | u32   | annual by date                                |
*/

use std::io::Read;

use crate::{
    datebook::record::{RecordCursor, TAG_INTEGER},
    error::record::RecordError,
    util::dates::{calendar_day, DAY_SECONDS},
};

/// Flag indicating a class entry follows instead of a repeat rule
const CLASS_ENTRY: u16 = 0xFFFF;
/// Flag indicating the record does not repeat
const NO_REPEAT: u16 = 0;
/// Highest valid bit pattern for a weekly day mask
const DAY_MASK_ALL: u8 = 0x7F;

/// The recurrence kind of a repeat rule and the parameters that kind carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// Brand 1: every day
    Daily { day_index: u32 },
    /// Brand 2: every day whose bit is set in `day_mask`, bit 0 being Sunday
    WeeklyByDay { day_index: u32, day_mask: u8 },
    /// Brand 3: a given weekday in a given week of the month, e.g. the second Tuesday
    MonthlyByDay { day_index: u32, week_index: u32 },
    /// Brand 4: a given day of every month
    MonthlyByDate { day_number: u32 },
    /// Brand 5: a given day of a given month, `month_index` being zero-based
    AnnualByDate { day_number: u32, month_index: u32 },
    /// Brand 6: not supported by expansion
    AnnualByDay { day_index: u32 },
}

impl Pattern {
    /// Read the parameters of the given brand
    fn read<R: Read>(brand: u32, cursor: &mut RecordCursor<'_, R>) -> Result<Self, RecordError> {
        let pattern = match brand {
            1 => Pattern::Daily {
                day_index: cursor.u32()?,
            },
            2 => {
                let day_index = cursor.u32()?;
                let day_mask = cursor.u8()?;
                if day_mask == 0 || day_mask > DAY_MASK_ALL {
                    tracing::warn!(
                        record_id = cursor.record_id,
                        day_mask,
                        "suspicious weekly day mask"
                    );
                }
                Pattern::WeeklyByDay {
                    day_index,
                    day_mask,
                }
            }
            3 => Pattern::MonthlyByDay {
                day_index: cursor.u32()?,
                week_index: cursor.u32()?,
            },
            4 => Pattern::MonthlyByDate {
                day_number: cursor.u32()?,
            },
            5 => Pattern::AnnualByDate {
                day_number: cursor.u32()?,
                month_index: cursor.u32()?,
            },
            6 => Pattern::AnnualByDay {
                day_index: cursor.u32()?,
            },
            brand => {
                return Err(RecordError::UnsupportedBrand {
                    record_id: cursor.record_id,
                    brand,
                })
            }
        };
        Ok(pattern)
    }

    /// The brand number this pattern is stored as
    pub fn brand(&self) -> u32 {
        match self {
            Pattern::Daily { .. } => 1,
            Pattern::WeeklyByDay { .. } => 2,
            Pattern::MonthlyByDay { .. } => 3,
            Pattern::MonthlyByDate { .. } => 4,
            Pattern::AnnualByDate { .. } => 5,
            Pattern::AnnualByDay { .. } => 6,
        }
    }

    /// Human-readable name of the brand
    pub fn name(&self) -> &'static str {
        match self {
            Pattern::Daily { .. } => "daily",
            Pattern::WeeklyByDay { .. } => "weekly by day",
            Pattern::MonthlyByDay { .. } => "monthly by day",
            Pattern::MonthlyByDate { .. } => "monthly by date",
            Pattern::AnnualByDate { .. } => "annual by date",
            Pattern::AnnualByDay { .. } => "annual by day",
        }
    }

    /// Whether the UTC calendar day containing `timestamp` fits this pattern
    pub fn matches(&self, timestamp: i64) -> bool {
        let Some(day) = calendar_day(timestamp) else {
            return false;
        };
        match *self {
            Pattern::Daily { .. } => true,
            Pattern::WeeklyByDay { day_mask, .. } => day_mask & (1 << day.weekday) != 0,
            Pattern::MonthlyByDay {
                day_index,
                week_index,
            } => {
                let week = week_index as i64;
                let mday = day.day as i64;
                day.weekday as i64 == day_index as i64 - 1
                    && mday > (week - 1) * 7
                    && mday <= week * 7
            }
            Pattern::MonthlyByDate { day_number } => day.day == day_number,
            Pattern::AnnualByDate {
                day_number,
                month_index,
            } => day.month0 == month_index && day.day == day_number,
            Pattern::AnnualByDay { .. } => false,
        }
    }
}

/// Describes how an appointment repeats
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepeatRule {
    pub pattern: Pattern,
    /// Stored but not applied
    pub interval: u32,
    /// Last moment an occurrence may start, inclusive, in seconds since the Unix epoch
    pub end_date: i64,
    /// Stored but not applied; its effect on weekly rules is not known
    pub week_start: u32,
    /// Each exception suppresses any occurrence in the 24 hours starting at it
    pub exceptions: Vec<i64>,
}

impl RepeatRule {
    /// Whether `timestamp` falls inside one of this rule's exception windows
    pub fn is_exception(&self, timestamp: i64) -> bool {
        self.exceptions
            .iter()
            .any(|exception| *exception <= timestamp && timestamp < exception + DAY_SECONDS)
    }

    /// Read the repeat block that follows the repeat field's tag.
    ///
    /// Exceptions read for a record that does not repeat are discarded with the block.
    pub(crate) fn read_block<R: Read>(
        cursor: &mut RecordCursor<'_, R>,
    ) -> Result<Option<Self>, RecordError> {
        let exception_count = cursor.u16()?;
        let mut exceptions = Vec::with_capacity(exception_count as usize);
        for _ in 0..exception_count {
            exceptions.push(cursor.u32()? as i64);
        }

        match cursor.u16()? {
            NO_REPEAT => Ok(None),
            CLASS_ENTRY => {
                let tag = cursor.u16()?;
                cursor.check(15, "repeat class", TAG_INTEGER, tag as u32)?;
                let length = cursor.u16()?;
                // Class name
                cursor.bytes(length as usize)?;
                Ok(None)
            }
            _ => {
                let brand = cursor.u32()?;
                let interval = cursor.u32()?;
                let end_date = cursor.u32()? as i64;
                let week_start = cursor.u32()?;
                let pattern = Pattern::read(brand, cursor)?;

                Ok(Some(Self {
                    pattern,
                    interval,
                    end_date,
                    week_start,
                    exceptions,
                }))
            }
        }
    }
}
