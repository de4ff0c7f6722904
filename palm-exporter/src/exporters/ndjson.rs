use std::io::Write;

use chrono::SecondsFormat;
use json::{object, JsonValue};

use palm_archive::{
    datebook::{
        models::Appointment,
        repeat::{Pattern, RepeatRule},
    },
    util::dates::get_utc_time,
};

use crate::{
    app::{
        error::RuntimeError,
        runtime::{Config, Output},
    },
    exporters::exporter::{Exporter, Source, Writer},
};

pub struct NDJSON<'a> {
    /// Data that is setup from the application's runtime
    pub config: &'a Config,
    /// Handle to the file we want to write appointments to
    pub file: Output,
}

impl<'a> Exporter<'a> for NDJSON<'a> {
    fn new(config: &'a Config) -> Result<Self, RuntimeError> {
        Ok(NDJSON {
            config,
            file: config.create_output()?,
        })
    }

    fn config(&self) -> &'a Config {
        self.config
    }

    fn get_or_create_file(&mut self) -> &mut Output {
        &mut self.file
    }

    fn export_appointment(
        &mut self,
        appointment: &Appointment,
        source: &Source,
    ) -> Result<(), RuntimeError> {
        let json_appointment = self.format_appointment(appointment, source);
        NDJSON::write_to_file(self.get_or_create_file(), json_appointment)
    }
}

impl<'a> Writer<'a, JsonValue> for NDJSON<'a> {
    fn format_appointment(&self, appointment: &Appointment, source: &Source) -> JsonValue {
        let repetitions = appointment
            .repetitions
            .iter()
            .map(|start| get_time(*start))
            .collect();

        object! {
            archive: source.archive,
            index: source.index,
            record_id: appointment.record_id,
            start: get_time(appointment.start_time),
            end: get_time(appointment.end_time),
            all_day: appointment.all_day,
            private: appointment.private,
            category: source.header.category(appointment.category),
            summary: get_text(appointment.summary.as_deref()),
            description: get_text(appointment.description.as_deref()),
            repeat: appointment.repeat.as_ref().map_or(JsonValue::Null, |rule| self.format_rule(rule)),
            repetitions: JsonValue::Array(repetitions),
        }
    }

    fn write_to_file(file: &mut Output, text: JsonValue) -> Result<(), RuntimeError> {
        file.write_all((text.dump() + "\n").as_bytes())
            .map_err(RuntimeError::DiskError)
    }
}

impl NDJSON<'_> {
    /// Describe the rule the repetitions were generated from
    fn format_rule(&self, rule: &RepeatRule) -> JsonValue {
        let exceptions = rule.exceptions.iter().map(|time| get_time(*time)).collect();

        let mut json_rule = object! {
            kind: rule.pattern.name(),
            brand: rule.pattern.brand(),
            interval: rule.interval,
            end_date: get_time(rule.end_date),
            week_start: rule.week_start,
            exceptions: JsonValue::Array(exceptions),
        };

        match rule.pattern {
            Pattern::Daily { day_index } | Pattern::AnnualByDay { day_index } => {
                json_rule["day_index"] = day_index.into();
            }
            Pattern::WeeklyByDay {
                day_index,
                day_mask,
            } => {
                json_rule["day_index"] = day_index.into();
                json_rule["day_mask"] = day_mask.into();
            }
            Pattern::MonthlyByDay {
                day_index,
                week_index,
            } => {
                json_rule["day_index"] = day_index.into();
                json_rule["week_index"] = week_index.into();
            }
            Pattern::MonthlyByDate { day_number } => {
                json_rule["day_number"] = day_number.into();
            }
            Pattern::AnnualByDate {
                day_number,
                month_index,
            } => {
                json_rule["day_number"] = day_number.into();
                json_rule["month_index"] = month_index.into();
            }
        }

        json_rule
    }
}

/// RFC 3339 form of epoch seconds, in UTC
fn get_time(timestamp: i64) -> JsonValue {
    get_utc_time(timestamp).map_or(JsonValue::Null, |date| {
        date.to_rfc3339_opts(SecondsFormat::Secs, true).into()
    })
}

fn get_text(text: Option<&str>) -> JsonValue {
    text.map_or(JsonValue::Null, JsonValue::from)
}
