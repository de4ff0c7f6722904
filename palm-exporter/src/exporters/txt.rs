use std::io::Write;

use palm_archive::{datebook::models::Appointment, util::dates::format};

use crate::{
    app::{
        error::RuntimeError,
        runtime::{Config, Output},
    },
    exporters::exporter::{Exporter, Source, Writer},
};

/// Prefix for repetitions, which have no record number of their own
const REPETITION_PREFIX: &str = "  -- : ";

pub struct TXT<'a> {
    /// Data that is setup from the application's runtime
    pub config: &'a Config,
    /// Handle to the file we want to write appointments to
    pub file: Output,
}

impl<'a> Exporter<'a> for TXT<'a> {
    fn new(config: &'a Config) -> Result<Self, RuntimeError> {
        Ok(TXT {
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
        let summary = self.format_appointment(appointment, source);
        TXT::write_to_file(self.get_or_create_file(), summary)
    }
}

impl<'a> Writer<'a, String> for TXT<'a> {
    fn format_appointment(&self, appointment: &Appointment, source: &Source) -> String {
        let text = appointment.text();
        let mut formatted = String::new();

        for (position, (start, end)) in appointment.occurrences().enumerate() {
            let number = (position == 0).then_some(source.index);
            // All-day appointments have no meaningful end
            let end = (!appointment.all_day).then_some(end);
            formatted.push_str(&self.format_occurrence(number, start, end, text));
        }

        formatted
    }

    fn write_to_file(file: &mut Output, text: String) -> Result<(), RuntimeError> {
        file.write_all(text.as_bytes())
            .map_err(RuntimeError::DiskError)
    }
}

impl TXT<'_> {
    /// Produce the single summary line for one occurrence
    fn format_occurrence(
        &self,
        number: Option<u32>,
        start: i64,
        end: Option<i64>,
        text: Option<&str>,
    ) -> String {
        let mut line = match number {
            Some(number) => format!("{number:>5}: "),
            None => REPETITION_PREFIX.to_string(),
        };

        line.push_str(&format(start, "%Y/%m/%d"));

        if let Some(end) = end {
            line.push_str(&format(start, " %H:%M:%SZ"));

            // Only show the end date if it falls on a different day
            if format(end, "%Y%m%d") != format(start, "%Y%m%d") {
                line.push_str(&format(end, "-%Y/%m/%d "));
            }

            if end != start {
                line.push_str(&format(end, " %H:%M:%SZ"));
            }
        }

        if let Some(text) = text {
            line.push(' ');
            line.push_str(text);
        }

        line.push('\n');
        line
    }
}
