use std::io::Write;

use sha1::{Digest, Sha1};

use palm_archive::{
    archive::header::ArchiveHeader,
    datebook::models::Appointment,
    util::dates::{format, DAY_SECONDS},
};

use crate::{
    app::{
        error::RuntimeError,
        runtime::{Config, Output},
        sanitizers::{fold_ics_line, sanitize_ics_text},
    },
    exporters::exporter::{Exporter, Source, Writer},
};

/// Product identifier written into every calendar
const PRODUCT_ID: &str = "-//palm-exporter//Datebook//EN";
/// Domain suffix for generated event identifiers
const UID_DOMAIN: &str = "palm-exporter";

pub struct ICS<'a> {
    /// Data that is setup from the application's runtime
    pub config: &'a Config,
    /// Handle to the file we want to write events to
    pub file: Output,
}

impl<'a> Exporter<'a> for ICS<'a> {
    fn new(config: &'a Config) -> Result<Self, RuntimeError> {
        Ok(ICS {
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
        let events = self.format_appointment(appointment, source);
        ICS::write_to_file(self.get_or_create_file(), events)
    }

    fn begin_archive(&mut self, _header: &ArchiveHeader) -> Result<(), RuntimeError> {
        let mut calendar = String::new();
        add_line(&mut calendar, "BEGIN:VCALENDAR");
        add_line(&mut calendar, "VERSION:2.0");
        add_line(&mut calendar, &format!("PRODID:{PRODUCT_ID}"));
        ICS::write_to_file(self.get_or_create_file(), calendar)
    }

    fn end_archive(&mut self) -> Result<(), RuntimeError> {
        let mut calendar = String::new();
        add_line(&mut calendar, "END:VCALENDAR");
        ICS::write_to_file(self.get_or_create_file(), calendar)
    }
}

impl<'a> Writer<'a, String> for ICS<'a> {
    fn format_appointment(&self, appointment: &Appointment, source: &Source) -> String {
        let mut formatted = String::new();
        for (start, end) in appointment.occurrences() {
            formatted.push_str(&self.format_event(appointment, source, start, end));
        }
        formatted
    }

    fn write_to_file(file: &mut Output, text: String) -> Result<(), RuntimeError> {
        file.write_all(text.as_bytes())
            .map_err(RuntimeError::DiskError)
    }
}

impl ICS<'_> {
    /// Produce a `VEVENT` for a single occurrence
    fn format_event(
        &self,
        appointment: &Appointment,
        source: &Source,
        start: i64,
        end: i64,
    ) -> String {
        let mut event = String::new();
        add_line(&mut event, "BEGIN:VEVENT");
        add_line(&mut event, &format!("UID:{}", event_uid(source, start)));

        if appointment.all_day {
            // DTEND is exclusive for dates, so the event covers through the end day
            let last = end.max(start);
            add_line(
                &mut event,
                &format(start, "DTSTART;VALUE=DATE:%Y%m%d"),
            );
            add_line(
                &mut event,
                &format(last + DAY_SECONDS, "DTEND;VALUE=DATE:%Y%m%d"),
            );
        } else {
            add_line(&mut event, &format(start, "DTSTART:%Y%m%dT%H%M%SZ"));
            add_line(&mut event, &format(end, "DTEND:%Y%m%dT%H%M%SZ"));
        }

        if let Some(summary) = &appointment.summary {
            add_line(
                &mut event,
                &format!("SUMMARY:{}", sanitize_ics_text(summary)),
            );
        }
        if let Some(description) = &appointment.description {
            add_line(
                &mut event,
                &format!("DESCRIPTION:{}", sanitize_ics_text(description)),
            );
        }
        if appointment.private {
            add_line(&mut event, "CLASS:PRIVATE");
        }
        if let Some(category) = source
            .header
            .categories
            .get(appointment.category as usize)
            .and_then(|entry| entry.long_name.as_deref())
        {
            add_line(
                &mut event,
                &format!("CATEGORIES:{}", sanitize_ics_text(category)),
            );
        }

        add_line(&mut event, "END:VEVENT");
        event
    }
}

/// A stable identifier for one occurrence, so repeated exports of the same archive agree
fn event_uid(source: &Source, start: i64) -> String {
    let mut hasher = Sha1::new();
    hasher.update(source.archive.as_bytes());
    hasher.update(source.index.to_le_bytes());
    hasher.update(start.to_le_bytes());
    format!("{:x}@{UID_DOMAIN}", hasher.finalize())
}

fn add_line(string: &mut String, line: &str) {
    string.push_str(&fold_ics_line(line));
}

#[cfg(test)]
mod tests {
    use palm_archive::datebook::models::Appointment;

    use crate::exporters::{
        exporter::{
            tests::{blank, fake_config, fake_header, DAY, SUNDAY},
            Exporter, Source, Writer,
        },
        ics::{event_uid, ICS},
    };

    fn format(appointment: &Appointment, index: u32) -> String {
        let config = fake_config();
        let exporter = ICS::new(&config).unwrap();
        let header = fake_header();
        let source = Source {
            archive: "datebook.dba",
            index,
            header: &header,
        };
        exporter.format_appointment(appointment, &source)
    }

    /// Every line but the UID, which is checked separately
    fn lines(formatted: &str) -> Vec<&str> {
        formatted
            .split("\r\n")
            .filter(|line| !line.is_empty() && !line.starts_with("UID:"))
            .collect()
    }

    #[test]
    fn can_format_timed_event() {
        let formatted = format(&blank(), 1);

        assert_eq!(
            lines(&formatted),
            vec![
                "BEGIN:VEVENT",
                "DTSTART:20040104T090000Z",
                "DTEND:20040104T100000Z",
                "SUMMARY:Staff meeting",
                "CATEGORIES:Unfiled",
                "END:VEVENT",
            ]
        );
        assert!(formatted.ends_with("\r\n"));
    }

    #[test]
    fn can_format_all_day_event() {
        let mut appointment = blank();
        appointment.all_day = true;
        appointment.end_time = SUNDAY;

        let formatted = format(&appointment, 1);

        assert!(lines(&formatted).contains(&"DTSTART;VALUE=DATE:20040104"));
        assert!(lines(&formatted).contains(&"DTEND;VALUE=DATE:20040105"));
    }

    #[test]
    fn can_format_private_escaped_event() {
        let mut appointment = blank();
        appointment.summary = Some("Lunch; Bob, Alice".to_string());
        appointment.description = Some("C:\\notes".to_string());
        appointment.private = true;
        appointment.category = 1;

        let formatted = format(&appointment, 1);

        assert_eq!(
            lines(&formatted)[3..7],
            [
                "SUMMARY:Lunch\\; Bob\\, Alice",
                "DESCRIPTION:C:\\\\notes",
                "CLASS:PRIVATE",
                "CATEGORIES:Business",
            ]
        );
    }

    #[test]
    fn can_format_event_per_occurrence() {
        let mut appointment = blank();
        appointment.add(SUNDAY + DAY);

        let formatted = format(&appointment, 1);

        assert_eq!(formatted.matches("BEGIN:VEVENT").count(), 2);
        assert!(lines(&formatted).contains(&"DTSTART:20040105T090000Z"));
        assert!(lines(&formatted).contains(&"DTEND:20040105T100000Z"));
    }

    #[test]
    fn can_generate_stable_uids() {
        let header = fake_header();
        let source = Source {
            archive: "datebook.dba",
            index: 1,
            header: &header,
        };
        let other = Source {
            archive: "datebook.dba",
            index: 2,
            header: &header,
        };

        let uid = event_uid(&source, SUNDAY);

        assert_eq!(uid, event_uid(&source, SUNDAY));
        assert_ne!(uid, event_uid(&source, SUNDAY + DAY));
        assert_ne!(uid, event_uid(&other, SUNDAY));
        assert!(uid.ends_with("@palm-exporter"));
        // 40 hex digits of SHA-1
        assert_eq!(uid.find('@'), Some(40));
    }

    #[test]
    fn can_use_uid_in_event() {
        let formatted = format(&blank(), 1);
        let header = fake_header();
        let source = Source {
            archive: "datebook.dba",
            index: 1,
            header: &header,
        };

        assert!(formatted.contains(&format!("UID:{}\r\n", event_uid(&source, SUNDAY))));
    }
}
