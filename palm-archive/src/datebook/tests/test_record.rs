#[cfg(test)]
mod record_tests {
    use crate::{
        datebook::{
            models::{Appointment, DatebookEntry},
            options::DecodeOptions,
            record::read_record,
            repeat::Pattern,
            tests::fixtures::{
                class_entry, fields, first_fields, no_repeat, plain_record, rule, Fields, DAY,
                SUNDAY,
            },
        },
        error::{record::RecordError, stream::StreamError},
        util::{archive_writer::ArchiveWriter, stream::ArchiveStream},
    };

    fn decode(bytes: &[u8]) -> (Result<DatebookEntry, RecordError>, u64) {
        let mut stream = ArchiveStream::new(bytes);
        let result = read_record(&mut stream, &DecodeOptions::default());
        (result, stream.position())
    }

    fn appointment(result: Result<DatebookEntry, RecordError>) -> Appointment {
        match result.unwrap() {
            DatebookEntry::Appointment(appointment) => appointment,
            other => panic!("expected an appointment, got {other:?}"),
        }
    }

    #[test]
    fn can_decode_plain_record() {
        let values = Fields {
            record_id: 42,
            note: Some(b"Bring slides"),
            private: 1,
            category: 3,
            ..Fields::default()
        };
        let bytes = plain_record(ArchiveWriter::new(), &values).finish();

        let (result, position) = decode(&bytes);
        let appointment = appointment(result);

        assert_eq!(appointment.record_id, 42);
        assert_eq!(appointment.start_time, SUNDAY as i64);
        assert_eq!(appointment.end_time, SUNDAY as i64 + 3600);
        assert_eq!(appointment.summary.as_deref(), Some("Staff meeting"));
        assert_eq!(appointment.description.as_deref(), Some("Bring slides"));
        assert!(appointment.private);
        assert!(!appointment.all_day);
        assert_eq!(appointment.category, 3);
        assert!(appointment.repeat.is_none());
        assert!(appointment.repetitions.is_empty());
        assert_eq!(position, bytes.len() as u64);
    }

    #[test]
    fn can_decode_exact_byte_count() {
        // Fourteen tagged words (padding included for text), two strings, the repeat tag, and an empty repeat block
        let values = Fields {
            description: Some(b"abc"),
            note: None,
            ..Fields::default()
        };
        let bytes = plain_record(ArchiveWriter::new(), &values).finish();
        let expected = 14 * 8 + (1 + 3) + 1 + 4 + (2 + 2);

        let (result, position) = decode(&bytes);

        assert!(result.is_ok());
        assert_eq!(bytes.len(), expected);
        assert_eq!(position, expected as u64);
    }

    #[test]
    fn can_decode_all_day() {
        let values = Fields {
            untimed: 1,
            ..Fields::default()
        };
        let bytes = plain_record(ArchiveWriter::new(), &values).finish();

        assert!(appointment(decode(&bytes).0).all_day);
    }

    #[test]
    fn can_use_duration_when_end_equals_start() {
        let values = Fields {
            end: SUNDAY,
            duration: 3600,
            ..Fields::default()
        };
        let bytes = plain_record(ArchiveWriter::new(), &values).finish();

        assert_eq!(appointment(decode(&bytes).0).end_time, SUNDAY as i64 + 3600);
    }

    #[test]
    fn doesnt_use_duration_when_end_differs() {
        let values = Fields {
            end: SUNDAY + 60,
            duration: 3600,
            ..Fields::default()
        };
        let bytes = plain_record(ArchiveWriter::new(), &values).finish();

        assert_eq!(appointment(decode(&bytes).0).end_time, SUNDAY as i64 + 60);
    }

    #[test]
    fn can_sanitize_text_fields() {
        let values = Fields {
            description: Some(b"Call\r\nBob  "),
            note: Some(b"line one\nline two\n"),
            ..Fields::default()
        };
        let bytes = plain_record(ArchiveWriter::new(), &values).finish();

        let appointment = appointment(decode(&bytes).0);

        assert_eq!(appointment.summary.as_deref(), Some("Call  Bob"));
        assert_eq!(appointment.description.as_deref(), Some("line one line two"));
    }

    #[test]
    fn can_decode_absent_text() {
        let values = Fields {
            description: None,
            ..Fields::default()
        };
        let bytes = plain_record(ArchiveWriter::new(), &values).finish();

        assert_eq!(appointment(decode(&bytes).0).summary, None);
    }

    #[test]
    fn can_consume_tombstone() {
        let live = Fields::default();
        let deleted = Fields {
            status: 0x04,
            ..Fields::default()
        };
        let live_bytes = plain_record(ArchiveWriter::new(), &live).finish();
        let deleted_bytes = plain_record(ArchiveWriter::new(), &deleted).finish();

        let (result, position) = decode(&deleted_bytes);

        assert_eq!(result, Ok(DatebookEntry::Tombstone { record_id: 1 }));
        assert_eq!(position, decode(&live_bytes).1);
    }

    #[test]
    fn can_consume_tombstone_with_repeat_rule() {
        let deleted = Fields {
            status: 0x04,
            ..Fields::default()
        };
        let bytes = rule(fields(ArchiveWriter::new(), &deleted), &[], 1, SUNDAY + 7 * DAY, |w| {
            w.u32(0)
        })
        .finish();

        let (result, position) = decode(&bytes);

        assert_eq!(result, Ok(DatebookEntry::Tombstone { record_id: 1 }));
        assert_eq!(position, bytes.len() as u64);
    }

    #[test]
    fn can_expand_weekly_rule() {
        // Mondays only, through two weeks after a Sunday start
        let bytes = rule(
            fields(ArchiveWriter::new(), &Fields::default()),
            &[],
            2,
            SUNDAY + 14 * DAY,
            |w| w.u32(0).u8(0b0000_0010),
        )
        .finish();

        let (result, position) = decode(&bytes);
        let appointment = appointment(result);

        assert_eq!(
            appointment.repetitions,
            vec![(SUNDAY + DAY) as i64, (SUNDAY + 8 * DAY) as i64]
        );
        assert!(matches!(
            appointment.repeat.map(|rule| rule.pattern),
            Some(Pattern::WeeklyByDay {
                day_index: 0,
                day_mask: 0b0000_0010
            })
        ));
        assert_eq!(position, bytes.len() as u64);
    }

    #[test]
    fn can_apply_exceptions_from_stream() {
        let bytes = rule(
            fields(ArchiveWriter::new(), &Fields::default()),
            &[SUNDAY + 2 * DAY],
            1,
            SUNDAY + 3 * DAY,
            |w| w.u32(0),
        )
        .finish();

        let appointment = appointment(decode(&bytes).0);

        assert_eq!(
            appointment.repetitions,
            vec![(SUNDAY + DAY) as i64, (SUNDAY + 3 * DAY) as i64]
        );
        assert_eq!(
            appointment.repeat.unwrap().exceptions,
            vec![(SUNDAY + 2 * DAY) as i64]
        );
    }

    #[test]
    fn can_consume_parameters_of_every_brand() {
        let cases: [(u32, usize, fn(ArchiveWriter) -> ArchiveWriter); 6] = [
            (1, 4, |w| w.u32(0)),
            (2, 5, |w| w.u32(0).u8(0x7F)),
            (3, 8, |w| w.u32(1).u32(1)),
            (4, 4, |w| w.u32(4)),
            (5, 8, |w| w.u32(4).u32(0)),
            (6, 4, |w| w.u32(1)),
        ];

        for (brand, parameter_bytes, params) in cases {
            let head = fields(ArchiveWriter::new(), &Fields::default());
            let before_block = head.len();
            let bytes = rule(head, &[], brand, SUNDAY + 40 * DAY, params).finish();

            let (result, position) = decode(&bytes);

            // Exception count, flag, then four rule words
            assert_eq!(bytes.len(), before_block + 2 + 2 + 16 + parameter_bytes);
            assert_eq!(position, bytes.len() as u64, "brand {brand}");
            assert_eq!(
                appointment(result).repeat.map(|rule| rule.pattern.brand()),
                Some(brand)
            );
        }
    }

    #[test]
    fn can_skip_class_entry() {
        let bytes = class_entry(
            fields(ArchiveWriter::new(), &Fields::default()),
            1,
            b"CDayName",
        )
        .finish();

        let (result, position) = decode(&bytes);
        let appointment = appointment(result);

        assert!(appointment.repeat.is_none());
        assert!(appointment.repetitions.is_empty());
        assert_eq!(position, bytes.len() as u64);
    }

    #[test]
    fn cant_decode_bad_class_tag() {
        let bytes = class_entry(
            fields(ArchiveWriter::new(), &Fields::default()),
            2,
            b"CDayName",
        )
        .finish();

        assert_eq!(
            decode(&bytes).0,
            Err(RecordError::TypeTagMismatch {
                record_id: 1,
                field: "repeat class",
                position: 15,
                expected: 1,
                actual: 2,
            })
        );
    }

    #[test]
    fn cant_decode_unsupported_brand() {
        let bytes = rule(
            fields(ArchiveWriter::new(), &Fields::default()),
            &[],
            7,
            SUNDAY + DAY,
            |w| w,
        )
        .finish();

        let error = decode(&bytes).0.unwrap_err();

        assert_eq!(
            error,
            RecordError::UnsupportedBrand {
                record_id: 1,
                brand: 7
            }
        );
        assert!(error.is_fatal());
    }

    #[test]
    fn cant_decode_brand_zero() {
        let bytes = rule(
            fields(ArchiveWriter::new(), &Fields::default()),
            &[],
            0,
            SUNDAY + DAY,
            |w| w,
        )
        .finish();

        assert!(decode(&bytes).0.unwrap_err().is_fatal());
    }

    #[test]
    fn cant_decode_wrong_tag_at_field_nine() {
        let bytes = first_fields(ArchiveWriter::new(), &Fields::default())
            .field(1, 0)
            .finish();

        let error = decode(&bytes).0.unwrap_err();

        assert_eq!(
            error,
            RecordError::TypeTagMismatch {
                record_id: 1,
                field: "untimed",
                position: 9,
                expected: 6,
                actual: 1,
            }
        );
        assert!(!error.is_fatal());
        assert_eq!(
            error.to_string(),
            "record 1, field 9 (untimed), type 1 != 6"
        );
    }

    #[test]
    fn can_resume_at_contiguous_boundary_after_mismatch() {
        // The malformed record ends with its bad tag, so nothing of it is left unread
        let second = Fields {
            record_id: 2,
            ..Fields::default()
        };
        let bytes = plain_record(
            first_fields(ArchiveWriter::new(), &Fields::default()).u32(5),
            &second,
        )
        .finish();
        let mut stream = ArchiveStream::new(&bytes[..]);
        let options = DecodeOptions::default();

        let first = read_record(&mut stream, &options);
        let next = read_record(&mut stream, &options);

        assert!(matches!(
            first,
            Err(RecordError::TypeTagMismatch {
                position: 9,
                expected: 6,
                actual: 5,
                ..
            })
        ));
        assert_eq!(appointment(next).record_id, 2);
        assert_eq!(stream.position(), bytes.len() as u64);
    }

    #[test]
    fn cant_decode_record_id_tag() {
        let bytes = ArchiveWriter::new().field(3, 9).finish();

        assert_eq!(
            decode(&bytes),
            (
                Err(RecordError::TypeTagMismatch {
                    record_id: 0,
                    field: "record ID",
                    position: 1,
                    expected: 1,
                    actual: 3,
                }),
                4
            )
        );
    }

    #[test]
    fn cant_decode_truncated_record() {
        let bytes = plain_record(ArchiveWriter::new(), &Fields::default()).finish();

        let (result, _) = decode(&bytes[..bytes.len() - 1]);

        assert!(matches!(
            result,
            Err(RecordError::Truncated {
                record_id: 1,
                source: StreamError::Truncated(_, 2)
            })
        ));
    }

    #[test]
    fn can_limit_repetitions() {
        let bytes = rule(
            fields(ArchiveWriter::new(), &Fields::default()),
            &[],
            1,
            SUNDAY + 365 * DAY,
            |w| w.u32(0),
        )
        .finish();
        let options = DecodeOptions {
            max_repetitions: Some(3),
            ..DecodeOptions::default()
        };

        let result = read_record(&mut ArchiveStream::new(&bytes[..]), &options);

        assert_eq!(appointment(result).repetitions.len(), 3);
    }

    #[test]
    fn can_ignore_exceptions_without_rule() {
        let bytes = no_repeat(
            fields(ArchiveWriter::new(), &Fields::default()),
            &[SUNDAY, SUNDAY + DAY],
        )
        .finish();

        let (result, position) = decode(&bytes);

        assert!(appointment(result).repeat.is_none());
        assert_eq!(position, bytes.len() as u64);
    }
}
