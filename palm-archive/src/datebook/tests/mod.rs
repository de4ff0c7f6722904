#[cfg(test)]
mod test_record;

#[cfg(test)]
pub(super) mod fixtures {
    use crate::{
        archive::models::DATEBOOK_SIGNATURE,
        datebook::record::{TAG_BOOLEAN, TAG_DATE, TAG_INTEGER, TAG_REPEAT, TAG_TEXT},
        util::archive_writer::ArchiveWriter,
    };

    // Sunday, January 4, 2004 09:00:00 UTC
    pub(crate) const SUNDAY: u32 = 1073206800;
    pub(crate) const DAY: u32 = 86400;

    /// Values for the first fourteen fields of a record
    #[derive(Debug, Clone)]
    pub(crate) struct Fields {
        pub(crate) record_id: u32,
        pub(crate) status: u32,
        pub(crate) start: u32,
        pub(crate) end: u32,
        pub(crate) description: Option<&'static [u8]>,
        pub(crate) duration: u32,
        pub(crate) note: Option<&'static [u8]>,
        pub(crate) untimed: u32,
        pub(crate) private: u32,
        pub(crate) category: u32,
    }

    impl Default for Fields {
        fn default() -> Self {
            Self {
                record_id: 1,
                status: 0,
                start: SUNDAY,
                end: SUNDAY + 3600,
                description: Some(b"Staff meeting"),
                duration: 0,
                note: None,
                untimed: 0,
                private: 0,
                category: 0,
            }
        }
    }

    /// Write the header of a Datebook archive, followed by its field count
    pub(crate) fn datebook_preamble(
        signature: u32,
        fields_per_row: u32,
        field_count: u32,
    ) -> ArchiveWriter {
        ArchiveWriter::new()
            .u32(signature)
            .string(Some(b"datebook.dat"))
            .string(Some(b"Datebook"))
            .u32(1)
            .u32(1)
            .u32(0)
            .u32(0)
            .u32(0)
            .string(Some(b"Unfiled"))
            .string(Some(b"Unf"))
            .u32(0x36)
            .u32(fields_per_row)
            .u32(0)
            .u32(1)
            .u32(2)
            .u16(0)
            .u32(field_count)
    }

    /// A Datebook preamble declaring `records` records
    pub(crate) fn datebook(records: u32) -> ArchiveWriter {
        datebook_preamble(DATEBOOK_SIGNATURE, 15, records * 15)
    }

    /// Write fields 1 through 8, stopping before the tag of field 9
    pub(crate) fn first_fields(writer: ArchiveWriter, fields: &Fields) -> ArchiveWriter {
        writer
            .field(TAG_INTEGER, fields.record_id)
            .field(TAG_INTEGER, fields.status)
            .field(TAG_INTEGER, 0)
            .field(TAG_DATE, fields.start)
            .field(TAG_INTEGER, fields.end)
            .text_field(TAG_TEXT, fields.description)
            .field(TAG_INTEGER, fields.duration)
            .text_field(TAG_TEXT, fields.note)
    }

    /// Write fields 1 through 14 and the tag of the repeat field
    pub(crate) fn fields(writer: ArchiveWriter, fields: &Fields) -> ArchiveWriter {
        first_fields(writer, fields)
            .field(TAG_BOOLEAN, fields.untimed)
            .field(TAG_BOOLEAN, fields.private)
            .field(TAG_INTEGER, fields.category)
            .field(TAG_BOOLEAN, 0)
            .field(TAG_INTEGER, 5)
            .field(TAG_INTEGER, 0)
            .u32(TAG_REPEAT)
    }

    fn exceptions(mut writer: ArchiveWriter, exceptions: &[u32]) -> ArchiveWriter {
        writer = writer.u16(exceptions.len() as u16);
        for exception in exceptions {
            writer = writer.u32(*exception);
        }
        writer
    }

    /// A repeat block that carries no rule
    pub(crate) fn no_repeat(writer: ArchiveWriter, excepted: &[u32]) -> ArchiveWriter {
        exceptions(writer, excepted).u16(0)
    }

    /// A repeat block holding a class entry
    pub(crate) fn class_entry(writer: ArchiveWriter, tag: u16, name: &[u8]) -> ArchiveWriter {
        exceptions(writer, &[])
            .u16(0xFFFF)
            .u16(tag)
            .u16(name.len() as u16)
            .raw(name)
    }

    /// A repeat block holding a rule; `params` writes the brand's parameters
    pub(crate) fn rule(
        writer: ArchiveWriter,
        excepted: &[u32],
        brand: u32,
        end_date: u32,
        params: impl FnOnce(ArchiveWriter) -> ArchiveWriter,
    ) -> ArchiveWriter {
        let writer = exceptions(writer, excepted)
            .u16(0x8001)
            .u32(brand)
            .u32(1)
            .u32(end_date)
            .u32(0);
        params(writer)
    }

    /// A complete record with no repeat rule
    pub(crate) fn plain_record(writer: ArchiveWriter, values: &Fields) -> ArchiveWriter {
        no_repeat(fields(writer, values), &[])
    }
}
