use std::{io::Write, path::Path};

use palm_archive::{
    archive::header::ArchiveHeader,
    datebook::{
        models::{Appointment, DatebookEntry},
        reader::DecodeSummary,
    },
};

use crate::app::{
    error::RuntimeError,
    progress::build_progress_bar_export,
    runtime::{Config, Output},
};

/// Where an appointment was found
pub struct Source<'b> {
    /// File name of the archive
    pub archive: &'b str,
    /// One-based slot of the record in the archive; deleted and discarded records keep their slots
    pub index: u32,
    /// Header of the archive, used to resolve category names
    pub header: &'b ArchiveHeader,
}

/// Defines behavior for iterating over the records of each archive and writing them to the export
pub trait Exporter<'a> {
    /// Create a new exporter with a reference to the runtime configuration
    fn new(config: &'a Config) -> Result<Self, RuntimeError>
    where
        Self: Sized;
    fn config(&self) -> &'a Config;
    /// Get the handle to write to
    fn get_or_create_file(&mut self) -> &mut Output;
    /// Write one appointment and all of its repetitions
    fn export_appointment(
        &mut self,
        appointment: &Appointment,
        source: &Source,
    ) -> Result<(), RuntimeError>;

    /// Write whatever precedes the appointments of an archive
    fn begin_archive(&mut self, _header: &ArchiveHeader) -> Result<(), RuntimeError> {
        Ok(())
    }

    /// Write whatever follows the appointments of an archive
    fn end_archive(&mut self) -> Result<(), RuntimeError> {
        Ok(())
    }

    /// Export the appointments of a single archive
    fn export_archive(&mut self, path: &Path) -> Result<DecodeSummary, RuntimeError> {
        let config = self.config();
        let mut reader = config.open_archive(path)?;
        let header = reader.header().clone();
        let archive = path
            .file_name()
            .unwrap_or(path.as_os_str())
            .to_string_lossy();

        let pb = build_progress_bar_export(
            reader.summary().expected as u64,
            config.options.writes_to_file(),
        );

        self.begin_archive(&header)?;
        let mut index = 0;
        for entry in reader.by_ref() {
            index += 1;
            // Failed records were already reported by the reader
            if let Ok(DatebookEntry::Appointment(appointment)) = entry {
                let source = Source {
                    archive: &archive,
                    index,
                    header: &header,
                };
                self.export_appointment(&appointment, &source)?;
            }
            pb.set_position(index as u64);
        }
        pb.finish();
        self.end_archive()?;

        Ok(*reader.summary())
    }

    /// Export every archive named in the options, continuing past archives that cannot be read
    fn iter_archives(&mut self) -> Result<(), RuntimeError> {
        let config = self.config();
        // Tell the user what we are doing
        eprintln!(
            "Exporting to {} as {}...",
            config.destination(),
            config.options.export_type
        );

        let total = config.options.archive_paths.len();
        let mut failed = 0;
        for path in &config.options.archive_paths {
            match self.export_archive(path) {
                Ok(summary) if summary.aborted => {
                    eprintln!("{} was only partially exported: {summary}", path.display());
                    failed += 1;
                }
                Ok(_) => {}
                // Nothing else can be written once the export itself fails
                Err(RuntimeError::DiskError(why)) => return Err(RuntimeError::DiskError(why)),
                Err(why) => {
                    eprintln!("Unable to export {}: {why}", path.display());
                    failed += 1;
                }
            }
        }

        self.get_or_create_file()
            .flush()
            .map_err(RuntimeError::DiskError)?;

        if failed > 0 {
            return Err(RuntimeError::IncompleteExport(failed, total));
        }
        Ok(())
    }
}

/// Defines behavior for formatting appointments to the desired output format
pub(super) trait Writer<'a, T> {
    /// Format an appointment, including its repetitions
    fn format_appointment(&self, appointment: &Appointment, source: &Source) -> T;
    fn write_to_file(file: &mut Output, text: T) -> Result<(), RuntimeError>;
}
