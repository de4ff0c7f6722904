use std::{
    fs::File,
    io::{stdout, BufReader, BufWriter, Write},
    path::Path,
};

use palm_archive::datebook::reader::DatebookReader;

use crate::{
    app::{error::RuntimeError, options::ExportType, options::Options},
    exporters::{exporter::Exporter, ics::ICS, ndjson::NDJSON, txt::TXT},
};

/// Buffered destination every exporter writes to
pub type Output = BufWriter<Box<dyn Write>>;

/// Stores the application state and handles application lifecycle
pub struct Config {
    /// App configuration options
    pub options: Options,
}

impl Config {
    pub fn new(options: Options) -> Config {
        Config { options }
    }

    /// Open the export destination, truncating any existing file
    pub fn create_output(&self) -> Result<Output, RuntimeError> {
        let sink: Box<dyn Write> = match &self.options.export_path {
            Some(path) => Box::new(
                File::create(path).map_err(|err| RuntimeError::CreateError(err, path.clone()))?,
            ),
            None => Box::new(stdout()),
        };
        Ok(BufWriter::new(sink))
    }

    /// Describe where the export is going, for status messages
    pub fn destination(&self) -> String {
        match &self.options.export_path {
            Some(path) => path.display().to_string(),
            None => "standard output".to_string(),
        }
    }

    /// Open an archive and read its header, ready to iterate its records
    pub fn open_archive(
        &self,
        path: &Path,
    ) -> Result<DatebookReader<BufReader<File>>, RuntimeError> {
        let file = File::open(path).map_err(|err| RuntimeError::CreateError(err, path.to_path_buf()))?;
        DatebookReader::new(BufReader::new(file), self.options.decode_options)
            .map_err(|why| RuntimeError::ArchiveError(why, path.to_path_buf()))
    }

    /// Handles exporting data to a specific format
    pub fn start(&self) -> Result<(), RuntimeError> {
        match self.options.export_type {
            ExportType::Txt => TXT::new(self)?.iter_archives(),
            ExportType::Ics => ICS::new(self)?.iter_archives(),
            ExportType::Ndjson => NDJSON::new(self)?.iter_archives(),
        }
    }
}
