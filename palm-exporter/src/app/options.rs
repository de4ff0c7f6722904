use std::{fmt::Display, path::PathBuf};

use clap::{crate_version, Arg, ArgAction, ArgMatches, Command};
use tracing::Level;

use palm_archive::{datebook::options::DecodeOptions, util::stream::ByteOrder};

use crate::app::error::RuntimeError;

/// Default export type
pub const DEFAULT_EXPORT_TYPE: &str = "txt";
/// Path that means "write to standard output"
pub const STDOUT_PATH: &str = "-";

// CLI Arg Names
pub const OPTION_ARCHIVE_PATHS: &str = "archives";
pub const OPTION_EXPORT_TYPE: &str = "format";
pub const OPTION_EXPORT_PATH: &str = "output";
pub const OPTION_VERBOSE: &str = "verbose";
pub const OPTION_WHINY: &str = "whiny";
pub const OPTION_BYTE_ORDER: &str = "byte-order";
pub const OPTION_MAX_REPETITIONS: &str = "max-repetitions";

// Other CLI Text
pub const SUPPORTED_FILE_TYPES: &str = "txt, ics, ndjson";
pub const SUPPORTED_BYTE_ORDERS: &str = "native, little, big";
pub const ABOUT: &str = concat!(
    "The `palm-exporter` binary reads Date Book archives saved by Palm Desktop\n",
    "and writes their appointments, with every repetition expanded, as plain text,\n",
    "iCalendar, or newline-delimited JSON. All times are UTC."
);

/// Represents the output formats the app can write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportType {
    /// One summary line per occurrence
    Txt,
    /// An iCalendar stream with one event per occurrence
    Ics,
    /// One JSON object per appointment
    Ndjson,
}

impl ExportType {
    /// Given user's input, return a variant if the input matches one
    pub fn from_cli(export_type: &str) -> Option<Self> {
        match export_type.to_lowercase().as_str() {
            "txt" => Some(Self::Txt),
            "ics" | "vcalendar" => Some(Self::Ics),
            "ndjson" => Some(Self::Ndjson),
            _ => None,
        }
    }
}

impl Display for ExportType {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportType::Txt => write!(fmt, "txt"),
            ExportType::Ics => write!(fmt, "ics"),
            ExportType::Ndjson => write!(fmt, "ndjson"),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct Options {
    /// Archives to export, in order
    pub archive_paths: Vec<PathBuf>,
    /// The type of file we are exporting data to
    pub export_type: ExportType,
    /// Where the export is written; `None` for standard output
    pub export_path: Option<PathBuf>,
    /// If true, emit a summary of each archive
    pub verbose: bool,
    /// If true, emit every diagnostic the decoder produces
    pub whiny: bool,
    /// Settings passed through to the archive decoder
    pub decode_options: DecodeOptions,
}

impl Options {
    pub fn from_args(args: &ArgMatches) -> Result<Self, RuntimeError> {
        let archive_paths: Vec<PathBuf> = args
            .get_many::<String>(OPTION_ARCHIVE_PATHS)
            .map(|paths| paths.map(PathBuf::from).collect())
            .unwrap_or_default();
        let user_export_type = args
            .get_one::<String>(OPTION_EXPORT_TYPE)
            .map(String::as_str)
            .unwrap_or(DEFAULT_EXPORT_TYPE);
        let user_export_path: Option<&String> = args.get_one(OPTION_EXPORT_PATH);
        let whiny = args.get_flag(OPTION_WHINY);
        let verbose = args.get_flag(OPTION_VERBOSE) || whiny;
        let user_byte_order: Option<&String> = args.get_one(OPTION_BYTE_ORDER);
        let user_max_repetitions: Option<&String> = args.get_one(OPTION_MAX_REPETITIONS);

        if archive_paths.is_empty() {
            return Err(RuntimeError::InvalidOptions(format!(
                "At least one archive path is required, see `--{OPTION_ARCHIVE_PATHS}`"
            )));
        }

        // Ensure the export type is valid
        let export_type = ExportType::from_cli(user_export_type).ok_or_else(|| {
            RuntimeError::InvalidOptions(format!(
                "{user_export_type} is not a valid export type! Must be one of <{SUPPORTED_FILE_TYPES}>"
            ))
        })?;

        // Ensure the export path is a file we can write
        let export_path = match user_export_path.map(String::as_str) {
            None | Some(STDOUT_PATH) => None,
            Some(path) => {
                let path = PathBuf::from(path);
                if path.is_dir() {
                    return Err(RuntimeError::InvalidOptions(format!(
                        "Specified export path {path:?} is a directory, not a file!"
                    )));
                }
                Some(path)
            }
        };

        let byte_order = match user_byte_order {
            Some(order) => ByteOrder::from_cli(order).ok_or_else(|| {
                RuntimeError::InvalidOptions(format!(
                    "{order} is not a valid byte order! Must be one of <{SUPPORTED_BYTE_ORDERS}>"
                ))
            })?,
            None => ByteOrder::default(),
        };

        let max_repetitions = match user_max_repetitions {
            Some(limit) => Some(limit.parse::<usize>().map_err(|_| {
                RuntimeError::InvalidOptions(format!(
                    "{limit} is not a valid repetition limit! Must be a non-negative integer"
                ))
            })?),
            None => None,
        };

        Ok(Options {
            archive_paths,
            export_type,
            export_path,
            verbose,
            whiny,
            decode_options: DecodeOptions {
                byte_order,
                max_repetitions,
            },
        })
    }

    /// The most detailed diagnostics to show when `RUST_LOG` is not set
    pub fn log_level(&self) -> Level {
        if self.whiny {
            Level::DEBUG
        } else if self.verbose {
            Level::INFO
        } else {
            Level::WARN
        }
    }

    /// Whether output goes to a file rather than the terminal
    pub fn writes_to_file(&self) -> bool {
        self.export_path.is_some()
    }
}

/// Build the command line argument parser
fn get_command() -> Command {
    Command::new("Palm Exporter")
        .version(crate_version!())
        .about(ABOUT)
        .arg_required_else_help(true)
        .arg(
            Arg::new(OPTION_ARCHIVE_PATHS)
                .help("Paths to the Date Book archives (.dba) to export")
                .num_args(1..)
                .required(true)
                .value_name("ARCHIVE")
                .display_order(0),
        )
        .arg(
            Arg::new(OPTION_EXPORT_TYPE)
                .short('f')
                .long(OPTION_EXPORT_TYPE)
                .help(format!("Specify a single file format to export appointments into\n`vcalendar` is accepted as another name for `ics`\nIf omitted, the default is `{DEFAULT_EXPORT_TYPE}`\n"))
                .display_order(1)
                .value_name(SUPPORTED_FILE_TYPES),
        )
        .arg(
            Arg::new(OPTION_EXPORT_PATH)
                .short('o')
                .long(OPTION_EXPORT_PATH)
                .help(format!("Specify a file to write the export to\nIf omitted or `{STDOUT_PATH}`, the export is written to standard output\n"))
                .display_order(2)
                .value_name("path/to/file"),
        )
        .arg(
            Arg::new(OPTION_VERBOSE)
                .short('v')
                .long(OPTION_VERBOSE)
                .help("Report a summary of the records in each archive\n")
                .action(ArgAction::SetTrue)
                .display_order(3),
        )
        .arg(
            Arg::new(OPTION_WHINY)
                .short('w')
                .long(OPTION_WHINY)
                .help(format!("Report every diagnostic from the decoder\nImplies `--{OPTION_VERBOSE}`\n"))
                .action(ArgAction::SetTrue)
                .display_order(4),
        )
        .arg(
            Arg::new(OPTION_BYTE_ORDER)
                .long(OPTION_BYTE_ORDER)
                .help("Specify the byte order the archives were written in\nIf omitted, the byte order of this machine is used\n")
                .display_order(5)
                .value_name(SUPPORTED_BYTE_ORDERS),
        )
        .arg(
            Arg::new(OPTION_MAX_REPETITIONS)
                .long(OPTION_MAX_REPETITIONS)
                .help("Stop expanding a repeating appointment after this many repetitions\nIf omitted, every repetition up to the rule's end date is exported\n")
                .display_order(6)
                .value_name("count"),
        )
}

/// Parse arguments from the command line
pub fn from_command_line() -> ArgMatches {
    let command = get_command();
    command.get_matches()
}
