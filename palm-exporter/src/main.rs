#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]
mod app;
mod exporters;

use std::process::ExitCode;

use tracing_subscriber::{filter::LevelFilter, EnvFilter};

use app::{
    options::{from_command_line, Options},
    runtime::Config,
};

/// Exit status when the command line cannot be used
const EXIT_INVALID_OPTIONS: u8 = 2;

/// Send diagnostics to stderr at the level the options ask for, unless `RUST_LOG` is set
fn init_logging(options: &Options) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| {
            EnvFilter::default().add_directive(LevelFilter::from_level(options.log_level()).into())
        });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    // Get args from command line
    let args = from_command_line();
    // Create application options
    let options = match Options::from_args(&args) {
        Ok(options) => options,
        Err(why) => {
            eprintln!("{why}");
            return ExitCode::from(EXIT_INVALID_OPTIONS);
        }
    };

    init_logging(&options);

    // Create app state and start
    let app = Config::new(options);
    if let Err(why) = app.start() {
        eprintln!("Unable to export: {why}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
