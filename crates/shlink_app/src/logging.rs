//! Logger initialization for the command-line front end.
//!
//! File output goes to `./shlink.log` in the current working directory.

use std::fs::File;
use std::path::PathBuf;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

use crate::config::{LogConfig, LogDestination};

const LOG_FILE: &str = "./shlink.log";

/// Initialize the logger from the `log` section of the configuration.
pub fn initialize(log: &LogConfig) {
    let level = shlink_logging::parse_level(&log.level).unwrap_or(LevelFilter::Info);
    let config = build_config();

    let loggers: Vec<Box<dyn SharedLogger>> = match log.destination {
        LogDestination::File => match create_file_logger(level, config) {
            Some(file_logger) => vec![file_logger],
            None => return,
        },
        LogDestination::Terminal => vec![terminal_logger(level, config)],
        LogDestination::Both => {
            let mut loggers: Vec<Box<dyn SharedLogger>> =
                vec![terminal_logger(level, config.clone())];
            if let Some(file_logger) = create_file_logger(level, config) {
                loggers.push(file_logger);
            }
            loggers
        }
    };

    let _ = CombinedLogger::init(loggers);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn terminal_logger(level: LevelFilter, config: Config) -> Box<TermLogger> {
    TermLogger::new(level, config, TerminalMode::Stderr, ColorChoice::Auto)
}

fn create_file_logger(level: LevelFilter, config: Config) -> Option<Box<WriteLogger<File>>> {
    let log_path = PathBuf::from(LOG_FILE);
    match File::create(&log_path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: Could not create log file at {:?}: {}", log_path, err);
            None
        }
    }
}
