use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches};
use std::fs::OpenOptions;
use std::io::Read;
use std::path::Path;
use tracing::level_filters::LevelFilter;

use crate::denc::error::DecodeError;
use crate::dump::DumpError;

//------------------------------------------

pub fn verbose_args(cmd: clap::Command) -> clap::Command {
    cmd.arg(
        Arg::new("QUIET")
            .help("Suppress output messages, return only exit code.")
            .short('q')
            .long("quiet")
            .global(true)
            .action(ArgAction::SetTrue),
    )
    .arg(
        Arg::new("VERBOSE")
            .help("Log decoding details to stderr")
            .short('v')
            .long("verbose")
            .global(true)
            .conflicts_with("QUIET")
            .action(ArgAction::SetTrue),
    )
}

pub fn parse_log_level(matches: &ArgMatches) -> LevelFilter {
    if matches.get_flag("QUIET") {
        LevelFilter::OFF
    } else if matches.get_flag("VERBOSE") {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    }
}

pub fn init_logging(level: LevelFilter) {
    // a subscriber may already be installed if we're embedded
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

//------------------------------------------

pub fn read_input_file(path: &Path) -> Result<Vec<u8>> {
    let mut file = OpenOptions::new().read(true).open(path)?;
    let mut data = Vec::new();
    file.read_to_end(&mut data)?;
    Ok(data)
}

pub fn to_exit_code<T>(quiet: bool, result: Result<T>) -> exitcode::ExitCode {
    match result {
        Ok(_) => exitcode::OK,
        Err(e) => {
            if !quiet {
                eprintln!("{:#}", e);
            }

            if e.downcast_ref::<DecodeError>().is_some() {
                exitcode::DATAERR
            } else if e.downcast_ref::<DumpError>().is_some() {
                exitcode::SOFTWARE
            } else if e.downcast_ref::<std::io::Error>().is_some() {
                exitcode::IOERR
            } else {
                exitcode::USAGE
            }
        }
    }
}

//------------------------------------------
