extern crate clap;

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgMatches};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::commands::utils::*;
use crate::commands::Command;
use crate::dencoder::*;
use crate::denc::features::Features;
use crate::dump::{text::write_text, xml::write_xml};
use crate::version::*;

//------------------------------------------

pub struct RbdDencoderCommand;

fn type_arg() -> Arg {
    Arg::new("TYPE")
        .help("Record type, see list_types")
        .required(true)
        .index(1)
}

impl RbdDencoderCommand {
    fn cli(&self) -> clap::Command {
        let cmd = clap::Command::new(self.name())
            .next_display_order(None)
            .version(crate::tools_version!())
            .disable_version_flag(true)
            .about("Encode, decode and dump rbd class records")
            .subcommand(clap::Command::new("list_types").about("List the known record types"))
            .subcommand(
                clap::Command::new("count_tests")
                    .about("Print the number of test instances of a type")
                    .arg(type_arg()),
            )
            .subcommand(
                clap::Command::new("encode")
                    .about("Encode a test instance to a file")
                    .arg(type_arg())
                    .arg(
                        Arg::new("INDEX")
                            .help("Test instance to encode")
                            .required(true)
                            .index(2)
                            .value_parser(value_parser!(usize)),
                    )
                    .arg(
                        Arg::new("OUTPUT")
                            .help("Specify the output file")
                            .short('o')
                            .long("output")
                            .required(true)
                            .value_name("FILE"),
                    )
                    .arg(
                        Arg::new("FEATURES")
                            .help("Features of the target cluster: none, nautilus, all or a mask")
                            .short('f')
                            .long("features")
                            .value_name("MASK")
                            .default_value("all")
                            .value_parser(value_parser!(Features)),
                    ),
            )
            .subcommand(
                clap::Command::new("decode")
                    .about("Decode a file and dump the record to stdout")
                    .arg(type_arg())
                    .arg(
                        Arg::new("INPUT")
                            .help("Specify the input file")
                            .required(true)
                            .index(2),
                    )
                    .arg(
                        Arg::new("FORMAT")
                            .help("Output format")
                            .long("format")
                            .value_name("FORMAT")
                            .default_value("xml")
                            .value_parser(["xml", "text"]),
                    )
                    .arg(
                        Arg::new("READER_VERSION")
                            .help("Decode as a reader that knows struct versions up to N")
                            .long("reader-version")
                            .value_name("N")
                            .value_parser(value_parser!(u8)),
                    ),
            );
        verbose_args(version_args(cmd))
    }
}

fn type_of(matches: &ArgMatches) -> Result<Box<dyn DencoderType>> {
    // required by clap
    let name = matches
        .get_one::<String>("TYPE")
        .context("no type given")?;
    find_type(name)
}

fn list_types() -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    for t in registered_types() {
        writeln!(stdout, "{}", t.name())?;
    }
    Ok(())
}

fn count_tests(matches: &ArgMatches) -> Result<()> {
    let t = type_of(matches)?;
    println!("{}", t.count_tests());
    Ok(())
}

fn encode(matches: &ArgMatches) -> Result<()> {
    let t = type_of(matches)?;
    let index = *matches.get_one::<usize>("INDEX").context("no index given")?;
    let features = *matches
        .get_one::<Features>("FEATURES")
        .unwrap_or(&Features::ALL);
    let output = Path::new(matches.get_one::<String>("OUTPUT").context("no output given")?);

    let file = File::create(output)
        .with_context(|| format!("couldn't create output file '{}'", output.display()))?;
    let mut w = BufWriter::new(file);
    t.encode_test(index, features, &mut w)?;
    w.flush()?;
    Ok(())
}

fn decode(matches: &ArgMatches) -> Result<()> {
    let t = type_of(matches)?;
    let input = Path::new(matches.get_one::<String>("INPUT").context("no input given")?);
    let data = read_input_file(input)
        .with_context(|| format!("couldn't read input file '{}'", input.display()))?;

    let reader_version = matches.get_one::<u8>("READER_VERSION").copied();
    let tree = t
        .decode_dump(&data, reader_version)
        .with_context(|| format!("couldn't decode {} from '{}'", t.name(), input.display()))?;

    let stdout = std::io::stdout().lock();
    match matches.get_one::<String>("FORMAT").map(|s| s.as_str()) {
        Some("text") => write_text(stdout, &tree)?,
        _ => write_xml(stdout, &tree)?,
    }
    Ok(())
}

impl<'a> Command<'a> for RbdDencoderCommand {
    fn name(&self) -> &'a str {
        "rbd_dencoder"
    }

    fn run(&self, args: &mut dyn Iterator<Item = std::ffi::OsString>) -> exitcode::ExitCode {
        let matches = match self.cli().try_get_matches_from(args) {
            Ok(m) => m,
            Err(e) => {
                let _ = e.print();
                return if e.use_stderr() {
                    exitcode::USAGE
                } else {
                    exitcode::OK
                };
            }
        };
        display_version(self.name(), &matches);

        let quiet = matches.get_flag("QUIET");
        init_logging(parse_log_level(&matches));

        let result = match matches.subcommand() {
            Some(("list_types", _)) => list_types(),
            Some(("count_tests", sub)) => count_tests(sub),
            Some(("encode", sub)) => encode(sub),
            Some(("decode", sub)) => decode(sub),
            _ => {
                let _ = self.cli().print_help();
                return exitcode::USAGE;
            }
        };

        to_exit_code(quiet, result)
    }
}

//------------------------------------------
