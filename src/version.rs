use clap::ArgMatches;
use std::io::Write;

//------------------------------------------

#[macro_export]
macro_rules! tools_version {
    () => {
        env!("CARGO_PKG_VERSION")
    };
}

pub fn version_args(cmd: clap::Command) -> clap::Command {
    use clap::Arg;

    cmd.arg(
        Arg::new("VERSION")
            .help("Print version")
            .short('V')
            .long("version")
            .exclusive(true)
            .action(clap::ArgAction::SetTrue),
    )
}

/// Prints "<tool> <version>" and exits if the version flag was given.
pub fn display_version(tool: &str, matches: &ArgMatches) {
    if matches.get_flag("VERSION") {
        let mut stdout = std::io::stdout();
        // ignore broken pipe errors
        let _ = writeln!(stdout, "{} {}", tool, tools_version!());
        let _ = stdout.flush();

        std::process::exit(0);
    }
}

//------------------------------------------
