extern crate dirs;
extern crate docopt;
extern crate fcsh;
extern crate fern;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

use std::path::PathBuf;
use std::process;

use docopt::Docopt;
use fcsh::errors::Error;
use fcsh::{Shell, ShellConfig};

const LOG_FILE_NAME: &str = ".fcsh_log";

const USAGE: &str = "
fcsh.

Usage:
    fcsh [options]
    fcsh [options] -c <command>
    fcsh (-h | --help)
    fcsh --version

Options:
    -h --help       Show this screen.
    --version       Show version.
    -c              If the -c option is present, then commands are read from the first non-option
                        argument command_string.
    --sync          Disable background execution; a trailing '&' is passed to the command.
    --log=<path>    File to write log to, defaults to ~/.fcsh_log
";

/// Docopts input arguments.
#[derive(Debug, Deserialize)]
struct Args {
    arg_command: Option<String>,
    flag_version: bool,
    flag_c: bool,
    flag_sync: bool,
    flag_log: Option<String>,
}

fn main() {
    let args: Args = Docopt::new(USAGE)
        .and_then(|d| d.deserialize())
        .unwrap_or_else(|e| e.exit());

    init_logger(&args.flag_log);
    debug!("{:?}", args);

    if args.flag_version {
        println!("fcsh version {}", env!("CARGO_PKG_VERSION"));
    } else if args.flag_c {
        execute_from_command_string(&args);
    } else {
        execute_from_stdin(&args);
    }
}

fn init_logger(path: &Option<String>) {
    let log_path = path.clone()
        .map(PathBuf::from)
        .unwrap_or_else(default_log_path);

    let pid = process::id();
    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "{} [{}] {}: {}",
                pid,
                record.level(),
                record.target(),
                message
            ))
        })
        .level(log::LevelFilter::Trace)
        .chain(fern::log_file(log_path).unwrap())
        .apply()
        .unwrap();
}

fn default_log_path() -> PathBuf {
    dirs::home_dir().unwrap().join(LOG_FILE_NAME)
}

fn execute_from_command_string(args: &Args) -> ! {
    let shell_config = ShellConfig::noninteractive();
    let mut shell = Shell::new(shell_config).unwrap_or_else(|e| display_error_and_exit(&e));

    let command = args.arg_command
        .as_ref()
        .expect("docopt guarantees <command> when -c is present");
    if let Err(e) = shell.execute_command_string(command) {
        eprintln!("fcsh: {}", e);
        process::exit(1);
    }
    shell.exit()
}

fn execute_from_stdin(args: &Args) -> ! {
    let shell_config = if args.flag_sync {
        ShellConfig::synchronous()
    } else {
        ShellConfig::interactive()
    };
    let mut shell = Shell::new(shell_config).unwrap_or_else(|e| display_error_and_exit(&e));
    shell.execute_from_stdin();
    shell.exit()
}

fn display_error_and_exit(error: &Error) -> ! {
    error!("failed to create shell: {}", error);
    eprintln!("fcsh: {}", error);
    process::exit(1);
}
