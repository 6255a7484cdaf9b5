//! fcsh - Shell Module
//!
//! The Shell itself is responsible for the prompt cycle: reporting finished
//! background jobs, reading a command line, and launching it.

use std::io::{self, Write};
use std::process;

use failure::ResultExt;

use core::parser::CommandLine;
use errors::{ErrorKind, Result};
use shell::execute_command;
use shell::job_control::JobMonitor;
use shell::signals;
use shell::ShellConfig;

/// fcsh Shell
#[derive(Debug)]
pub struct Shell {
    monitor: JobMonitor,
    /// Number of prompt cycles so far, displayed in the prompt.
    command_count: u32,
    config: ShellConfig,
    wants_exit: bool,
}

impl Shell {
    /// Constructs a new Shell to run commands and track background jobs.
    pub fn new(config: ShellConfig) -> Result<Shell> {
        if config.display_messages {
            signals::install_interrupt_handler()?;
        }

        let shell = Shell {
            monitor: JobMonitor::default(),
            command_count: 0,
            config,
            wants_exit: false,
        };

        if config.display_messages {
            shell.display_banner();
        }

        info!("fcsh started up");
        Ok(shell)
    }

    fn display_banner(&self) {
        // stands in for clear(1)
        print!("\x1b[2J\x1b[H");
        println!();
        println!("Bienvenido a fcsh {}", env!("CARGO_PKG_VERSION"));
        println!();
        println!("Introduce los comandos a ejecutar como lo harías habitualmente en Linux,");
        println!("separando cada argumento y metacarácter con espacios.");
        println!();
        println!("Puedes utilizar los metacaracteres < y > para redireccionar entrada y salida,");
        println!("combinándolos si interesa, así como el metacarácter | para crear una");
        println!("interconexión entre dos procesos. No se pueden combinar < y/o > con |.");
        println!();
        if self.config.enable_background_jobs {
            println!("Disponiendo el carácter & al final de la línea de comandos ésta se ejecutará");
            println!("en segundo plano, recibiéndose una notificación a medida que terminen.");
            println!();
        }
        println!("Para salir de fcsh utiliza el comando 'exit'");
        println!();
    }

    /// Custom prompt to output to the user.
    /// Returns `None` when end of file is reached.
    fn prompt(&mut self) -> Result<Option<String>> {
        self.command_count += 1;
        if self.config.enable_background_jobs {
            print!(
                "[{:>3} ({})] -> ",
                self.command_count,
                self.monitor.outstanding()
            );
        } else {
            print!("[{:>3}] -> ", self.command_count);
        }
        io::stdout().flush().context(ErrorKind::Io)?;

        let mut line = String::new();
        let bytes_read = io::stdin().read_line(&mut line).context(ErrorKind::Io)?;
        if bytes_read == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    /// Runs command lines from stdin until `exit` or EOF.
    pub fn execute_from_stdin(&mut self) {
        loop {
            if self.config.enable_background_jobs {
                // Report finished background jobs before showing the prompt,
                // most recently finished first.
                for notice in self.monitor.drain_notices() {
                    println!("\n{}", notice);
                }
            }

            let input = match self.prompt() {
                Ok(Some(line)) => line,
                Ok(None) => break,
                e => {
                    log_if_err!(e, "prompt");
                    continue;
                }
            };

            let temp_result = self.execute_command_string(&input);
            log_if_err!(temp_result, "execute_command_string");

            if self.wants_exit {
                break;
            }
        }
    }

    /// Runs one command line.
    pub fn execute_command_string(&mut self, input: &str) -> Result<()> {
        let command_line =
            match CommandLine::parse(input, self.config.enable_background_jobs) {
                Some(command_line) => command_line,
                None => return Ok(()),
            };

        if command_line.is_exit() {
            self.wants_exit = true;
            return Ok(());
        }

        self.execute_command(&command_line)
    }

    fn execute_command(&mut self, command_line: &CommandLine) -> Result<()> {
        let processes = execute_command::spawn_processes(command_line)?;

        if command_line.background && self.config.enable_background_jobs {
            for process in processes {
                self.monitor.watch(process);
            }
        } else {
            for process in &processes {
                // Exit statuses of foreground children are discarded.
                let temp_result = execute_command::wait_for_process(process.id());
                log_if_err!(temp_result, "wait_for_process({})", process.id());
            }
        }

        Ok(())
    }

    /// Exit the shell. The interpreter itself always exits successfully.
    pub fn exit(&mut self) -> ! {
        info!("fcsh has shut down");
        process::exit(0);
    }
}
