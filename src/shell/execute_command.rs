use std::ffi::CString;
use std::fs::File;
use std::os::unix::io::FromRawFd;
use std::os::unix::process::CommandExt;
use std::process::{Command, Stdio};
use std::result;

use failure::ResultExt;
use nix::fcntl::{self, OFlag};
use nix::libc;
use nix::sys::stat::Mode;
use nix::sys::wait::{self, WaitStatus};
use nix::unistd::{self, Pid};

use core::parser::CommandLine;
use errors::{ErrorKind, Result};

const CHILD_FAILURE_EXIT_CODE: i32 = 255;

/// An external process the shell has spawned.
///
/// Doubles as the record a background watcher needs: the pid to wait on and
/// the command name used for the completion notice.
#[derive(Clone, Debug)]
pub struct Process {
    name: String,
    id: u32,
}

impl Process {
    pub fn new(name: &str, id: u32) -> Process {
        Process {
            name: name.to_string(),
            id,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> u32 {
        self.id
    }
}

/// Spawns one process per pipeline stage, returning a record for each.
///
/// Waiting is the caller's concern; by the time this returns, every file
/// descriptor created for redirection or piping has been handed to the
/// children and closed on the parent side.
pub fn spawn_processes(command_line: &CommandLine) -> Result<Vec<Process>> {
    if command_line.has_pipe() {
        spawn_pipeline(command_line)
    } else {
        let child = prepare_command(
            &command_line.argv,
            command_line.infile.as_ref().map(String::as_str),
            command_line.outfile.as_ref().map(String::as_str),
        )?.spawn()
            .context(ErrorKind::Io)?;
        Ok(vec![Process::new(&command_line.argv[0], child.id())])
    }
}

/// Connects two processes through one unnamed pipe.
///
/// Redirection paths are never applied to a pipeline; the tokenizer may have
/// collected them but pipe semantics win. The pipe ends are wired up by the
/// standard library in each child before the exec hook runs, and the parent's
/// RAII handles close both ends exactly once when this function returns.
fn spawn_pipeline(command_line: &CommandLine) -> Result<Vec<Process>> {
    let (read_end_pipe, write_end_pipe) = create_pipe()?;

    let first = prepare_command(&command_line.argv, None, None)?
        .stdout(Stdio::from(write_end_pipe))
        .spawn()
        .context(ErrorKind::Io)?;

    let second = prepare_command(&command_line.pipe_argv, None, None)?
        .stdin(Stdio::from(read_end_pipe))
        .spawn()
        .context(ErrorKind::Io)?;

    Ok(vec![
        Process::new(&command_line.argv[0], first.id()),
        Process::new(&command_line.pipe_argv[0], second.id()),
    ])
}

/// Everything the child needs to perform one redirection: the path to open
/// and the diagnostic to emit if the open fails. Both are prepared in the
/// parent so nothing is allocated between fork and exec.
struct ChildRedirect {
    path: CString,
    failure_message: Vec<u8>,
}

impl ChildRedirect {
    fn input(path: &str) -> Result<ChildRedirect> {
        Ok(ChildRedirect {
            path: CString::new(path).context(ErrorKind::Io)?,
            failure_message: format!("Fallo al abrir el archivo {}\n", path).into_bytes(),
        })
    }

    fn output(path: &str) -> Result<ChildRedirect> {
        Ok(ChildRedirect {
            path: CString::new(path).context(ErrorKind::Io)?,
            failure_message: format!("Fallo al crear el archivo {}\n", path).into_bytes(),
        })
    }
}

/// Builds a `Command` whose child-side setup mirrors a raw fork/exec pair.
///
/// Redirection files are opened in the child, diagnostics go to whatever
/// fd 1 is at that moment, and the image replacement happens through
/// `execvp` inside the `before_exec` hook, so a failed exec terminates the
/// child without ever returning into interpreter code.
fn prepare_command(
    argv: &[String],
    infile: Option<&str>,
    outfile: Option<&str>,
) -> Result<Command> {
    let program = CString::new(argv[0].as_str()).context(ErrorKind::Io)?;
    let args = argv.iter()
        .map(|arg| CString::new(arg.as_str()))
        .collect::<result::Result<Vec<_>, _>>()
        .context(ErrorKind::Io)?;
    let exec_failure_message = format!("Fallo al intentar ejecutar {}\n", argv[0]).into_bytes();

    let stdin_redirect = match infile {
        Some(path) => Some(ChildRedirect::input(path)?),
        None => None,
    };
    let stdout_redirect = match outfile {
        Some(path) => Some(ChildRedirect::output(path)?),
        None => None,
    };

    let mut command = Command::new(&argv[0]);
    command.args(&argv[1..]);
    command.before_exec(move || {
        if let Some(ref redirect) = stdin_redirect {
            match fcntl::open(redirect.path.as_c_str(), OFlag::O_RDONLY, Mode::empty()) {
                Ok(fd) => {
                    // No unwinding between fork and exec; any failure ends
                    // the child through exit_child.
                    if unistd::dup2(fd, libc::STDIN_FILENO).is_err()
                        || unistd::close(fd).is_err()
                    {
                        exit_child(&redirect.failure_message);
                    }
                }
                Err(_) => exit_child(&redirect.failure_message),
            }
        }

        if let Some(ref redirect) = stdout_redirect {
            match fcntl::open(
                redirect.path.as_c_str(),
                OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_TRUNC,
                Mode::from_bits_truncate(0o644),
            ) {
                Ok(fd) => {
                    if unistd::dup2(fd, libc::STDOUT_FILENO).is_err()
                        || unistd::close(fd).is_err()
                    {
                        exit_child(&redirect.failure_message);
                    }
                }
                Err(_) => exit_child(&redirect.failure_message),
            }
        }

        let _ = unistd::execvp(&program, &args);
        exit_child(&exec_failure_message)
    });

    Ok(command)
}

/// Reports a failure from inside the child and terminates it. Only
/// async-signal-safe calls are made here.
fn exit_child(message: &[u8]) -> ! {
    let _ = unistd::write(libc::STDOUT_FILENO, message);
    unsafe { libc::_exit(CHILD_FAILURE_EXIT_CODE) }
}

/// Wraps `unistd::pipe2` to return RAII structs instead of raw, owning file
/// descriptors. Returns (`read_end_pipe`, `write_end_pipe`).
fn create_pipe() -> Result<(File, File)> {
    // The RawFds returned by pipe2 are moved into Files immediately so an
    // early return cannot leak them. O_CLOEXEC keeps either end from being
    // inherited by the child that must not hold it open.
    let (read_end_pipe, write_end_pipe) =
        unistd::pipe2(OFlag::O_CLOEXEC).context(ErrorKind::Nix)?;
    unsafe {
        Ok((
            File::from_raw_fd(read_end_pipe),
            File::from_raw_fd(write_end_pipe),
        ))
    }
}

/// Blocks until the process identified by `pid` exits, returning the raw
/// wait status: the exit code shifted into the high byte, or the number of
/// the terminating signal.
pub fn wait_for_process(pid: u32) -> Result<i32> {
    let pid = Pid::from_raw(pid as i32);
    loop {
        match wait::waitpid(pid, None).context(ErrorKind::Nix)? {
            WaitStatus::Exited(_, status) => return Ok(status << 8),
            WaitStatus::Signaled(_, signal, _) => return Ok(signal as i32),
            _ => continue,
        }
    }
}
