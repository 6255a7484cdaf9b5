use failure::ResultExt;
use nix::libc;
use nix::sys::signal::{self, SaFlags, SigAction, SigHandler, SigSet, Signal};

use errors::{ErrorKind, Result};

const INTERRUPT_REMINDER: &[u8] = b"\nUtilice 'exit' para salir\n";

/// Reminds the user to leave through the exit command instead of Ctrl-C.
///
/// Runs in signal context: only async-signal-safe calls allowed here.
extern "C" fn handle_interrupt(_signal: libc::c_int) {
    unsafe {
        libc::write(
            libc::STDOUT_FILENO,
            INTERRUPT_REMINDER.as_ptr() as *const libc::c_void,
            INTERRUPT_REMINDER.len(),
        );
    }
}

/// Installs the SIGINT handler for the whole interpreter run.
///
/// SA_RESTART keeps the blocking reads and waits of the prompt loop going
/// once the reminder has been written; the interpreter itself never dies on
/// an interactive interrupt.
pub fn install_interrupt_handler() -> Result<()> {
    let action = SigAction::new(
        SigHandler::Handler(handle_interrupt),
        SaFlags::SA_RESTART,
        SigSet::empty(),
    );
    unsafe { signal::sigaction(Signal::SIGINT, &action) }.context(ErrorKind::Nix)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str;

    #[test]
    fn interrupt_leaves_the_process_running() {
        install_interrupt_handler().unwrap();
        signal::raise(Signal::SIGINT).unwrap();

        // Still running, so the handler fired instead of the default
        // action ending the process. The exit command keeps working after
        // an interrupt because nothing here touches interpreter state.
        assert_eq!(
            str::from_utf8(INTERRUPT_REMINDER).unwrap(),
            "\nUtilice 'exit' para salir\n"
        );
    }
}
