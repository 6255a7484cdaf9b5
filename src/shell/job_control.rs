//! Background job tracking.
//!
//! One detached watcher thread per background process. Completion notices
//! land on a mutex-guarded stack that the prompt loop drains; the stack is
//! the only state shared between the watchers and the shell.

use std::fmt;
use std::sync::{Arc, Mutex};
use std::thread;

use shell::execute_command::{self, Process};

/// Tracks background processes and their pending completion notices.
#[derive(Default)]
pub struct JobMonitor {
    notices: Arc<Mutex<Vec<String>>>,
    outstanding: u32,
}

impl JobMonitor {
    /// Number of background jobs whose completion has not been reported yet.
    pub fn outstanding(&self) -> u32 {
        self.outstanding
    }

    /// Starts a detached watcher for `process` and returns immediately.
    ///
    /// The watcher owns the record from here on. It blocks on that one pid,
    /// formats the completion notice and pushes it under the stack's lock;
    /// it never touches any other interpreter state. There is no way to
    /// cancel it.
    pub fn watch(&mut self, process: Process) {
        self.outstanding += 1;
        let notices = Arc::clone(&self.notices);
        thread::spawn(move || {
            // A notice is pushed on every path so each watch is matched by
            // exactly one drained notice and the outstanding count cannot
            // drift.
            let notice = match execute_command::wait_for_process(process.id()) {
                Ok(status) => {
                    debug!(
                        "background process {} exited with raw status {}",
                        process.id(),
                        status
                    );
                    format!(
                        "Proceso {} (pid:{}) finalizado con código de salida {}",
                        process.name(),
                        process.id(),
                        status
                    )
                }
                Err(e) => {
                    error!(
                        "failed to wait for background process {}: {}",
                        process.id(),
                        e
                    );
                    format!(
                        "No se pudo esperar al proceso {} (pid:{})",
                        process.name(),
                        process.id()
                    )
                }
            };
            let mut notices = notices.lock().expect("notice stack mutex poisoned");
            notices.push(notice);
        });
    }

    /// Removes and returns every queued notice, most recent completion
    /// first, decrementing the outstanding count for each.
    ///
    /// The whole drain happens under one hold of the lock.
    pub fn drain_notices(&mut self) -> Vec<String> {
        let mut drained = Vec::new();
        let mut notices = self.notices.lock().expect("notice stack mutex poisoned");
        while let Some(notice) = notices.pop() {
            self.outstanding -= 1;
            drained.push(notice);
        }
        drained
    }
}

impl fmt::Debug for JobMonitor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} outstanding background jobs", self.outstanding)
    }
}
