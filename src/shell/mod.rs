pub use self::shell::Shell;

mod execute_command;
mod job_control;
mod shell;
mod signals;

/// Policy object to control a Shell's behavior
#[derive(Debug, Copy, Clone)]
pub struct ShellConfig {
    /// Determines if a trailing `&` runs the command in the background and
    /// if the prompt shows the outstanding-job count.
    enable_background_jobs: bool,

    /// Determines if the banner and the interrupt reminder are displayed.
    display_messages: bool,
}

impl ShellConfig {
    /// Creates an interactive shell with asynchronous job support.
    ///
    /// # Complete List
    /// - Background execution (`&`) is enabled
    /// - The prompt displays the outstanding background-job count
    /// - The banner is displayed and SIGINT only prints a reminder
    pub fn interactive() -> Self {
        Self {
            enable_background_jobs: true,
            display_messages: true,
        }
    }

    /// Creates an interactive shell without background execution.
    ///
    /// # Complete List
    /// - `&` is passed through to commands as an ordinary argument
    /// - The prompt omits the job count
    /// - The banner is displayed and SIGINT only prints a reminder
    pub fn synchronous() -> Self {
        Self {
            display_messages: true,
            ..Default::default()
        }
    }

    /// Creates a noninteractive shell, e.g. for `-c`: no banner, no prompt,
    /// no background execution.
    pub fn noninteractive() -> Self {
        Default::default()
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            enable_background_jobs: false,
            display_messages: false,
        }
    }
}
