//! fcsh - a minimal command interpreter with asynchronous job notification

extern crate failure;
#[macro_use]
extern crate log;
extern crate nix;

/// Logs an `Err` result with context instead of propagating it.
macro_rules! log_if_err {
    ($result:expr, $($arg:tt)*) => {
        if let Err(ref e) = $result {
            error!("{}: {}", format!($($arg)*), e);
        }
    };
}

pub mod core;
pub mod errors;
pub mod shell;

pub use shell::{Shell, ShellConfig};
