//! Integration Tests

extern crate assert_cli;
extern crate tempdir;

use std::fs;
use std::io;
use std::path::PathBuf;

use assert_cli::Assert;
use tempdir::TempDir;

#[test]
fn test_command_string_echo() {
    Assert::cargo_binary("fcsh")
        .with_args(&["-c", "echo test"])
        .stdout()
        .contains("test")
        .succeeds()
        .unwrap();
}

#[test]
fn test_command_string_pipeline() {
    Assert::cargo_binary("fcsh")
        .with_args(&["-c", "echo needle | grep needle"])
        .stdout()
        .contains("needle")
        .succeeds()
        .unwrap();
}

#[test]
fn test_missing_infile_reports_failure_and_run_completes() {
    Assert::cargo_binary("fcsh")
        .with_args(&["-c", "cat < fcsh_missing_input.txt"])
        .stdout()
        .contains("Fallo al abrir el archivo fcsh_missing_input.txt")
        .succeeds()
        .unwrap();
}

#[test]
fn test_unknown_command_reports_failure() {
    Assert::cargo_binary("fcsh")
        .with_args(&["-c", "fcsh-no-such-command"])
        .stdout()
        .contains("Fallo al intentar ejecutar fcsh-no-such-command")
        .succeeds()
        .unwrap();
}

#[test]
fn test_output_redirection_creates_file() {
    let temp_dir = generate_temp_directory().expect("unable to generate temp dir");

    Assert::cargo_binary("fcsh")
        .current_dir(temp_dir.path())
        .with_args(&["-c", "echo hola > salida.txt"])
        .succeeds()
        .unwrap();

    let contents = fs::read_to_string(temp_dir.path().join("salida.txt"))
        .expect("redirected output file was not created");
    assert_eq!(contents, "hola\n");
}

#[test]
fn test_exit_over_stdin() {
    Assert::cargo_binary("fcsh")
        .stdin("exit\n")
        .stdout()
        .contains("[  1 (0)] -> ")
        .succeeds()
        .unwrap();
}

#[test]
fn test_sync_prompt_omits_job_count() {
    Assert::cargo_binary("fcsh")
        .with_args(&["--sync"])
        .stdin("exit\n")
        .stdout()
        .contains("[  1] -> ")
        .succeeds()
        .unwrap();
}

#[test]
fn test_background_command_does_not_block_prompt() {
    // `sleep 2` cannot have finished by the second prompt cycle, so the
    // outstanding count must read 1 there.
    Assert::cargo_binary("fcsh")
        .stdin("sleep 2 &\nexit\n")
        .stdout()
        .contains("[  2 (1)] -> ")
        .succeeds()
        .unwrap();
}

#[test]
fn test_background_completion_notice_is_reported() {
    // `true` finishes during the foreground `sleep 1`, so the third prompt
    // cycle drains its notice.
    Assert::cargo_binary("fcsh")
        .stdin("true &\nsleep 1\nexit\n")
        .stdout()
        .contains("finalizado con código de salida 0")
        .succeeds()
        .unwrap();
}

fn generate_temp_directory() -> io::Result<TempDir> {
    // Because of limitation in `assert_cli`, temporary directory must be
    // subdirectory of directory containing Cargo.toml
    let temp_root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests");
    TempDir::new_in(temp_root, "temp")
}
