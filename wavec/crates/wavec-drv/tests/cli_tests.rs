//! CLI-level tests for the `wavec` binary: argument handling, `--emit`
//! selection, and the error-diagnostic exit code.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;
use std::io::Write;

fn wavec_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_wavec"))
}

fn source_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp source file");
    file.write_all(contents.as_bytes()).expect("write temp source file");
    file
}

#[test]
fn no_input_files_is_an_error() {
    wavec_bin().assert().failure();
}

#[test]
fn clean_source_exits_zero_with_no_stdout() {
    let file = source_file("x :: 1\n");
    wavec_bin()
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn emit_sexpr_prints_rendered_form() {
    let file = source_file("hello :: 2 * 1 - 2 * 3\n");
    wavec_bin()
        .arg(file.path())
        .arg("--emit")
        .arg("sexpr")
        .assert()
        .success()
        .stdout(predicate::str::contains("(def hello (- (* 2 1) (* 2 3)))"));
}

#[test]
fn emit_tokens_prints_one_line_per_token() {
    let file = source_file("x :: 1\n");
    wavec_bin()
        .arg(file.path())
        .arg("--emit=tokens")
        .assert()
        .success()
        .stdout(predicate::str::contains("Ident"));
}

#[test]
fn emit_ast_prints_debug_dump() {
    let file = source_file("x :: 1\n");
    wavec_bin()
        .arg(file.path())
        .arg("--emit")
        .arg("ast")
        .assert()
        .success()
        .stdout(predicate::str::contains("Ast"));
}

#[test]
fn unknown_emit_kind_is_rejected() {
    let file = source_file("x :: 1\n");
    wavec_bin()
        .arg(file.path())
        .arg("--emit")
        .arg("llvm")
        .assert()
        .failure();
}

#[test]
fn malformed_source_exits_nonzero_and_reports_a_diagnostic() {
    let file = source_file("foo ::\n");
    wavec_bin()
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::is_empty().not());
}

#[test]
fn verbose_flag_logs_progress_to_stderr() {
    let file = source_file("x :: 1\n");
    wavec_bin()
        .arg(file.path())
        .arg("--verbose")
        .assert()
        .success()
        .stderr(predicate::str::contains("lexing and parsing"));
}

#[test]
fn missing_file_is_an_io_error() {
    wavec_bin()
        .arg("/no/such/file/for/wavec/tests.wc")
        .assert()
        .failure();
}
