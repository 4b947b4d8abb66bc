// End-to-end tests for the lyharness binary.
//
// Each test builds a scratch root with `tests/<name>.ly` sources and a shell
// script at `bin/lygosc` standing in for the real compiler. The stand-in
// appends its arguments to `calls.log` and writes the requested artifact.
// Environment knobs:
//   LYFAKE_FAIL=<name>    exit 1 with a message on stderr, write nothing
//   LYFAKE_DELETE=<name>  delete that component's source while "compiling"
//
// Unix only (the stand-in is a /bin/sh script).
#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const ALL: [&str; 6] = ["match", "member_fn", "for_loop", "init_list", "macro", "trait"];

const FAKE_LYGOSC: &str = r#"#!/bin/sh
echo "$@" >> calls.log
src="$1"
out="$3"
if [ -n "$LYFAKE_FAIL" ] && [ "$src" = "tests/$LYFAKE_FAIL.ly" ]; then
    echo "error: cannot compile $src" >&2
    exit 1
fi
if [ -n "$LYFAKE_DELETE" ] && [ "$src" = "tests/$LYFAKE_DELETE.ly" ]; then
    rm -f "$src"
fi
if [ "$4" = "-e" ]; then
    : > "$out.ll"
else
    : > "$out"
fi
exit 0
"#;

fn lyharness_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_lyharness"))
}

/// Scratch root with the stand-in compiler and the given sources.
fn scratch(sources: &[&str]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::create_dir(dir.path().join("tests")).unwrap();
    fs::create_dir(dir.path().join("bin")).unwrap();
    for name in sources {
        fs::write(
            dir.path().join("tests").join(format!("{name}.ly")),
            format!("// {name}\n"),
        )
        .unwrap();
    }
    let compiler = dir.path().join("bin/lygosc");
    fs::write(&compiler, FAKE_LYGOSC).unwrap();
    fs::set_permissions(&compiler, fs::Permissions::from_mode(0o755)).unwrap();
    dir
}

fn run_harness(root: &Path, args: &[&str], env: &[(&str, &str)]) -> Output {
    let mut cmd = Command::new(lyharness_binary());
    cmd.arg("--root").arg(root).args(args);
    cmd.env_remove("LYFAKE_FAIL").env_remove("LYFAKE_DELETE");
    for (k, v) in env {
        cmd.env(k, v);
    }
    cmd.output().expect("failed to run lyharness")
}

fn stdout(o: &Output) -> String {
    String::from_utf8(o.stdout.clone()).expect("non-UTF8 output")
}

fn calls(root: &Path) -> Vec<String> {
    match fs::read_to_string(root.join("calls.log")) {
        Ok(s) => s.lines().map(str::to_string).collect(),
        Err(_) => Vec::new(),
    }
}

fn compiling_lines() -> String {
    ALL.iter()
        .map(|n| format!("[compiling]: {n}\n"))
        .collect::<String>()
}

#[test]
fn all_sources_present_compiles_everything() {
    let dir = scratch(&ALL);
    let out = run_harness(dir.path(), &[], &[]);

    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(
        stdout(&out),
        format!("{}successfully compiled all components\n", compiling_lines())
    );

    let expected: Vec<String> = ALL
        .iter()
        .map(|n| format!("tests/{n}.ly -o tests/{n} -e llvm-ir"))
        .collect();
    assert_eq!(calls(dir.path()), expected);
    assert!(dir.path().join("tests/trait.ll").is_file());
}

#[test]
fn missing_source_terminates_before_cleanup() {
    let dir = scratch(&["match", "member_fn", "for_loop", "init_list", "trait"]);
    let stale = dir.path().join("tests/match.o");
    fs::write(&stale, "old object").unwrap();

    let out = run_harness(dir.path(), &[], &[]);

    assert_eq!(out.status.code(), Some(0));
    assert_eq!(
        stdout(&out),
        "test component `macro` does not exist or is not a file\n"
    );
    assert!(calls(dir.path()).is_empty(), "compiler must not run");
    assert!(stale.exists(), "cleanup must not run");
}

#[test]
fn strict_makes_missing_source_exit_nonzero() {
    let dir = scratch(&["match"]);
    let out = run_harness(
        dir.path(),
        &["--strict", "--component", "match", "--component", "trait"],
        &[],
    );
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(
        stdout(&out),
        "test component `trait` does not exist or is not a file\n"
    );
    assert!(calls(dir.path()).is_empty());
}

#[test]
fn relative_root_runs_compiler() {
    let parent = tempfile::tempdir().expect("tempdir");
    let proj = scratch(&["match"]);
    let root = parent.path().join("proj");
    fs::rename(proj.path(), &root).unwrap();

    let out = Command::new(lyharness_binary())
        .current_dir(parent.path())
        .args(["-C", "proj", "--component", "match", "--check-status"])
        .env_remove("LYFAKE_FAIL")
        .env_remove("LYFAKE_DELETE")
        .output()
        .expect("failed to run lyharness");

    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(calls(&root), ["tests/match.ly -o tests/match -e llvm-ir"]);
    assert!(root.join("tests/match.ll").is_file());
    assert_eq!(
        stdout(&out),
        "[compiling]: match\nsuccessfully compiled all components\n"
    );
}

#[test]
fn source_deleted_during_compile_is_reported() {
    let dir = scratch(&ALL);
    let out = run_harness(dir.path(), &[], &[("LYFAKE_DELETE", "trait")]);

    assert!(out.status.success());
    assert_eq!(
        stdout(&out),
        format!(
            "{} failed to compile `trait`\nfailed to compile components: ['trait']\n",
            compiling_lines()
        )
    );
}

#[test]
fn strict_turns_validation_failure_into_exit_status() {
    let dir = scratch(&ALL);
    let out = run_harness(dir.path(), &["--strict"], &[("LYFAKE_DELETE", "trait")]);
    assert_eq!(out.status.code(), Some(1));

    let dir = scratch(&ALL);
    let out = run_harness(dir.path(), &["--strict"], &[]);
    assert!(out.status.success());
}

#[test]
fn compiler_failure_ignored_by_default() {
    let dir = scratch(&ALL);
    let out = run_harness(dir.path(), &[], &[("LYFAKE_FAIL", "macro")]);
    assert!(out.status.success());
    assert!(stdout(&out).ends_with("successfully compiled all components\n"));
}

#[test]
fn check_status_reports_compiler_failure_with_stderr() {
    let dir = scratch(&ALL);
    let out = run_harness(dir.path(), &["--check-status"], &[("LYFAKE_FAIL", "macro")]);
    assert!(out.status.success());
    assert!(
        stdout(&out).ends_with(
            " failed to compile `macro`\n    error: cannot compile tests/macro.ly\nfailed to compile components: ['macro']\n"
        ),
        "stdout: {}",
        stdout(&out)
    );
}

#[test]
fn validate_outputs_catches_missing_ir() {
    let dir = scratch(&ALL);
    let out = run_harness(
        dir.path(),
        &["--validate", "outputs"],
        &[("LYFAKE_FAIL", "for_loop")],
    );
    assert!(stdout(&out).ends_with("failed to compile components: ['for_loop']\n"));
}

#[test]
fn exe_mode_drops_emit_flag() {
    let dir = scratch(&["match"]);
    let out = run_harness(
        dir.path(),
        &["--component", "match", "--emit", "exe", "--validate", "outputs"],
        &[],
    );
    assert!(out.status.success());
    assert_eq!(calls(dir.path()), ["tests/match.ly -o tests/match"]);
    assert!(stdout(&out).ends_with("successfully compiled all components\n"));
}

#[test]
fn component_override_keeps_given_order() {
    let dir = scratch(&["trait", "match"]);
    let out = run_harness(
        dir.path(),
        &["--component", "trait", "--component", "match"],
        &[],
    );
    assert_eq!(
        stdout(&out),
        "[compiling]: trait\n[compiling]: match\nsuccessfully compiled all components\n"
    );
}

#[test]
fn invalid_component_is_a_configuration_error() {
    let dir = scratch(&ALL);
    let out = run_harness(dir.path(), &["--component", "../escape"], &[]);
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("invalid component name '../escape'"));
    assert!(calls(dir.path()).is_empty());
}

#[test]
fn missing_compiler_binary_does_not_fail_the_run() {
    let dir = scratch(&ALL);
    fs::remove_file(dir.path().join("bin/lygosc")).unwrap();
    let out = run_harness(dir.path(), &[], &[]);
    assert!(out.status.success());
    assert!(stdout(&out).ends_with("successfully compiled all components\n"));
}

#[test]
fn json_report_lists_every_component() {
    let dir = scratch(&ALL);
    let out = run_harness(
        dir.path(),
        &["--format", "json", "--check-status"],
        &[("LYFAKE_FAIL", "init_list")],
    );
    let text = stdout(&out);
    let json_start = text.find('{').expect("json report");
    let report: serde_json::Value = serde_json::from_str(&text[json_start..]).unwrap();

    assert_eq!(report["emit"], "llvm-ir");
    assert_eq!(report["validate"], "sources");
    assert_eq!(report["failed"], serde_json::json!(["init_list"]));
    let components = report["components"].as_array().unwrap();
    assert_eq!(components.len(), 6);
    assert_eq!(components[3]["name"], "init_list");
    assert_eq!(components[3]["outcome"]["status"], "exited");
    assert_eq!(components[3]["outcome"]["code"], 1);
    assert_eq!(components[3]["failed"], true);
    assert_eq!(components[0]["source"], "tests/match.ly");
    assert_eq!(
        components[0]["source_sha256"].as_str().map(str::len),
        Some(64)
    );
}
