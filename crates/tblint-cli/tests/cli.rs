//! Integration test: the `tblint` binary end-to-end.
//!
//! Every command runs in a scratch directory with an empty `PATH`, so
//! Verible is only found when a test provides a stand-in.

use assert_cmd::Command;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn tblint(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("tblint").unwrap();
    cmd.current_dir(dir)
        .env("PATH", "")
        .env("TBLINT_CONFIG_DIR", dir.join(".no-global"))
        .env_remove("TBLINT_CONFIG")
        .env_remove("VERIBLE_HOME")
        .env_remove("VERIBLE_EXECUTABLE")
        .env_remove("RUST_LOG");
    cmd
}

fn stdout_of(cmd: &mut Command) -> (Option<i32>, String, String) {
    let output = cmd.output().unwrap();
    (
        output.status.code(),
        String::from_utf8_lossy(&output.stdout).into_owned(),
        String::from_utf8_lossy(&output.stderr).into_owned(),
    )
}

#[test]
fn list_linters_shows_builtins() {
    let tmp = TempDir::new().unwrap();
    let (code, stdout, _) = stdout_of(tblint(tmp.path()).arg("list-linters"));
    assert_eq!(code, Some(0));
    assert!(stdout.contains("naturaldocs"));
    assert!(stdout.contains("verible"));
}

#[test]
fn list_rules_reflects_configuration() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("tblint.toml"),
        "[linters.naturaldocs.rules.\"[ND_VAR_MISS]\"]\nseverity = \"ERROR\"\n",
    )
    .unwrap();
    let (code, stdout, _) = stdout_of(
        tblint(tmp.path())
            .arg("list-rules")
            .args(["--linter", "naturaldocs"]),
    );
    assert_eq!(code, Some(0));
    let var_line = stdout
        .lines()
        .find(|l| l.starts_with("[ND_VAR_MISS]"))
        .unwrap();
    assert!(var_line.contains("ERROR*"));
    assert!(!stdout.contains("[VB_SYNTAX_ERROR]"));
}

#[test]
fn check_without_files_fails() {
    let tmp = TempDir::new().unwrap();
    let (code, _, stderr) = stdout_of(tblint(tmp.path()).arg("check"));
    assert_eq!(code, Some(1));
    assert!(stderr.contains("no files specified"));
}

#[test]
fn positional_file_list_is_rejected_with_hint() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("files.txt"), "# sources\ntop.sv\n").unwrap();
    let (code, _, stderr) = stdout_of(tblint(tmp.path()).args(["check", "files.txt"]));
    assert_eq!(code, Some(1));
    assert!(stderr.contains("tblint check -f files.txt"));
}

#[test]
fn unknown_linter_is_an_error() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("top.sv"), "module top;\nendmodule\n").unwrap();
    let (code, _, stderr) =
        stdout_of(tblint(tmp.path()).args(["check", "top.sv", "--linter", "spyglass"]));
    assert_eq!(code, Some(1));
    assert!(stderr.contains("unknown linter 'spyglass'"));
}

#[test]
fn malformed_config_exits_with_status_two() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("tblint.toml"), "[global\nstrict_mode = true\n").unwrap();
    fs::write(tmp.path().join("top.sv"), "module top;\nendmodule\n").unwrap();
    let (code, stdout, stderr) = stdout_of(tblint(tmp.path()).args(["check", "top.sv"]));
    assert_eq!(code, Some(2));
    assert!(stdout.is_empty());
    assert!(stderr.contains("malformed configuration"));
}

#[test]
fn missing_tools_are_reported_not_fatal() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("top.sv"), "module top;\nendmodule\n").unwrap();
    let (code, stdout, _) =
        stdout_of(tblint(tmp.path()).args(["check", "top.sv", "--format", "json"]));
    assert_eq!(code, Some(0));

    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    for linter in ["naturaldocs", "verible"] {
        let unavailable = json["linters"][linter]["unavailable"].as_str().unwrap();
        assert!(unavailable.contains("not found"), "{linter}: {unavailable}");
    }
    assert_eq!(json["summary"]["passed"], true);
}

#[test]
fn init_writes_template() {
    let tmp = TempDir::new().unwrap();
    let (code, stdout, _) = stdout_of(tblint(tmp.path()).arg("init"));
    assert_eq!(code, Some(0));
    assert!(stdout.contains("Created tblint.toml"));
    assert!(tmp.path().join("tblint.toml").is_file());

    let (code, _, stderr) = stdout_of(tblint(tmp.path()).arg("init"));
    assert_eq!(code, Some(1));
    assert!(stderr.contains("--force"));
}

#[cfg(unix)]
#[test]
fn naturaldocs_runs_with_stand_in_parser() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = TempDir::new().unwrap();
    let bin = tmp.path().join("bin");
    fs::create_dir(&bin).unwrap();
    let exe = bin.join("verible-verilog-syntax");
    fs::write(
        &exe,
        concat!(
            "#!/bin/sh\n",
            "echo '{\"top.sv\": {\"tree\": {\"tag\": \"kDescriptionList\", \"children\": [",
            "{\"tag\": \"kClassDeclaration\", \"children\": [",
            "{\"tag\": \"kClassHeader\", \"children\": [",
            "{\"tag\": \"class\", \"start\": 16, \"end\": 21},",
            "{\"tag\": \"SymbolIdentifier\", \"start\": 22, \"end\": 23}]},",
            "{\"tag\": \"endclass\", \"start\": 25, \"end\": 33}]}]}}}'\n",
        ),
    )
    .unwrap();
    let mut perms = fs::metadata(&exe).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&exe, perms).unwrap();

    fs::write(tmp.path().join("top.sv"), "// File: top.sv\nclass c;\nendclass\n").unwrap();

    let (code, stdout, stderr) = stdout_of(
        tblint(tmp.path())
            .env("PATH", &bin)
            .args(["check", "top.sv", "--linter", "naturaldocs", "--format", "compact"]),
    );
    assert_eq!(code, Some(1), "stderr: {stderr}");
    assert_eq!(
        stdout,
        "top.sv:1:0: ERROR [ND_GUARD_MISS] Missing include guard (`ifndef TOP_SV / `define TOP_SV / `endif)\n\
         top.sv:2:0: ERROR [ND_CLASS_MISS] Class 'c' without 'Class:' documentation\n"
    );
}
