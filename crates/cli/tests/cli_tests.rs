// End-to-end tests for the mafm binary: exit codes, stdout JSON contract,
// and files written.
//
// Run with: cargo test -p mafile-cli --test cli_tests -- --nocapture

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

/// A scratch workspace with its own (absent) settings file so the user's
/// config never leaks into a test.
fn mafm(dir: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_mafm"));
    cmd.current_dir(dir.path());
    cmd.env("MAFM_SETTINGS", dir.path().join("settings.json"));
    cmd.env_remove("RUST_LOG");
    cmd
}

fn write(path: &Path, body: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, body).unwrap();
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn single_json(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(stdout.trim())
        .unwrap_or_else(|e| panic!("stdout must be one JSON value: {e}\n{stdout}"))
}

// ===========================================================================
// mafm asf
// ===========================================================================

#[test]
fn asf_exports_matched_pairs() {
    let dir = TempDir::new().unwrap();
    write(&dir.path().join("in/alice.maFile"), r#"{"account_name":"alice","shared_secret":"s1"}"#);
    write(
        &dir.path().join("in/76561197960287930.maFile"),
        r#"{"Session":{"SteamID":76561197960287930}}"#,
    );
    write(&dir.path().join("roster.txt"), "alice:pw1\n60287930:pw2\n");

    let output = mafm(&dir)
        .args(["asf", "--mafiles", "in", "--roster", "roster.txt", "--output", "out", "--json", "-q"])
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let report = single_json(&output);
    assert_eq!(report["success_count"], 2);
    assert_eq!(report["total"], 2);
    assert!(report["failures"].as_array().unwrap().is_empty());
    assert!(!stdout_contains(&output, "pw1"), "passwords must not reach stdout");

    let config: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("out/alice.json")).unwrap()).unwrap();
    assert_eq!(config["SteamLogin"], "alice");
    assert_eq!(config["SteamPassword"], "pw1");
    assert!(dir.path().join("out/76561197960287930.maFile").is_file());
    assert!(dir.path().join("out/76561197960287930.json").is_file());
}

fn stdout_contains(output: &Output, needle: &str) -> bool {
    String::from_utf8_lossy(&output.stdout).contains(needle)
}

#[test]
fn asf_blank_roster_exits_3() {
    let dir = TempDir::new().unwrap();
    write(&dir.path().join("a.maFile"), r#"{"account_name":"a"}"#);
    write(&dir.path().join("roster.txt"), "\n   \nno-delimiter\n");

    let output = mafm(&dir)
        .args(["asf", "--mafiles", "a.maFile", "--roster", "roster.txt", "--output", "out"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("hint:"));
    assert!(!dir.path().join("out").exists(), "output folder must not be created");
}

#[test]
fn asf_with_too_few_logins_exits_4() {
    let dir = TempDir::new().unwrap();
    write(&dir.path().join("in/x.maFile"), r#"{"account_name":"x"}"#);
    write(&dir.path().join("in/y.maFile"), r#"{"account_name":"y"}"#);
    write(&dir.path().join("roster.txt"), "other:pw\n");

    let output = mafm(&dir)
        .args(["asf", "--mafiles", "in", "--roster", "roster.txt", "--output", "out"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(4), "stderr: {}", stderr(&output));
    let err = stderr(&output);
    assert!(err.contains("auto-assigned"), "stderr: {err}");
    assert!(err.contains("insufficient logins"), "stderr: {err}");
}

#[test]
fn asf_uses_settings_output_dir_and_template() {
    let dir = TempDir::new().unwrap();
    write(
        &dir.path().join("settings.json"),
        r#"{
    // test settings
    "asf.outputDir": "from_settings",
    "asf.onlineStatus": 1
}"#,
    );
    write(&dir.path().join("a.maFile"), r#"{"account_name":"a"}"#);
    write(&dir.path().join("roster.txt"), "a;pw\n");

    let output = mafm(&dir)
        .args(["asf", "--mafiles", "a.maFile", "--roster", "roster.txt", "-q"])
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let config: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(dir.path().join("from_settings/a.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(config["OnlineStatus"], 1);
}

#[test]
fn asf_missing_roster_is_io_error() {
    let dir = TempDir::new().unwrap();
    write(&dir.path().join("a.maFile"), "{}");

    let output = mafm(&dir)
        .args(["asf", "--mafiles", "a.maFile", "--roster", "nope.txt"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(5));
}

#[test]
fn asf_missing_mafiles_flag_is_usage_error() {
    let dir = TempDir::new().unwrap();
    let output = mafm(&dir).args(["asf", "--roster", "r.txt"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}

// ===========================================================================
// mafm trim / list
// ===========================================================================

#[test]
fn trim_fsm_writes_short_files() {
    let dir = TempDir::new().unwrap();
    write(
        &dir.path().join("in/one.maFile"),
        r#"{"shared_secret":"s","account_name":"bob","Session":{"SteamID":"765"}}"#,
    );

    let output = mafm(&dir)
        .args(["trim", "in", "--mode", "fsm", "--json", "-q"])
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let report = single_json(&output);
    assert_eq!(report["mode"], "fsm");
    assert_eq!(report["processed"], 1);

    let text = fs::read_to_string(dir.path().join("in/shortmaffsmpanel/bob.maFile")).unwrap();
    assert_eq!(
        text,
        "{\n  \"shared_secret\": \"s\",\n  \"account_name\": \"bob\",\n  \"Session\": {\n    \"SteamID\": \"765\"\n  }\n}"
    );
}

#[test]
fn trim_skips_exit_4() {
    let dir = TempDir::new().unwrap();
    write(&dir.path().join("in/one.maFile"), r#"{"shared_secret":"s"}"#);

    let output = mafm(&dir)
        .args(["trim", "in", "--mode", "full", "--output", "copies"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).contains("no account_name"));
    assert!(dir.path().join("in/copies").is_dir());
}

#[test]
fn trim_missing_folder_is_usage_error() {
    let dir = TempDir::new().unwrap();
    let output = mafm(&dir).args(["trim", "nope", "--mode", "dm"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn list_json_shape() {
    let dir = TempDir::new().unwrap();
    write(&dir.path().join("in/b.maFile"), "{}");
    write(&dir.path().join("in/a.MAFILES"), "{}");
    write(&dir.path().join("in/readme.txt"), "");

    let output = mafm(&dir).args(["list", "in", "--json"]).output().unwrap();

    assert!(output.status.success());
    let val = single_json(&output);
    assert_eq!(val["count"], 2);
    assert_eq!(val["mafiles"], serde_json::json!(["a.MAFILES", "b.maFile"]));
}

// ===========================================================================
// mafm settings
// ===========================================================================

#[test]
fn settings_init_then_show() {
    let dir = TempDir::new().unwrap();

    let output = mafm(&dir).args(["settings", "init"]).output().unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(fs::read_to_string(dir.path().join("settings.json")).unwrap().contains("//"));

    let again = mafm(&dir).args(["settings", "init"]).output().unwrap();
    assert_eq!(again.status.code(), Some(5));

    let show = mafm(&dir).args(["settings", "show"]).output().unwrap();
    let val = single_json(&show);
    assert_eq!(val["asf.outputDir"], "ASFmaFiles");
    assert_eq!(val["trim.dmDir"], "shortmafdmpanel");
}

#[test]
fn settings_path_honors_override() {
    let dir = TempDir::new().unwrap();
    let output = mafm(&dir).args(["settings", "path"]).output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(Path::new(stdout.trim()), dir.path().join("settings.json"));
}
