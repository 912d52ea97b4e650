use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

struct CliTestEnv {
    _temp_dir: TempDir,
    home: PathBuf,
    xdg_data: PathBuf,
    xdg_config: PathBuf,
    xdg_state: PathBuf,
}

impl CliTestEnv {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let base = temp_dir.path().to_path_buf();
        let home = base.join("home");
        let xdg_data = base.join("xdg-data");
        let xdg_config = base.join("xdg-config");
        let xdg_state = base.join("xdg-state");

        fs::create_dir_all(&home).expect("failed to create HOME");
        fs::create_dir_all(&xdg_data).expect("failed to create XDG_DATA_HOME");
        fs::create_dir_all(&xdg_config).expect("failed to create XDG_CONFIG_HOME");
        fs::create_dir_all(&xdg_state).expect("failed to create XDG_STATE_HOME");

        Self {
            _temp_dir: temp_dir,
            home,
            xdg_data,
            xdg_config,
            xdg_state,
        }
    }
}

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/session.jsonl")
}

fn run_retrace(env: &CliTestEnv, args: &[&str]) -> Output {
    let bin_path = PathBuf::from(assert_cmd::cargo::cargo_bin!("retrace"));

    Command::new(bin_path)
        .args(args)
        .env("HOME", &env.home)
        .env("XDG_DATA_HOME", &env.xdg_data)
        .env("XDG_CONFIG_HOME", &env.xdg_config)
        .env("XDG_STATE_HOME", &env.xdg_state)
        .output()
        .unwrap_or_else(|e| panic!("failed to execute retrace: {e}"))
}

fn assert_success(args: &[&str], output: &Output) {
    if output.status.success() {
        return;
    }

    let rendered_args = args
        .iter()
        .map(|arg| OsString::from(arg).to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    panic!(
        "retrace {rendered_args} failed\nstatus: {}\nstdout:\n{}\nstderr:\n{}",
        output.status, stdout, stderr
    );
}

#[test]
fn import_then_list_and_reconstruct() {
    let env = CliTestEnv::new();
    let fixture = fixture_path();
    let fixture_arg = fixture.to_str().expect("fixture path utf-8");

    // Import the fixture; one deliberately malformed line must be skipped
    // without failing the import.
    let import_args = ["import", "alice", fixture_arg];
    let import = run_retrace(&env, &import_args);
    assert_success(&import_args, &import);
    let import_stdout = String::from_utf8_lossy(&import.stdout);
    assert!(import_stdout.contains("Imported 8 record(s)"));
    assert!(import_stdout.contains("Skipped 1 malformed line(s)"));

    let db_path = env.xdg_data.join("retrace/events.db");
    assert!(
        db_path.exists(),
        "store file should exist at {}",
        db_path.display()
    );

    // Listing shows the session with its task label.
    let sessions_args = ["sessions", "alice"];
    let sessions = run_retrace(&env, &sessions_args);
    assert_success(&sessions_args, &sessions);
    let sessions_stdout = String::from_utf8_lossy(&sessions.stdout);
    assert!(sessions_stdout.contains("session-001"));
    assert!(sessions_stdout.contains("Book a flight"));

    // Reconstruction collapses both low-signal runs and narrates the clicks.
    let timeline_args = ["timeline", "alice", "session-001"];
    let timeline = run_retrace(&env, &timeline_args);
    assert_success(&timeline_args, &timeline);
    let timeline_stdout = String::from_utf8_lossy(&timeline.stdout);
    assert!(timeline_stdout.contains("Click on Login at the top left of the page"));
    assert!(timeline_stdout.contains("Click on Submit at the bottom right of the page"));
    assert!(timeline_stdout.contains("Replay events: 6"));
}

#[test]
fn timeline_json_emits_frames_and_narrative() {
    let env = CliTestEnv::new();
    let fixture = fixture_path();
    let fixture_arg = fixture.to_str().expect("fixture path utf-8");

    let import_args = ["import", "alice", fixture_arg];
    let import = run_retrace(&env, &import_args);
    assert_success(&import_args, &import);

    let json_args = ["timeline", "alice", "session-001", "--json"];
    let output = run_retrace(&env, &json_args);
    assert_success(&json_args, &output);

    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("timeline --json should emit valid JSON");

    let events = parsed["events"].as_array().expect("events array");
    assert_eq!(events.len(), 6);
    assert_eq!(events[0]["event_type"], "open");
    assert_eq!(events[2]["event_type"], "click");
    assert_eq!(events[2]["text_content"], "Login");
    assert_eq!(events[2]["offset_x"], 10);
    assert_eq!(events[2]["doc_id"], "doc-1");

    let narrative = parsed["narrative"].as_array().expect("narrative array");
    assert_eq!(narrative.len(), 2);
}

#[test]
fn listing_unknown_user_is_empty_not_error() {
    let env = CliTestEnv::new();

    let args = ["sessions", "nobody"];
    let output = run_retrace(&env, &args);
    assert_success(&args, &output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No recorded sessions for nobody"));
}
