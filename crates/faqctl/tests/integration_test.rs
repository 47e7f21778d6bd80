//! Integration tests for the faqctl binary

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

/// Data dir with three entries and a config file pointing at it.
fn fixture() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("questions.txt"),
        "When was he born?\nWhat were his most famous fights?\nHow many fights did he win?\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("answers.txt"),
        "1942\nThe Rumble in the Jungle.\n56 wins.\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("fuzzy_regex.txt"),
        "when was (he )?born\ntell me about his fights\ntell me about\n",
    )
    .unwrap();

    let config = dir.path().join("config.toml");
    fs::write(
        &config,
        format!(
            "[data]\ndir = {:?}\n\n[log]\nlevel = \"warn\"\n",
            dir.path().display().to_string()
        ),
    )
    .unwrap();
    (dir, config)
}

fn faqctl(config: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_faqctl"));
    cmd.arg("--config").arg(config).args(args).env("NO_COLOR", "1");
    cmd
}

fn chat(config: &Path, input: &str) -> Output {
    let mut child = faqctl(config, &["chat"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

#[test]
fn test_version_flag() {
    let output = Command::new(env!("CARGO_BIN_EXE_faqctl"))
        .arg("--version")
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("faqctl"));
}

#[test]
fn test_check_reports_entries() {
    let (_dir, config) = fixture();
    let output = faqctl(&config, &["check"]).output().unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("3 entries loaded"));
}

#[test]
fn test_check_fails_on_mismatched_files() {
    let (dir, config) = fixture();
    fs::write(dir.path().join("answers.txt"), "1942\n").unwrap();

    let output = faqctl(&config, &["check"]).output().unwrap();
    assert_eq!(output.status.code(), Some(65));
    assert!(String::from_utf8_lossy(&output.stderr).contains("[ERROR]"));
}

#[test]
fn test_missing_config_exits_with_config_code() {
    let dir = TempDir::new().unwrap();
    let output = faqctl(&dir.path().join("nope.toml"), &["check"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(78));
}

#[test]
fn test_ask_plain() {
    let (_dir, config) = fixture();
    let output = faqctl(&config, &["ask", "When", "was", "he", "born?"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "1942\n");
}

#[test]
fn test_ask_json() {
    let (_dir, config) = fixture();
    let output = faqctl(&config, &["ask", "tell", "me", "about", "his", "fights", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["kind"]["kind"], "clarify");
    assert_eq!(value["terminate"], false);
    assert_eq!(value["lines"].as_array().unwrap().len(), 4);
}

#[test]
fn test_chat_session() {
    let (_dir, config) = fixture();
    let output = chat(&config, "tell me about his fights\n2\nbye\n");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Hello! I know stuff about Muhammad Ali."));
    assert!(stdout.contains("2. How many fights did he win?"));
    assert!(stdout.contains(">>> 56 wins.\n"));
    assert!(stdout.contains("Goodbye!"));
}

#[test]
fn test_data_dir_flag_overrides_config() {
    let (dir, config) = fixture();
    let other = TempDir::new().unwrap();
    for name in ["questions.txt", "answers.txt", "fuzzy_regex.txt"] {
        fs::copy(dir.path().join(name), other.path().join(name)).unwrap();
    }
    fs::write(other.path().join("answers.txt"), "1943\nx\ny\n").unwrap();

    let output = faqctl(
        &config,
        &[
            "--data-dir",
            other.path().to_str().unwrap(),
            "ask",
            "when",
            "was",
            "he",
            "born",
        ],
    )
    .output()
    .unwrap();
    assert_eq!(String::from_utf8_lossy(&output.stdout), "1943\n");
}
