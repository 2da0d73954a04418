use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn persona(dir: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_persona"));
    cmd.current_dir(dir.path())
        .env("PERSONA_LOG_DIR", dir.path().join("logs"))
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn missing_settings_file_aborts_cleanly() {
    let dir = TempDir::new().unwrap();
    let output = persona(&dir).output().unwrap();

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "Could not find settings.json, cannot continue!\n"
    );
}

#[test]
fn missing_key_is_named_and_nothing_else_happens() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("settings.json"),
        r#"{
            "twitter_handle": "ada",
            "twitter_access_key": "ak",
            "twitter_access_secret": "as",
            "twitter_consumer_key": "ck",
            "twitter_consumer_secret": "cs",
            "watson_pi_username": "user",
            "watson_pi_password": "pass"
        }"#,
    )
    .unwrap();

    let output = persona(&dir).output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout,
        "Settings is missing key: \"watson_pi_url\". Please add it in to continue!\n"
    );
    assert!(!stdout.contains("Number of posts"));
}

#[test]
fn rejected_settings_are_recorded_in_the_log_file() {
    let dir = TempDir::new().unwrap();
    let output = persona(&dir).output().unwrap();
    assert!(output.status.success());

    let log = fs::read_dir(dir.path().join("logs"))
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .find(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with("persona.log."))
        })
        .expect("daily log file");
    let contents = fs::read_to_string(log).unwrap();
    assert!(contents.contains("persona.start"));
    assert!(contents.contains("persona.settings.rejected"));
}

#[test]
fn malformed_settings_get_generic_message() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("custom.json");
    fs::write(&path, "{ nope").unwrap();

    let output = persona(&dir).arg("--settings").arg(&path).output().unwrap();

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "Could not read settings file, make sure it is formatted correctly!\n"
    );
}
