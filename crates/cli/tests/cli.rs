use assert_cmd::Command;

fn tomato() -> Command {
    let mut cmd = Command::cargo_bin("tomato").unwrap();
    cmd.env_remove("MONGODB_URI")
        .env_remove("TOMATO_DATABASE__URI")
        .env_remove("TOMATO_ENV")
        .env("TOMATO_CONFIG_DIR", "/nonexistent/tomato-config")
        .env("RUST_LOG", "error");
    cmd
}

#[test]
fn db_check_without_uri_fails() {
    let output = tomato().args(["db", "check"]).output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Please define the MONGODB_URI environment variable"));
}

#[test]
fn db_check_against_unreachable_server_fails() {
    let output = tomato()
        .args(["db", "check"])
        .env("MONGODB_URI", "mongodb://127.0.0.1:1/?directConnection=true")
        .env("TOMATO_DATABASE__SERVER_SELECTION_TIMEOUT_MS", "300")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn config_show_redacts_the_uri() {
    let output = tomato()
        .args(["config", "show"])
        .env("MONGODB_URI", "mongodb://chef:secret@db:27017/food")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("<redacted>"));
    assert!(!stdout.contains("secret"));
    assert!(stdout.contains("\"environment\": \"local\""));
}
