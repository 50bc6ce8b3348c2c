mod common;

use common::{cmd, cmd_with_creds};
use predicates::prelude::*;

#[test]
fn missing_admin_key_is_a_config_error() {
    cmd()
        .args(["users", "list"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("admin key is required"));
}

#[test]
fn missing_api_url_is_a_config_error() {
    cmd()
        .env("ORG_ADMIN_KEY", "test-admin-key")
        .args(["users", "list"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("API base URL is required"));
}

#[test]
fn notify_user_without_channel_is_a_usage_error() {
    cmd()
        .args(["--notify-user", "49", "costs"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("must be given together"));
}

#[test]
fn notify_channel_without_user_is_a_usage_error() {
    cmd()
        .args(["--notify-channel", "email", "costs"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("must be given together"));
}

#[test]
fn rate_limits_set_with_no_changes_is_a_usage_error() {
    cmd_with_creds()
        .args(["rate-limits", "set", "proj_1", "rl_1"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("nothing to update"));
}

#[test]
fn usage_days_and_start_date_conflict() {
    cmd_with_creds()
        .args([
            "usage",
            "completions",
            "--days",
            "7",
            "--start-date",
            "2024-01-01",
        ])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("not both"));
}

#[test]
fn invalid_date_argument_is_rejected() {
    cmd_with_creds()
        .args(["audit", "list", "--start-date", "yesterday"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("expected YYYY-MM-DD"));
}

#[test]
fn json_mode_reports_errors_as_json() {
    cmd()
        .args(["--json", "users", "list"])
        .assert()
        .failure()
        .code(2)
        .stdout(predicate::str::contains("\"code\":\"CONFIG_ERROR\""));
}
