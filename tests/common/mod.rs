#![allow(dead_code)]

use assert_cmd::Command;

/// A command with every config-bearing environment variable cleared, so
/// tests see deterministic behavior regardless of the host environment.
pub fn cmd() -> Command {
    let mut command = Command::cargo_bin("org-admin").expect("org-admin binary");
    for var in [
        "ORG_ADMIN_KEY",
        "ORG_ADMIN_API_URL",
        "ORG_ADMIN_CONFIG_DIR",
        "MATTERMOST_BOT_TOKEN",
        "MATTERMOST_BOT_ID",
        "MATTERMOST_BASE_URL",
        "MAIL_HOST",
        "MAIL_PORT",
        "MAIL_USERNAME",
        "MAIL_PASSWORD",
        "MAIL_FROM_EMAIL",
        "MAIL_FROM_NAME",
    ] {
        command.env_remove(var);
    }
    command
}

/// Same, but with dummy API credentials pointing at a closed local port, so
/// commands pass configuration validation and fail only if they actually
/// try to reach the network.
pub fn cmd_with_creds() -> Command {
    let mut command = cmd();
    command.env("ORG_ADMIN_KEY", "test-admin-key");
    command.env("ORG_ADMIN_API_URL", "http://127.0.0.1:9/v1/organization");
    command
}
