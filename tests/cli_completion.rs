mod common;

use common::cmd;
use predicates::prelude::*;

#[test]
fn completion_bash_outputs_script() {
    cmd()
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("org-admin"));
}

#[test]
fn completion_zsh_outputs_script() {
    cmd()
        .args(["completion", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("org-admin"));
}

#[test]
fn completion_rejects_unknown_shell() {
    cmd()
        .args(["completion", "tcsh"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("tcsh"));
}
