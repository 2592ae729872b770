use assert_cmd::Command;
use predicates::str::contains;

#[test]
fn wpr_help_works() {
    Command::cargo_bin("wpr")
        .expect("binary")
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("Weekly Plans and Reports"));
}

#[test]
fn subcommand_help_works() {
    let subcommands = [
        "weekly",
        "today",
        "daily",
        "memo",
        "set-memo",
        "add",
        "complete",
        "summary",
        "groups",
        "copy-from-the-past",
    ];

    for cmd in subcommands {
        Command::cargo_bin("wpr")
            .expect("binary")
            .arg(cmd)
            .arg("--help")
            .assert()
            .success();
    }
}

#[test]
fn date_and_previous_week_conflict() {
    Command::cargo_bin("wpr")
        .expect("binary")
        .args(["--date", "2011-01-26", "--previous-week", "weekly"])
        .assert()
        .failure()
        .stderr(contains("cannot be used with"));
}
