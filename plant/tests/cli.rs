use assert_cmd::Command;

#[test]
fn binary_runs() {
    let mut cmd = Command::cargo_bin("plant").unwrap();
    cmd.arg("--help").assert().success();
}

#[test]
fn every_participant_has_help() {
    for sub in ["broker", "sensor", "mood", "chat", "display", "publish"] {
        Command::cargo_bin("plant")
            .unwrap()
            .args([sub, "--help"])
            .assert()
            .success();
    }
}

#[test]
fn publish_rejects_bad_json() {
    Command::cargo_bin("plant")
        .unwrap()
        .args(["publish", "chat.request", "{not json"])
        .assert()
        .failure();
}
