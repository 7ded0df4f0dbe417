use assert_cmd::Command;

#[test]
fn hash_password_prints_a_verifiable_hash() {
    let output = Command::cargo_bin("shelf-cli")
        .unwrap()
        .args(["hash-password", "potter", "--cost", "4"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let hash = stdout.trim();
    assert!(hash.starts_with("$2b$04$"), "unexpected hash: {hash}");
    assert!(bcrypt::verify("potter", hash).unwrap());
}

#[test]
fn rejects_unknown_subcommand() {
    Command::cargo_bin("shelf-cli")
        .unwrap()
        .arg("migrate")
        .assert()
        .failure();
}
