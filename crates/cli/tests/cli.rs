use assert_cmd::Command;

#[test]
fn help_lists_catalog_commands() {
    let mut cmd = Command::cargo_bin("biblio").unwrap();
    let assert = cmd.arg("--help").assert().success();

    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    for subcommand in ["list", "add", "update", "delete", "browse"] {
        assert!(output.contains(subcommand), "missing subcommand {subcommand}");
    }
}

#[test]
fn missing_subcommand_fails() {
    let mut cmd = Command::cargo_bin("biblio").unwrap();
    cmd.assert().failure();
}
