use assert_cmd::Command;
use serde_json::{json, Value};

/// The binary with a scratch HOME and a Terraform directory that does not exist.
fn tfinventory(home: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("tfinventory").unwrap();
    cmd.env("HOME", home.path())
        .env("TERRAFORM_DIR", home.path().join("terraform"))
        .env_remove("RUST_LOG");
    cmd
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn list_without_terraform_dir() {
    let home = tempfile::tempdir().unwrap();
    let assert = tfinventory(&home).arg("--list").assert().success();

    assert_eq!(
        String::from_utf8_lossy(&assert.get_output().stdout),
        "{\"_meta\": {\"hostvars\": {}}, \"vms\": {\"hosts\": []}, \"all\": {\"children\": [\"vms\"]}}\n"
    );
}

#[test]
fn host_lookup_is_empty() {
    let home = tempfile::tempdir().unwrap();
    let assert = tfinventory(&home).arg("--host=web1").assert().success();

    assert_eq!(stdout_json(assert.get_output()), json!({}));
}

#[test]
fn no_arguments_prints_usage() {
    let home = tempfile::tempdir().unwrap();
    let assert = tfinventory(&home).assert().failure().code(1);

    assert!(!assert.get_output().stderr.is_empty());
    assert!(assert.get_output().stdout.is_empty());
}

#[test]
fn help_goes_to_stderr() {
    let home = tempfile::tempdir().unwrap();
    let assert = tfinventory(&home).arg("--help").assert().failure().code(1);

    assert!(!assert.get_output().stderr.is_empty());
    assert!(assert.get_output().stdout.is_empty());
}

#[test]
fn unknown_flag_prints_usage() {
    let home = tempfile::tempdir().unwrap();
    let assert = tfinventory(&home).arg("--refresh").assert().failure().code(1);

    assert!(!assert.get_output().stderr.is_empty());
}

#[cfg(unix)]
#[test]
fn failing_terraform_gives_empty_inventory() {
    let home = tempfile::tempdir().unwrap();
    std::fs::create_dir(home.path().join("terraform")).unwrap();
    let config = home.path().join("config.yml");
    std::fs::write(&config, "terraform_bin: \"false\"\n").unwrap();

    let assert = tfinventory(&home)
        .arg("--list")
        .arg("--config")
        .arg(&config)
        .assert()
        .success();

    assert_eq!(stdout_json(assert.get_output())["vms"]["hosts"], json!([]));
}

const OUTPUTS: &str = r#"{
  "vms": {
    "sensitive": false,
    "type": ["map", ["object", {"ansible_host": "string", "ssh_user": "string"}]],
    "value": {
      "zeta": {"ansible_host": "10.0.0.9", "ssh_user": "ubuntu"},
      "alpha": {"ansible_host": "10.0.0.2", "ssh_user": "root"},
      "mid": {"ansible_host": "<pending>"}
    }
  }
}"#;

#[cfg(unix)]
#[test]
fn list_reads_terraform_outputs() {
    let home = tempfile::tempdir().unwrap();
    let tf_dir = home.path().join("terraform");
    std::fs::create_dir(&tf_dir).unwrap();
    // With `sh` as the binary, `sh output -json` runs the script named `output`
    // in the Terraform directory.
    std::fs::write(tf_dir.join("output"), format!("cat <<'JSON'\n{OUTPUTS}\nJSON\n")).unwrap();
    let config = home.path().join("config.yml");
    std::fs::write(&config, "terraform_bin: sh\n").unwrap();

    let assert = tfinventory(&home)
        .arg("--list")
        .arg("--config")
        .arg(&config)
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert!(stdout.starts_with("{\n  \"_meta\""));

    let inv = stdout_json(assert.get_output());
    assert_eq!(inv["vms"]["hosts"], json!(["zeta", "alpha", "mid"]));
    assert_eq!(inv["vms"]["vars"]["ansible_user"], "ubuntu");
    assert_eq!(
        inv["_meta"]["hostvars"]["alpha"],
        json!({
            "ansible_host": "10.0.0.2",
            "ansible_user": "root",
            "ansible_port": 22,
            "ansible_ssh_common_args": "-o StrictHostKeyChecking=accept-new"
        })
    );
    let mid = &inv["_meta"]["hostvars"]["mid"];
    assert_eq!(mid["ansible_host"], "mid");
    assert_eq!(mid["ansible_user"], "admin");
    assert!(mid["_note"].is_string());
    assert!(inv["_meta"]["hostvars"]["zeta"].get("_note").is_none());
}
