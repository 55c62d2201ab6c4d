use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

fn ueli() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("ueli");
    cmd.env("NO_COLOR", "1");
    cmd
}

const CONFIG: &str = r#"
service: svc
repository: git@github.com:flatfox-ag/svc.git
gcloud:
  project: flatfox
  registry: eu.gcr.io
  cluster: main
deployments:
  - name: svc-web
    apply:
      - kubernetes/web-deployment.yaml
      - kubernetes/web-service.yaml
"#;

const DEPLOYMENT: &str = r#"
kind: Deployment
metadata:
  name: svc-web
spec:
  template:
    metadata:
      labels:
        name: svc-web
    spec:
      containers:
        - name: web
          env:
            - name: DB_URL
              valueFrom:
                configMapKeyRef:
                  name: svc-config
                  key: DB_URL
            - name: API_TOKEN
              valueFrom:
                secretKeyRef:
                  name: svc-secret
                  key: API_TOKEN
"#;

const SERVICE: &str = "kind: Service\nmetadata:\n  name: svc-web\n";

fn project(service_name: &str) -> TempDir {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "ueli.yaml", CONFIG);
    std::fs::create_dir(tmp.path().join("kubernetes")).unwrap();
    write(tmp.path(), "kubernetes/web-deployment.yaml", DEPLOYMENT);
    write(
        tmp.path(),
        "kubernetes/web-service.yaml",
        &SERVICE.replace("svc-web", service_name),
    );
    tmp
}

fn write(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).unwrap();
}

// ── Help / Version ──

#[test]
fn shows_help() {
    ueli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Ueli the servant"))
        .stdout(predicate::str::contains("inspect_deployments"))
        .stdout(predicate::str::contains("list_environments"));
}

#[test]
fn shows_version() {
    ueli()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ueli"));
}

// ── Config loading ──

#[test]
fn missing_config_aborts() {
    let tmp = TempDir::new().unwrap();

    ueli()
        .current_dir(tmp.path())
        .arg("inspect_deployments")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No config file 'ueli.yaml' found"));
}

#[test]
fn invalid_config_aborts() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "ueli.yaml", "service: svc\n");

    ueli()
        .current_dir(tmp.path())
        .arg("inspect_deployments")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse"));
}

#[test]
fn config_flag_selects_file() {
    let tmp = project("svc-web");
    std::fs::rename(tmp.path().join("ueli.yaml"), tmp.path().join("other.yaml")).unwrap();

    ueli()
        .current_dir(tmp.path())
        .args(["inspect_deployments", "--config", "other.yaml"])
        .assert()
        .success();
}

// ── inspect_deployments ──

#[test]
fn inspect_clean_plan_lists_keys() {
    let tmp = project("svc-web");

    ueli()
        .current_dir(tmp.path())
        .arg("inspect_deployments")
        .assert()
        .success()
        .stdout(predicate::str::contains("0 wrong namings"))
        .stdout(predicate::str::contains("1 config keys"))
        .stdout(predicate::str::contains("DB_URL"))
        .stdout(predicate::str::contains("1 secret keys"))
        .stdout(predicate::str::contains("API_TOKEN"));
}

#[test]
fn inspect_reports_wrong_naming() {
    let tmp = project("web");

    ueli()
        .current_dir(tmp.path())
        .arg("inspect_deployments")
        .assert()
        .failure()
        .stdout(predicate::str::contains("1 wrong namings"))
        .stdout(predicate::str::contains(
            "kubernetes/web-service.yaml: Name 'web' doesn't start with svc",
        ));
}

// ── Guards that abort before any external command ──

#[test]
fn apply_refuses_unclean_plan() {
    let tmp = project("web");

    ueli()
        .current_dir(tmp.path())
        .args(["apply", "stage1"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("1 wrong namings"))
        .stdout(predicate::str::contains("kubectl").not())
        .stderr(predicate::str::contains("naming problem"));
}

#[test]
fn deploy_non_master_to_production_refused() {
    let tmp = project("svc-web");

    ueli()
        .current_dir(tmp.path())
        .args(["-v", "deploy", "production", "feature-x"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("$ ").not())
        .stderr(predicate::str::contains(
            "Only 'master' can be deployed to 'production'.",
        ));
}
