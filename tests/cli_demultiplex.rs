use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::path::PathBuf;
use std::process::Command;

fn sharedir() -> PathBuf { sequana_demultiplex::utils::sharedir() }

fn demultiplex_cmd(working_directory: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("sequana_pipelines_demultiplex").expect("binary exists");
    cmd.arg("--bcl-directory").arg(sharedir())
        .arg("--run-mode").arg("local")
        .arg("--working-directory").arg(working_directory);
    cmd
}

#[test]
fn standalone_subprocess_prepares_working_directory() {
    let temp = assert_fs::TempDir::new().unwrap();
    let wd = temp.path().join("test");
    std::fs::create_dir(&wd).expect("create working directory");

    let mut cmd = demultiplex_cmd(&wd);
    cmd.arg("--force");

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Successfully prepared"));

    for file in ["config.yaml", "demultiplex.rules", "demultiplex.sh", "SampleSheet.csv", ".sequana/info.json"] {
        assert!(wd.join(file).is_file(), "{} missing", file);
    }

    let config = std::fs::read_to_string(wd.join("config.yaml")).expect("read config");
    assert!(config.contains(&sharedir().display().to_string()), "config does not point to the BCL directory");

    let launcher = std::fs::read_to_string(wd.join("demultiplex.sh")).expect("read launcher");
    assert!(launcher.contains("snakemake -s demultiplex.rules --cores 4"));
}

#[test]
fn rerun_with_force_overwrites() {
    let temp = assert_fs::TempDir::new().unwrap();
    let wd = temp.path().join("test");

    demultiplex_cmd(&wd).assert().success();
    let mut cmd = demultiplex_cmd(&wd);
    cmd.arg("--force");
    cmd.assert().success();

    assert!(wd.join("config.yaml").is_file());
}

#[test]
fn rerun_without_force_is_refused() {
    let temp = assert_fs::TempDir::new().unwrap();
    let wd = temp.path().join("test");

    demultiplex_cmd(&wd).assert().success();
    demultiplex_cmd(&wd)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("--force"));
}

#[test]
fn missing_bcl_directory_fails() {
    let temp = assert_fs::TempDir::new().unwrap();
    let wd = temp.path().join("test");

    let mut cmd = Command::cargo_bin("sequana_pipelines_demultiplex").expect("binary exists");
    cmd.arg("--bcl-directory").arg(temp.path().join("no_such_run"))
        .arg("--working-directory").arg(&wd);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("BCL directory does not exist"));
    assert!(!wd.exists(), "working directory created for an invalid run");
}

#[test]
fn slurm_launcher_submits_jobs() {
    let temp = assert_fs::TempDir::new().unwrap();
    let wd = temp.path().join("test");

    let mut cmd = Command::cargo_bin("sequana_pipelines_demultiplex").expect("binary exists");
    cmd.arg("--bcl-directory").arg(sharedir())
        .arg("--run-mode").arg("slurm")
        .arg("--working-directory").arg(&wd)
        .arg("--merging-strategy").arg("none");

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("sbatch demultiplex.sh"));

    let launcher = std::fs::read_to_string(wd.join("demultiplex.sh")).expect("read launcher");
    assert!(launcher.contains("--jobs 40"));
    assert!(launcher.contains("sbatch"));

    let config = std::fs::read_to_string(wd.join("config.yaml")).expect("read config");
    assert!(config.contains("merge_all_lanes: false"));
}
