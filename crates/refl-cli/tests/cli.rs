use std::fs;
use std::process::Command;

use tempfile::tempdir;

fn refl() -> Command {
    Command::new(env!("CARGO_BIN_EXE_refl"))
}

#[test]
fn fisher_prints_summary_json() {
    let output = refl()
        .args([
            "fisher",
            "--sample",
            "YIG_sample",
            "--at",
            "0.5:20:20",
            "--at",
            "2.0:20:80",
        ])
        .output()
        .expect("run refl");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    let params = summary["parameters"].as_array().expect("parameters");
    assert!(params.iter().any(|p| p == "Pt Magnetic SLD"));
    assert_eq!(
        summary["eigenvalues"].as_array().expect("eigenvalues").len(),
        params.len()
    );
}

#[test]
fn plan_writes_report_and_figures() {
    let dir = tempdir().expect("tempdir");
    let plan_path = dir.path().join("plan.yaml");
    fs::write(
        &plan_path,
        r#"
name: smoke
seed: 3
studies:
  - type: angles
    sample: simple_sample
    angles: [0.3, 0.7, 2.0]
    points: 20
    time: 10
"#,
    )
    .expect("write plan");
    let out = dir.path().join("out");
    let output = refl()
        .args(["plan", "--plan"])
        .arg(&plan_path)
        .arg("--out")
        .arg(&out)
        .output()
        .expect("run refl");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(out.join("design_report.json").exists());
    assert!(out.join("plan.yaml").exists());
    assert!(out.join("simple_sample").join("00_angles.svg").exists());
    assert!(out.join("simple_sample").join("00_angles.csv").exists());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("00_angles: best angle"));
}

#[test]
fn unknown_sample_fails() {
    let output = refl()
        .args(["fisher", "--sample", "no_such_sample", "--at", "0.5:20:20"])
        .output()
        .expect("run refl");
    assert!(!output.status.success());
}

#[test]
fn malformed_angle_time_is_rejected() {
    let output = refl()
        .args(["fisher", "--sample", "YIG_sample", "--at", "0.5:20"])
        .output()
        .expect("run refl");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("angle:points:time"));
}

#[test]
fn simulate_writes_data_and_figure() {
    let dir = tempdir().expect("tempdir");
    let output = refl()
        .args([
            "simulate",
            "--sample",
            "YIG_sample",
            "--at",
            "0.5:30:20",
            "--seed",
            "4",
            "--out",
        ])
        .arg(dir.path())
        .output()
        .expect("run refl");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let sample_dir = dir.path().join("YIG_sample");
    assert!(sample_dir.join("data_pp.csv").exists());
    assert!(sample_dir.join("data_mm.csv").exists());
    assert!(sample_dir.join("simulated_data.svg").exists());
    assert!(String::from_utf8_lossy(&output.stdout).contains("log-likelihood"));
}
