use std::{
    fs,
    path::Path,
    process::{Command, Output},
};

use serde_json::{json, Value};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_math-maze"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to launch math-maze")
}

fn generate(args: &[&str]) -> Value {
    let mut all = vec!["generate"];
    all.extend_from_slice(args);
    let output = run(&all);
    assert!(
        output.status.success(),
        "generate failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is json")
}

fn write(dir: &Path, name: &str, value: &Value) -> String {
    let path = dir.join(name);
    fs::write(&path, serde_json::to_vec(value).expect("serialize")).expect("write file");
    path.to_str().expect("utf-8 path").to_owned()
}

#[test]
fn generate_prints_a_seeded_maze() {
    let args = ["--width", "13", "--height", "11", "--seed", "7", "--operation", "DIVISION"];
    let maze = generate(&args);

    assert_eq!(maze["width"], 13);
    assert_eq!(maze["height"], 11);
    assert_eq!(maze["operation"], "DIVISION");
    assert_eq!(maze["path"][0], json!([0, 0]));

    let expressions = maze["expressions"].as_array().expect("rows");
    assert_eq!(expressions.len(), 11);
    assert_eq!(expressions[0].as_array().expect("row").len(), 13);
    assert_eq!(expressions[0][0], "");
    let endpoint = &maze["endpoint"];
    let (x, y) = (
        endpoint[0].as_u64().expect("x") as usize,
        endpoint[1].as_u64().expect("y") as usize,
    );
    assert_eq!(expressions[y][x], "");
    assert!(expressions[0][1].as_str().expect("expression").contains('/'));

    assert_eq!(generate(&args), maze);
}

#[test]
fn invalid_requests_are_rejected() {
    let output = run(&["generate", "--width", "12"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid maze request"), "{stderr}");

    let output = run(&["generate", "--operation", "MULTIPLICATION", "--numbers-end", "100"]);
    assert!(!output.status.success());
}

#[test]
fn requested_expressions_are_placed() {
    let dir = tempfile::tempdir().expect("temp dir");
    let must_include = write(dir.path(), "must_include.json", &json!(["7 + 8"]));
    let maze = generate(&[
        "--seed",
        "3",
        "--numbers-end",
        "20",
        "--path-type-even",
        "false",
        "--must-include",
        &must_include,
    ]);

    let placed = maze["expressions"]
        .as_array()
        .expect("rows")
        .iter()
        .flat_map(|row| row.as_array().expect("row").iter())
        .any(|expression| expression == "7 + 8");
    assert!(placed);
}

#[test]
fn incompatible_expressions_are_rejected() {
    let dir = tempfile::tempdir().expect("temp dir");
    let must_include = write(dir.path(), "must_include.json", &json!(["3 - 9"]));
    let output = run(&[
        "generate",
        "--operation",
        "SUBTRACTION",
        "--must-include",
        &must_include,
    ]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid maze request"), "{stderr}");
}

#[test]
fn zero_deadline_fails_generation() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = dir.path().join("settings.toml");
    fs::write(&config, "[generation]\ndeadline_ms = 0\n").expect("write settings");

    let output = run(&["generate", "--config", config.to_str().expect("utf-8 path")]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("maze generation failed"), "{stderr}");
}

#[test]
fn check_grades_a_solution() {
    let dir = tempfile::tempdir().expect("temp dir");
    let maze = generate(&["--seed", "11"]);
    let maze_path = write(dir.path(), "maze.json", &maze);

    let mut answers = vec![vec![Value::Null; 11]; 11];
    answers[0][1] = json!(-1);
    let solution = json!({ "answers": answers, "path": maze["path"] });
    let answers_path = write(dir.path(), "solution.json", &solution);

    let output = run(&["check", "--maze", &maze_path, "--answers", &answers_path]);
    assert!(
        output.status.success(),
        "check failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let assessment: Value = serde_json::from_slice(&output.stdout).expect("stdout is json");

    let path_length = maze["path"].as_array().expect("path").len() as u64;
    assert_eq!(assessment["summary"]["correct"], 0);
    assert_eq!(assessment["summary"]["incorrect"], 1);
    assert_eq!(assessment["summary"]["correctPath"], path_length - 2);
    assert_eq!(assessment["summary"]["wrongPath"], 0);
    assert_eq!(assessment["summary"]["missedPath"], 0);
    assert_eq!(assessment["incorrect"], json!([maze["expressions"][0][1]]));
}
