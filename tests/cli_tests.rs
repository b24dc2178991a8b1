//! Integration tests for the promptbook binary

use std::fs;
use std::io::Write;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

fn promptbook() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_promptbook"));
    // Keep the developer's environment out of the tests
    cmd.env_remove("PROMPTBOOK_TEMPLATES")
        .env_remove("PROMPTBOOK_LOG_LEVEL")
        .env_remove("PROMPTBOOK_LOG_FORMAT")
        .env_remove("RUST_LOG")
        .env("XDG_CONFIG_HOME", "/nonexistent/promptbook-tests");
    cmd
}

fn run(args: &[&str]) -> Output {
    promptbook().args(args).output().expect("Failed to execute binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn template_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("ab.md"), "[A] and [B]\n").unwrap();
    dir
}

#[test]
fn test_render_builtin() {
    let output = run(&["godoc-func", "--var", "code=func Add(a, b int) int"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("func Add(a, b int) int"));
    assert!(text.contains("other Go developers using this package"));
    assert!(!text.contains("+++"));
}

#[test]
fn test_unresolved_placeholder_warns_on_stderr() {
    let dir = template_dir();
    let output = run(&[
        "--templates",
        dir.path().to_str().unwrap(),
        "ab",
        "-V",
        "A=foo",
    ]);

    assert!(output.status.success());
    assert_eq!(stdout(&output), "foo and \n");
    let err = stderr(&output);
    assert!(err.contains("[B]"), "stderr: {}", err);
}

#[test]
fn test_quiet_suppresses_reports() {
    let dir = template_dir();
    let output = run(&[
        "--templates",
        dir.path().to_str().unwrap(),
        "--quiet",
        "ab",
    ]);

    assert!(output.status.success());
    assert_eq!(stdout(&output), " and \n");
    assert!(!stderr(&output).contains("no value for"));
}

#[test]
fn test_unknown_identifier_exits_nonzero_without_output() {
    let output = run(&["does-not-exist"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let err = stderr(&output);
    assert!(err.contains("no template named 'does-not-exist'"));
    assert!(err.contains("Available templates"));
}

#[test]
fn test_unknown_identifier_suggests() {
    let output = run(&["unit-tset"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Did you mean: unit-test?"));
}

#[test]
fn test_invalid_binding_is_usage_error() {
    let output = run(&["unit-test", "--var", "no-equals-sign"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_var_file_and_stdin() {
    let dir = TempDir::new().unwrap();
    let code = dir.path().join("code.go");
    fs::write(&code, "func Sum(xs []int) int\n").unwrap();

    let arg = format!("code={}", code.display());
    let output = run(&["refactor", "--var-file", &arg]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("```go\nfunc Sum(xs []int) int\n```"));

    let mut child = promptbook()
        .args(["refactor", "-F", "code=-"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"func FromStdin()\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    assert!(stdout(&output).contains("func FromStdin()"));
}

#[test]
fn test_var_overrides_var_file() {
    let dir = TempDir::new().unwrap();
    let goal = dir.path().join("goal.txt");
    fs::write(&goal, "from file").unwrap();

    let arg = format!("goal={}", goal.display());
    let output = run(&[
        "refactor",
        "-F",
        &arg,
        "-V",
        "goal=from flag",
        "-V",
        "code=x",
    ]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("improve from flag"));
}

#[test]
fn test_missing_var_file() {
    let output = run(&["refactor", "-F", "code=/definitely/not/here.go"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("/definitely/not/here.go"));
}

#[test]
fn test_list() {
    let output = run(&["--list"]);

    assert!(output.status.success());
    let text = stdout(&output);
    for id in ["code-gen", "godoc-func", "unit-test"] {
        assert!(text.contains(id), "missing {} in {}", id, text);
    }
    let ids: Vec<&str> = text
        .lines()
        .filter_map(|l| l.split_whitespace().next())
        .collect();
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted);
}

#[test]
fn test_describe() {
    let output = run(&["unit-test", "--describe"]);

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.starts_with("unit-test: "));
    assert!(text.contains("code"));
    assert!(text.contains("(required)"));
    assert!(text.contains("(default: \"\")"));
}

#[test]
fn test_describe_requires_id() {
    let output = run(&["--describe"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_syntax_reference() {
    let output = run(&["--syntax"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("FRONT MATTER"));
}

#[test]
fn test_config_file_template_dir() {
    let templates = template_dir();
    let config_dir = TempDir::new().unwrap();
    let config = config_dir.path().join("promptbook.toml");
    fs::write(
        &config,
        format!(
            "[store]\ndir = {:?}\nbuiltin = false\n",
            templates.path().to_str().unwrap()
        ),
    )
    .unwrap();

    let output = run(&["--config", config.to_str().unwrap(), "--list"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output).trim(), "ab");
}

#[test]
fn test_invalid_config_is_usage_error() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("bad.toml");
    fs::write(&config, "[store\n").unwrap();

    let output = run(&["--config", config.to_str().unwrap(), "unit-test"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Error loading configuration"));
}

#[test]
fn test_env_template_dir() {
    let dir = template_dir();
    let output = promptbook()
        .env("PROMPTBOOK_TEMPLATES", dir.path())
        .args(["ab", "-V", "A=1", "-V", "B=2"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(stdout(&output), "1 and 2\n");
}

#[test]
fn test_no_id_prints_intro_and_templates() {
    let output = run(&[]);

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("USAGE:"));
    assert!(text.contains("TEMPLATES:"));
    assert!(text.contains("godoc-func"));
}

#[test]
fn test_templates_flag_overrides_env_and_config() {
    let from_config = TempDir::new().unwrap();
    fs::write(from_config.path().join("config-only.md"), "x").unwrap();
    let from_env = TempDir::new().unwrap();
    fs::write(from_env.path().join("env-only.md"), "x").unwrap();
    let from_flag = TempDir::new().unwrap();
    fs::write(from_flag.path().join("flag-only.md"), "x").unwrap();

    let config = from_config.path().join("promptbook.toml");
    fs::write(
        &config,
        format!(
            "[store]\ndir = {:?}\nbuiltin = false\n",
            from_config.path().to_str().unwrap()
        ),
    )
    .unwrap();

    let output = promptbook()
        .env("PROMPTBOOK_TEMPLATES", from_env.path())
        .args(["--config", config.to_str().unwrap()])
        .args(["--templates", from_flag.path().to_str().unwrap(), "--list"])
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output).trim(), "flag-only");
}

#[test]
fn test_var_file_drops_trailing_crlf() {
    let dir = TempDir::new().unwrap();
    let code = dir.path().join("code.go");
    fs::write(&code, "func Win() {}\r\n").unwrap();

    let arg = format!("code={}", code.display());
    let output = run(&["refactor", "--var-file", &arg]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("```go\nfunc Win() {}\n```"));
}

#[test]
fn test_invalid_template_file_is_usage_error() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("broken.md"), "+++\ndescription = \"never closed\"\n").unwrap();

    let output = run(&["--templates", dir.path().to_str().unwrap(), "--list"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    let err = stderr(&output);
    assert!(err.contains("Error loading templates"), "stderr: {}", err);
    assert!(err.contains("broken"), "stderr: {}", err);
}
