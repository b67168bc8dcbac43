use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

fn cargo_bin() -> PathBuf {
    if let Ok(path) = env::var("CARGO_BIN_EXE_ldapschema") {
        return PathBuf::from(path);
    }

    let target_dir = env::var("CARGO_TARGET_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| repo_root().join("target"));
    let executable_name = format!("ldapschema{}", std::env::consts::EXE_SUFFIX);
    let fallback = target_dir.join("debug").join(executable_name);

    if fallback.exists() {
        return fallback;
    }

    panic!(
        "CARGO_BIN_EXE_ldapschema is not set and fallback binary was not found at {}",
        fallback.display()
    );
}

fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("..").join("..")
}

fn testdata_path(name: &str) -> PathBuf {
    repo_root()
        .join("crates")
        .join("ldapschema")
        .join("tests")
        .join("data")
        .join(name)
}

fn unique_temp_path(name: &str, extension: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time should be after UNIX_EPOCH")
        .as_nanos();
    env::temp_dir().join(format!(
        "ldapschema-cli-{name}-{}-{nanos}.{extension}",
        std::process::id()
    ))
}

struct TempFile {
    path: PathBuf,
}

impl TempFile {
    fn create(name: &str, extension: &str, content: &str) -> Self {
        let path = unique_temp_path(name, extension);
        fs::write(&path, content).expect("temporary file should be created");
        Self { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

fn run(args: &[&str]) -> Output {
    Command::new(cargo_bin())
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("ldapschema should execute")
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn assert_exit_code(output: &Output, expected: i32) {
    let actual = output.status.code().unwrap_or(-1);
    assert_eq!(
        actual,
        expected,
        "unexpected exit code; stdout: {}; stderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn test_check_reports_counts_and_issues() {
    let file = path_arg(&testdata_path("subschema.ldif"));
    let output = run(&["check", &file]);
    assert_exit_code(&output, 0);

    let text = stdout(&output);
    assert!(text.contains("ldapSyntax:      6\n"), "{text}");
    assert!(text.contains("matchingRule:    3\n"), "{text}");
    assert!(text.contains("attributeType:   9\n"), "{text}");
    assert!(text.contains("objectClass:     4\n"), "{text}");
    assert!(text.contains("duplicates:      0\n"), "{text}");
    assert!(text.contains("schema issues: 4 (4 definitions)"), "{text}");
    assert!(text.contains("\n2.5.4.34:\n"), "{text}");
    assert!(text.contains("(invalid reference)"), "{text}");
    assert!(!text.contains("rejected definitions"), "{text}");
    assert!(text.trim_end().ends_with("ok"), "{text}");
}

#[test]
fn test_check_strict_fails_on_issues() {
    let file = path_arg(&testdata_path("subschema.ldif"));
    let output = run(&["check", "--strict", &file]);
    assert_exit_code(&output, 1);
    assert!(stdout(&output).trim_end().ends_with("FAILED"));
}

#[test]
fn test_check_strict_from_config_file() {
    let config = TempFile::create("strict", "yaml", "strict: true\n");
    let file = path_arg(&testdata_path("subschema.ldif"));
    let output = run(&["--config", &path_arg(config.path()), "check", &file]);
    assert_exit_code(&output, 1);
}

#[test]
fn test_check_lists_rejected_definitions() {
    let file = path_arg(&testdata_path("broken.ldif"));
    let output = run(&["check", &file]);
    assert_exit_code(&output, 1);

    let text = stdout(&output);
    assert!(text.contains("rejected definitions: 4"), "{text}");
    assert!(text.contains("broken.ldif:3:"), "{text}");
    assert!(text.contains("(duplicate entity)"), "{text}");
    assert!(text.trim_end().ends_with("FAILED"), "{text}");
}

#[test]
fn test_check_missing_file() {
    let output = run(&["check", "/nonexistent/schema.ldif"]);
    assert_exit_code(&output, 1);
    assert!(String::from_utf8_lossy(&output.stderr).contains("cannot read"));
}

#[test]
fn test_check_requires_files() {
    let output = run(&["check"]);
    assert!(!output.status.success());
}

#[test]
fn test_show_attribute_type() {
    let file = path_arg(&testdata_path("subschema.ldif"));
    let output = run(&["show", &file, "commonName"]);
    assert_exit_code(&output, 0);

    let text = stdout(&output);
    assert!(text.starts_with("attributeType:   2.5.4.3\n"), "{text}");
    assert!(text.contains("   names:        cn\n                 commonName\n"), "{text}");
    assert!(text.contains("   description:  Common Name\n"), "{text}");
    assert!(text.contains("   superior:     name\n"), "{text}");
    assert!(
        text.contains("   syntax:       1.3.6.1.4.1.1466.115.121.1.15 (Directory String) {32768}\n"),
        "{text}"
    );
    assert!(text.contains("   equality:     caseIgnoreMatch\n"), "{text}");
    assert!(text.contains("   required by:  person\n"), "{text}");
    assert!(text.contains("   X-ORIGIN:     ( 'RFC 4519' )\n"), "{text}");
    assert!(text.contains("   definition:   (\n"), "{text}");
}

#[test]
fn test_show_object_class_inherits() {
    let file = path_arg(&testdata_path("subschema.ldif"));
    let output = run(&["show", &file, "organizationalPerson"]);
    assert_exit_code(&output, 0);

    let text = stdout(&output);
    assert!(text.starts_with("objectClass:     2.5.6.7\n"), "{text}");
    assert!(text.contains("   superior:     person\n"), "{text}");
    assert!(text.contains("   inherited must: "), "{text}");
}

#[test]
fn test_show_json() {
    let file = path_arg(&testdata_path("subschema.ldif"));
    let output = run(&["show", &file, "2.5.6.6", "--json"]);
    assert_exit_code(&output, 0);

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("output should be JSON");
    assert_eq!(value["model"]["oid"], "2.5.6.6");
    assert_eq!(value["names"][0], "person");
    assert_eq!(value["kind"], "Structural");
    assert_eq!(value["must"].as_array().map(Vec::len), Some(2));
}

#[test]
fn test_show_unknown_name() {
    let file = path_arg(&testdata_path("subschema.ldif"));
    let output = run(&["show", &file, "noSuchThing"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no definition named 'noSuchThing'"));
}

#[test]
fn test_legacy_auxiliary_flag() {
    let file = path_arg(&testdata_path("core.schema"));

    let output = run(&["show", &file, "uidObject"]);
    assert_exit_code(&output, 0);
    assert!(stdout(&output).contains("   kind:         AUXILIARY\n"));

    let output = run(&["--legacy-auxiliary", "show", &file, "uidObject"]);
    assert_exit_code(&output, 0);
    assert!(stdout(&output).contains("   kind:         STRUCTURAL\n"));
}

#[test]
fn test_list_by_kind() {
    let file = path_arg(&testdata_path("subschema.ldif"));
    let output = run(&["list", &file, "--kind", "object-class"]);
    assert_exit_code(&output, 0);

    let text = stdout(&output);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4, "{text}");
    assert!(lines.iter().all(|line| line.starts_with("objectClass ")));
    let person: Vec<&str> = lines
        .iter()
        .find(|line| line.contains("2.5.6.6"))
        .map(|line| line.split_whitespace().collect())
        .unwrap_or_default();
    assert_eq!(person, ["objectClass", "2.5.6.6", "person"]);
}

#[test]
fn test_list_all_kinds() {
    let file = path_arg(&testdata_path("subschema.ldif"));
    let output = run(&["list", &file]);
    assert_exit_code(&output, 0);
    assert_eq!(stdout(&output).lines().count(), 22);
}
