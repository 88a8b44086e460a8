//! Golden-file runner for `*.test.toml` programs.
//!
//! A test file is a TOML header fenced by `---` lines followed by the
//! program document itself:
//!
//! ```text
//! ---
//! description = "servo write"
//! expect_contains = ["myServo9.write(90);"]
//! ---
//! [[block]]
//! type = "servo_write"
//! fields = { SERVO_PIN = 9 }
//! ```
//!
//! Subfolders of the test root are categories.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use generator::GeneratorTable;

use crate::config::Config;

const TEST_SUFFIX: &str = ".test.toml";
const FENCE: &str = "---";

/// Expectations declared in a test file's header.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Expectations {
    pub description: Option<String>,
    /// Overrides the program's own `board` key.
    pub board: Option<String>,
    /// Whole sketch, compared with surrounding whitespace trimmed.
    pub expect_output: Option<String>,
    /// Substring of the generation error message.
    pub expect_error: Option<String>,
    pub expect_parse_error: bool,
    pub expect_contains: Vec<String>,
}

/// One loaded test file.
#[derive(Debug)]
struct GoldenTest {
    expect: Expectations,
    program: String,
}

impl GoldenTest {
    fn parse(content: &str) -> Result<GoldenTest, String> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let mut lines = content.split_inclusive('\n');

        match lines.next() {
            Some(first) if first.trim_end() == FENCE => {}
            _ => return Err(format!("file must start with a '{}' line", FENCE)),
        }

        let mut header = String::new();
        let mut closed = false;
        for line in lines.by_ref() {
            if line.trim_end() == FENCE {
                closed = true;
                break;
            }
            header.push_str(line);
        }
        if !closed {
            return Err(format!("header is not closed by a '{}' line", FENCE));
        }

        let expect = toml::from_str(&header).map_err(|e| format!("invalid header: {}", e.message()))?;
        Ok(GoldenTest {
            expect,
            program: lines.collect(),
        })
    }

    /// Returns `Err` with a human-readable reason when an expectation fails.
    fn check(&self, settings: &Config, table: &GeneratorTable) -> Result<(), String> {
        let parsed = blocks::parser::Parser::new(self.program.clone(), 0).parse();

        let program = match (parsed, self.expect.expect_parse_error) {
            (Err(_), true) => return Ok(()),
            (Ok(_), true) => return Err("expected the program to be rejected, but it parsed".into()),
            (Err(errors), false) => {
                let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
                return Err(format!("program failed to parse: {}", messages.join("; ")));
            }
            (Ok(program), false) => program,
        };

        let board_name = self
            .expect
            .board
            .as_deref()
            .or(program.board.as_deref())
            .unwrap_or(&settings.default_board);
        let board = settings
            .find_board(board_name)
            .ok_or_else(|| format!("unknown board '{}'", board_name))?;

        let sketch = match (generator::generate(&program, &board, table, settings.options()), &self.expect.expect_error) {
            (Err(error), Some(wanted)) => {
                let message = error.to_string();
                return if message.contains(wanted.as_str()) {
                    Ok(())
                } else {
                    Err(format!("error should mention \"{}\" but was: {}", wanted, message))
                };
            }
            (Err(error), None) => return Err(format!("generation failed: {}", error)),
            (Ok(_), Some(wanted)) => {
                return Err(format!("expected an error mentioning \"{}\", but generation succeeded", wanted));
            }
            (Ok(sketch), None) => sketch,
        };

        if let Some(wanted) = &self.expect.expect_output {
            if sketch.trim() != wanted.trim() {
                return Err(format!(
                    "sketch differs\n  expected:\n{}\n  actual:\n{}",
                    wanted.trim(),
                    sketch.trim()
                ));
            }
        }
        if let Some(missing) = self.expect.expect_contains.iter().find(|s| !sketch.contains(s.as_str())) {
            return Err(format!("sketch lacks \"{}\"\n  actual:\n{}", missing, sketch.trim()));
        }
        Ok(())
    }
}

struct Outcome {
    path: PathBuf,
    title: String,
    failure: Option<String>,
}

fn run_file(path: &Path, settings: &Config, table: &GeneratorTable) -> Outcome {
    let fallback = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.trim_end_matches(TEST_SUFFIX).to_string())
        .unwrap_or_else(|| path.display().to_string());

    let loaded = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read file: {}", e))
        .and_then(|content| GoldenTest::parse(&content));

    let (title, failure) = match loaded {
        Ok(test) => {
            let title = test.expect.description.clone().unwrap_or(fallback);
            (title, test.check(settings, table).err())
        }
        Err(reason) => (fallback, Some(reason)),
    };
    debug!(path = %path.display(), passed = failure.is_none(), "ran test file");

    Outcome {
        path: path.to_path_buf(),
        title,
        failure,
    }
}

/// Test files under `root`, keyed by their folder relative to `root`
/// (`""` for files at the top level). Both levels are sorted.
fn discover(root: &Path) -> BTreeMap<String, Vec<PathBuf>> {
    let mut found = BTreeMap::new();
    walk(root, root, &mut found);
    found.values_mut().for_each(|files: &mut Vec<PathBuf>| files.sort());
    found
}

fn walk(dir: &Path, root: &Path, found: &mut BTreeMap<String, Vec<PathBuf>>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for path in entries.flatten().map(|entry| entry.path()) {
        if path.is_dir() {
            walk(&path, root, found);
            continue;
        }
        let is_test = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(TEST_SUFFIX));
        if is_test {
            let category = dir
                .strip_prefix(root)
                .map(|rel| rel.components().map(|c| c.as_os_str().to_string_lossy()).collect::<Vec<_>>().join("/"))
                .unwrap_or_default();
            found.entry(category).or_default().push(path);
        }
    }
}

fn category_name(category: &str) -> &str {
    if category.is_empty() { "(root)" } else { category }
}

pub fn list_categories(path: &Path) {
    if path.is_file() {
        eprintln!("{} is a single test file", path.display());
        return;
    }
    let found = discover(path);
    if found.is_empty() {
        eprintln!("no {} files under {}", TEST_SUFFIX, path.display());
        return;
    }
    for (category, files) in &found {
        eprintln!("{:<24} {} tests", category_name(category), files.len());
    }
}

/// Keep categories equal to, or nested under, one of `wanted`.
fn select<'a>(
    found: &'a BTreeMap<String, Vec<PathBuf>>,
    wanted: &[String],
) -> Vec<(&'a str, &'a [PathBuf])> {
    let matches = |category: &str| {
        wanted.is_empty()
            || wanted.iter().any(|w| {
                let w = w.trim_matches('/');
                category == w || category.strip_prefix(w).is_some_and(|rest| rest.starts_with('/'))
            })
    };

    for w in wanted {
        let w = w.trim_matches('/');
        if !found.keys().any(|c| c == w || c.starts_with(&format!("{}/", w))) {
            eprintln!("warning: no test category named '{}'", w);
        }
    }

    found
        .iter()
        .filter(|(category, _)| matches(category.as_str()))
        .map(|(category, files)| (category.as_str(), files.as_slice()))
        .collect()
}

struct Style {
    color: bool,
}

impl Style {
    fn paint(&self, code: &str, text: &str) -> String {
        if self.color {
            format!("\x1b[{}m{}\x1b[0m", code, text)
        } else {
            text.to_string()
        }
    }

    fn pass(&self) -> String {
        self.paint("32", "PASS")
    }

    fn fail(&self) -> String {
        self.paint("31", "FAIL")
    }

    fn heading(&self, text: &str) -> String {
        self.paint("1", text)
    }
}

/// Run every test under `path` (or the single file `path`) and print a
/// report to stderr. The return value is the process exit code.
pub fn run_tests(path: &Path, settings: &Config, no_color: bool, categories: &[String]) -> i32 {
    let style = Style { color: !no_color };
    let table = GeneratorTable::with_builtins();

    let found = if path.is_file() {
        BTreeMap::from([(String::new(), vec![path.to_path_buf()])])
    } else {
        discover(path)
    };
    if found.is_empty() {
        eprintln!("no {} files under {}", TEST_SUFFIX, path.display());
        return 1;
    }
    let selected = if path.is_file() { select(&found, &[]) } else { select(&found, categories) };
    if selected.is_empty() {
        eprintln!("no tests selected");
        return 1;
    }

    let mut passed = 0usize;
    let mut failed = Vec::new();
    for (category, files) in selected {
        eprintln!("\n{}", style.heading(category_name(category)));
        for file in files {
            let outcome = run_file(file, settings, &table);
            match outcome.failure {
                None => {
                    passed += 1;
                    eprintln!("  {}  {}", style.pass(), outcome.title);
                }
                Some(_) => {
                    eprintln!("  {}  {}", style.fail(), outcome.title);
                    failed.push(outcome);
                }
            }
        }
    }

    for outcome in &failed {
        eprintln!("\n{} {}", style.fail(), outcome.path.display());
        for line in outcome.failure.iter().flat_map(|reason| reason.lines()) {
            eprintln!("    {}", line);
        }
    }

    eprintln!();
    if failed.is_empty() {
        eprintln!("{} {} passed", style.paint("32", "ok:"), passed);
        0
    } else {
        eprintln!(
            "{} {} passed, {} failed",
            style.paint("31", "FAILED:"),
            passed,
            failed.len()
        );
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SERVO_TEST: &str = r#"---
description = "servo write"
expect_contains = ["myServo9.write(90);"]
---
[[block]]
type = "servo_write"
fields = { SERVO_PIN = 9 }
"#;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    fn failure(path: &Path) -> Option<String> {
        run_file(path, &Config::default(), &GeneratorTable::with_builtins()).failure
    }

    #[test]
    fn header_is_split_from_program() {
        let test = GoldenTest::parse(SERVO_TEST).unwrap();
        assert_eq!(test.expect.description.as_deref(), Some("servo write"));
        assert!(test.program.starts_with("[[block]]"));
    }

    #[test]
    fn unfenced_header_is_rejected() {
        assert!(GoldenTest::parse("[[block]]").is_err());
        assert!(GoldenTest::parse("---\ndescription = \"x\"\n").is_err());
        assert!(GoldenTest::parse("---\nunknown = 1\n---\n").is_err());
    }

    #[test]
    fn expectations_are_checked() {
        let dir = tempfile::tempdir().unwrap();
        let ok = write(dir.path(), "servo.test.toml", SERVO_TEST);
        assert_eq!(failure(&ok), None);

        let conflict = write(
            dir.path(),
            "conflict.test.toml",
            r#"---
expect_error = "already reserved"
---
[[block]]
type = "servo_write"
fields = { SERVO_PIN = 9 }

[[block]]
type = "io_digitalwrite"
fields = { PIN = 9 }
"#,
        );
        assert_eq!(failure(&conflict), None);

        let wrong = write(dir.path(), "wrong.test.toml", "---\nexpect_output = \"nothing\"\n---\n");
        assert!(failure(&wrong).is_some_and(|reason| reason.contains("sketch differs")));
    }

    #[test]
    fn header_board_overrides_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "mega.test.toml",
            r#"---
board = "mega"
expect_contains = ["myServo45.attach(45);"]
---
[[block]]
type = "servo_write"
fields = { SERVO_PIN = 45 }
"#,
        );
        assert_eq!(failure(&path), None);
    }

    #[test]
    fn categories_follow_subfolders() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "top.test.toml", SERVO_TEST);
        write(dir.path(), "servo/a.test.toml", SERVO_TEST);
        write(dir.path(), "servo/notes.md", "ignored");
        write(dir.path(), "servos/b.test.toml", SERVO_TEST);

        let found = discover(dir.path());
        assert_eq!(found.len(), 3);
        assert_eq!(found[""].len(), 1);
        assert_eq!(found["servo"].len(), 1);

        let selected = select(&found, &["servo/".to_string()]);
        let names: Vec<&str> = selected.iter().map(|(c, _)| *c).collect();
        assert_eq!(names, vec!["servo"]);
    }

    #[test]
    fn exit_code_reflects_failures() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "servo.test.toml", SERVO_TEST);
        assert_eq!(run_tests(dir.path(), &Config::default(), true, &[]), 0);
        write(dir.path(), "bad.test.toml", "---\nexpect_parse_error = true\n---\n");
        assert_eq!(run_tests(dir.path(), &Config::default(), true, &[]), 1);
    }

    #[test]
    fn golden_programs_pass() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../tests/programs");
        assert_eq!(run_tests(&root, &Config::default(), true, &[]), 0);
    }
}
