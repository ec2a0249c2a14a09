//! TOML test definition parser.
//!
//! Loads authored tests from TOML files and directories, and validates them
//! before they are imported into a catalog.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use uuid::Uuid;

use crate::model::{CodingItem, Language, McqItem, TestDefinition};

/// Intermediate TOML structure for parsing test files.
#[derive(Debug, Deserialize)]
struct TomlTestFile {
    test: TomlTestHeader,
    #[serde(default)]
    mcq: Vec<TomlMcq>,
    #[serde(default)]
    coding: Vec<TomlCoding>,
}

#[derive(Debug, Deserialize)]
struct TomlTestHeader {
    #[serde(default)]
    id: Option<String>,
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct TomlMcq {
    #[serde(default)]
    id: Option<String>,
    prompt: String,
    options: Vec<String>,
    correct: usize,
}

#[derive(Debug, Deserialize)]
struct TomlCoding {
    #[serde(default)]
    id: Option<String>,
    prompt: String,
    #[serde(default = "default_language_str")]
    language: String,
    #[serde(default)]
    expected_output: Option<String>,
}

fn default_language_str() -> String {
    "javascript".to_string()
}

fn id_or_new(id: Option<String>) -> String {
    id.filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// Parse a single TOML file into a `TestDefinition`.
pub fn parse_test_definition(path: &Path) -> Result<TestDefinition> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read test file: {}", path.display()))?;

    parse_test_definition_str(&content, path)
}

/// Parse a TOML string into a `TestDefinition` (useful for testing).
///
/// Missing ids are filled with fresh UUIDs.
pub fn parse_test_definition_str(content: &str, source_path: &Path) -> Result<TestDefinition> {
    let parsed: TomlTestFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let mcq_questions = parsed
        .mcq
        .into_iter()
        .map(|q| McqItem {
            id: id_or_new(q.id),
            prompt: q.prompt,
            options: q.options,
            correct_option_index: q.correct,
        })
        .collect();

    let coding_questions = parsed
        .coding
        .into_iter()
        .map(|q| {
            let language: Language = q
                .language
                .parse()
                .map_err(|e: String| anyhow::anyhow!("{}", e))?;
            Ok(CodingItem {
                id: id_or_new(q.id),
                prompt: q.prompt,
                language,
                expected_output: q.expected_output.filter(|s| !s.is_empty()),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(TestDefinition {
        id: id_or_new(parsed.test.id),
        name: parsed.test.name,
        description: parsed.test.description,
        mcq_questions,
        coding_questions,
    })
}

/// Recursively load all `.toml` test files from a directory.
pub fn load_test_directory(dir: &Path) -> Result<Vec<TestDefinition>> {
    let mut tests = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            tests.extend(load_test_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_test_definition(&path) {
                Ok(test) => tests.push(test),
                Err(e) => {
                    tracing::warn!("skipping {}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(tests)
}

/// How serious a validation finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The test cannot be taken as authored.
    Error,
    Warning,
}

/// A finding from test validation.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    pub severity: Severity,
    pub message: String,
}

impl ValidationIssue {
    fn error(question_id: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            question_id: question_id.map(str::to_string),
            severity: Severity::Error,
            message: message.into(),
        }
    }

    fn warning(question_id: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            question_id: question_id.map(str::to_string),
            severity: Severity::Warning,
            message: message.into(),
        }
    }
}

/// Returns true if any issue blocks the test from being imported.
pub fn has_errors(issues: &[ValidationIssue]) -> bool {
    issues.iter().any(|i| i.severity == Severity::Error)
}

/// Validate a test definition for authoring mistakes.
pub fn validate_test_definition(test: &TestDefinition) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if test.name.trim().is_empty() {
        issues.push(ValidationIssue::error(None, "test name is empty"));
    }

    if test.total_questions() == 0 {
        issues.push(ValidationIssue::error(None, "test has no questions"));
    }

    // Question ids are shared across both sections
    let mut seen_ids = HashSet::new();
    let all_ids = test
        .mcq_questions
        .iter()
        .map(|q| &q.id)
        .chain(test.coding_questions.iter().map(|q| &q.id));
    for id in all_ids {
        if !seen_ids.insert(id) {
            issues.push(ValidationIssue::error(
                Some(id.as_str()),
                format!("duplicate question ID: {id}"),
            ));
        }
    }

    for q in &test.mcq_questions {
        let id = Some(q.id.as_str());
        if q.prompt.trim().is_empty() {
            issues.push(ValidationIssue::error(id, "prompt is empty"));
        }
        if q.options.len() < 2 {
            issues.push(ValidationIssue::error(id, "an MCQ needs at least 2 options"));
        }
        if q.options.iter().any(|o| o.trim().is_empty()) {
            issues.push(ValidationIssue::error(id, "option text is empty"));
        }
        if !q.has_option(q.correct_option_index) {
            issues.push(ValidationIssue::error(
                id,
                format!(
                    "correct option {} is out of range ({} options)",
                    q.correct_option_index,
                    q.options.len()
                ),
            ));
        }
        let distinct: HashSet<&str> = q.options.iter().map(|o| o.trim()).collect();
        if distinct.len() < q.options.len() {
            issues.push(ValidationIssue::warning(id, "options repeat the same text"));
        }
    }

    for q in &test.coding_questions {
        if q.prompt.trim().is_empty() {
            issues.push(ValidationIssue::error(Some(q.id.as_str()), "prompt is empty"));
        }
    }

    if test.description.trim().is_empty() {
        issues.push(ValidationIssue::warning(None, "description is empty"));
    }

    issues
}
