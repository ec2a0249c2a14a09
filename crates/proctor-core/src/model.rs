//! Core data model types for proctor.
//!
//! A `TestDefinition` is the immutable description of an assessment: an
//! ordered MCQ section followed by an ordered coding section. Sessions read
//! it once at load time and never mutate it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An assessment as authored by an administrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestDefinition {
    /// Opaque, stable identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// What this test covers.
    #[serde(default)]
    pub description: String,
    /// Multiple-choice section, in presentation order.
    #[serde(default)]
    pub mcq_questions: Vec<McqItem>,
    /// Free-form coding section, in presentation order.
    #[serde(default)]
    pub coding_questions: Vec<CodingItem>,
}

impl TestDefinition {
    /// Number of questions across both sections.
    pub fn total_questions(&self) -> usize {
        self.mcq_questions.len() + self.coding_questions.len()
    }

    /// Look up an MCQ by id.
    pub fn mcq(&self, id: &str) -> Option<&McqItem> {
        self.mcq_questions.iter().find(|q| q.id == id)
    }

    /// Look up a coding question by id.
    pub fn coding(&self, id: &str) -> Option<&CodingItem> {
        self.coding_questions.iter().find(|q| q.id == id)
    }

    /// Length of the given section.
    pub fn section_len(&self, section: Section) -> usize {
        match section {
            Section::Mcq => self.mcq_questions.len(),
            Section::Coding => self.coding_questions.len(),
        }
    }
}

/// A multiple-choice question with exactly one correct option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McqItem {
    pub id: String,
    #[serde(alias = "question")]
    pub prompt: String,
    /// At least two options, in display order.
    pub options: Vec<String>,
    /// Index into `options`.
    #[serde(alias = "correctAnswer")]
    pub correct_option_index: usize,
}

impl McqItem {
    /// Whether `index` names one of this question's options.
    pub fn has_option(&self, index: usize) -> bool {
        index < self.options.len()
    }
}

/// A free-form coding question. Answers are stored verbatim, never run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodingItem {
    pub id: String,
    #[serde(alias = "question")]
    pub prompt: String,
    #[serde(default)]
    pub language: Language,
    /// Reference output shown alongside the candidate's answer in reports.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub expected_output: Option<String>,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

/// Languages a coding question can be posed in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    JavaScript,
    Python,
    Java,
    CSharp,
    Cpp,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::JavaScript => write!(f, "javascript"),
            Language::Python => write!(f, "python"),
            Language::Java => write!(f, "java"),
            Language::CSharp => write!(f, "csharp"),
            Language::Cpp => write!(f, "cpp"),
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "javascript" | "js" => Ok(Language::JavaScript),
            "python" | "py" => Ok(Language::Python),
            "java" => Ok(Language::Java),
            "csharp" | "c#" | "cs" => Ok(Language::CSharp),
            "cpp" | "c++" => Ok(Language::Cpp),
            other => Err(format!("unknown language: {other}")),
        }
    }
}

/// The two question sections of a test.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    #[default]
    Mcq,
    Coding,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Mcq => write!(f, "mcq"),
            Section::Coding => write!(f, "coding"),
        }
    }
}

/// Cursor movement within a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn mcq(id: &str, options: usize, correct: usize) -> McqItem {
        McqItem {
            id: id.into(),
            prompt: format!("Question {id}"),
            options: (0..options).map(|i| format!("Option {i}")).collect(),
            correct_option_index: correct,
        }
    }

    pub fn coding(id: &str) -> CodingItem {
        CodingItem {
            id: id.into(),
            prompt: format!("Implement {id}"),
            language: Language::Python,
            expected_output: None,
        }
    }

    pub fn test_def(mcqs: Vec<McqItem>, coding: Vec<CodingItem>) -> TestDefinition {
        TestDefinition {
            id: "t1".into(),
            name: "Backend Screening".into(),
            description: "Fundamentals".into(),
            mcq_questions: mcqs,
            coding_questions: coding,
        }
    }
}
