//! Answer capture for a single session.
//!
//! Every question id of the loaded test has exactly one entry at all times
//! after initialization: `McqAnswer::Unanswered` for MCQs and the empty
//! string for coding questions.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::engine::SessionPhase;
use crate::error::SessionError;
use crate::model::TestDefinition;

/// Persisted value of an unanswered MCQ.
pub const UNANSWERED: i64 = -1;

/// The candidate's choice for one MCQ.
///
/// Stored as the option index, or `-1` when unanswered, so archived
/// submissions compare numerically against `correctOptionIndex`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum McqAnswer {
    #[default]
    Unanswered,
    Selected(usize),
}

impl McqAnswer {
    pub fn is_answered(self) -> bool {
        matches!(self, McqAnswer::Selected(_))
    }

    pub fn selected(self) -> Option<usize> {
        match self {
            McqAnswer::Selected(index) => Some(index),
            McqAnswer::Unanswered => None,
        }
    }
}

impl Serialize for McqAnswer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            McqAnswer::Unanswered => serializer.serialize_i64(UNANSWERED),
            McqAnswer::Selected(index) => serializer.serialize_u64(*index as u64),
        }
    }
}

impl<'de> Deserialize<'de> for McqAnswer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = i64::deserialize(deserializer)?;
        Ok(usize::try_from(raw)
            .map(McqAnswer::Selected)
            .unwrap_or(McqAnswer::Unanswered))
    }
}

/// Snapshot of all answers, keyed by question id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerState {
    #[serde(default)]
    pub mcq_answers: BTreeMap<String, McqAnswer>,
    #[serde(default)]
    pub coding_answers: BTreeMap<String, String>,
}

impl AnswerState {
    /// Sentinel entries for every question of `test`.
    pub fn unanswered(test: &TestDefinition) -> Self {
        Self {
            mcq_answers: test
                .mcq_questions
                .iter()
                .map(|q| (q.id.clone(), McqAnswer::Unanswered))
                .collect(),
            coding_answers: test
                .coding_questions
                .iter()
                .map(|q| (q.id.clone(), String::new()))
                .collect(),
        }
    }

    pub fn mcq(&self, question_id: &str) -> McqAnswer {
        self.mcq_answers
            .get(question_id)
            .copied()
            .unwrap_or_default()
    }

    pub fn coding(&self, question_id: &str) -> &str {
        self.coding_answers
            .get(question_id)
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn is_mcq_answered(&self, question_id: &str) -> bool {
        self.mcq(question_id).is_answered()
    }

    /// Whitespace-only text counts as unanswered.
    pub fn is_coding_answered(&self, question_id: &str) -> bool {
        !self.coding(question_id).trim().is_empty()
    }

    /// Answered state of a question in either section.
    pub fn is_answered(&self, question_id: &str) -> bool {
        self.is_mcq_answered(question_id) || self.is_coding_answered(question_id)
    }

    /// Answered MCQs among the questions of `test`.
    pub fn answered_mcq_count(&self, test: &TestDefinition) -> usize {
        test.mcq_questions
            .iter()
            .filter(|q| self.is_mcq_answered(&q.id))
            .count()
    }

    /// Answered coding questions among the questions of `test`.
    pub fn answered_coding_count(&self, test: &TestDefinition) -> usize {
        test.coding_questions
            .iter()
            .filter(|q| self.is_coding_answered(&q.id))
            .count()
    }

    pub fn answered_count(&self, test: &TestDefinition) -> usize {
        self.answered_mcq_count(test) + self.answered_coding_count(test)
    }
}

/// Mutable answer capture owned by a session.
///
/// Rejects every mutation until `initialize` has run and after `seal`.
#[derive(Debug, Default)]
pub struct AnswerStore {
    state: AnswerState,
    option_counts: BTreeMap<String, usize>,
    test_id: Option<String>,
    accepting: bool,
}

impl AnswerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed sentinel entries for `test`, discarding anything held before.
    pub fn initialize(&mut self, test: &TestDefinition) {
        if self.test_id.as_deref().is_some_and(|id| id != test.id) {
            tracing::debug!(previous = ?self.test_id, test_id = %test.id, "resetting answer store");
        }
        self.state = AnswerState::unanswered(test);
        self.option_counts = test
            .mcq_questions
            .iter()
            .map(|q| (q.id.clone(), q.options.len()))
            .collect();
        self.test_id = Some(test.id.clone());
        self.accepting = true;
    }

    /// Stop accepting mutations. Reads keep working.
    pub fn seal(&mut self) {
        self.accepting = false;
    }

    pub fn is_accepting(&self) -> bool {
        self.accepting
    }

    fn ensure_accepting(&self) -> Result<(), SessionError> {
        if self.accepting {
            return Ok(());
        }
        let phase = if self.test_id.is_some() {
            SessionPhase::Terminated
        } else {
            SessionPhase::Loading
        };
        Err(SessionError::SessionNotActive { phase })
    }

    /// Select `option_index` for an MCQ. Last write wins.
    pub fn set_mcq_answer(
        &mut self,
        question_id: &str,
        option_index: usize,
    ) -> Result<(), SessionError> {
        self.ensure_accepting()?;
        let option_count = *self
            .option_counts
            .get(question_id)
            .ok_or_else(|| SessionError::UnknownQuestion(question_id.to_string()))?;
        if option_index >= option_count {
            return Err(SessionError::InvalidOption {
                question_id: question_id.to_string(),
                option_index,
                option_count,
            });
        }
        self.state
            .mcq_answers
            .insert(question_id.to_string(), McqAnswer::Selected(option_index));
        Ok(())
    }

    /// Replace a coding answer. Empty text marks the question unanswered again.
    pub fn set_coding_answer(&mut self, question_id: &str, text: &str) -> Result<(), SessionError> {
        self.ensure_accepting()?;
        let entry = self
            .state
            .coding_answers
            .get_mut(question_id)
            .ok_or_else(|| SessionError::UnknownQuestion(question_id.to_string()))?;
        text.clone_into(entry);
        Ok(())
    }

    pub fn is_answered(&self, question_id: &str) -> bool {
        self.state.is_answered(question_id)
    }

    pub fn state(&self) -> &AnswerState {
        &self.state
    }

    pub fn snapshot(&self) -> AnswerState {
        self.state.clone()
    }
}
