//! MCQ scoring and submission building.
//!
//! Only multiple-choice answers are scored. Coding answers count towards
//! completion but never towards correctness.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::answers::{AnswerState, McqAnswer};
use crate::model::TestDefinition;

/// The immutable record of a finished session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub test_id: String,
    pub test_name: String,
    /// Answers as they stood at submit time.
    #[serde(alias = "responses")]
    pub answers: AnswerState,
    #[serde(alias = "score")]
    pub mcq_score: u32,
    #[serde(alias = "totalMCQs")]
    pub total_mcqs: u32,
    pub submitted_at: DateTime<Utc>,
    /// Budget minus remaining seconds at submit time.
    #[serde(alias = "timeSpent")]
    pub time_spent_seconds: u32,
}

/// Count correct MCQ answers: `(mcq_score, total_mcqs)`.
pub fn score(test: &TestDefinition, answers: &AnswerState) -> (u32, u32) {
    let correct = test
        .mcq_questions
        .iter()
        .filter(|q| answers.mcq(&q.id) == McqAnswer::Selected(q.correct_option_index))
        .count();
    (correct as u32, test.mcq_questions.len() as u32)
}

/// Live completion: share of answered questions in percent, unrounded.
pub fn progress_percent(test: &TestDefinition, answers: &AnswerState) -> f64 {
    let total = test.total_questions();
    if total == 0 {
        return 0.0;
    }
    100.0 * answers.answered_count(test) as f64 / total as f64
}

/// `round(100 * part / whole)`, or 0 when `whole` is 0.
pub fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    (100.0 * part as f64 / whole as f64).round() as u32
}

/// Score a finalized answer snapshot into a submission.
pub fn build_submission(
    test: &TestDefinition,
    answers: AnswerState,
    time_spent_seconds: u32,
    submitted_at: DateTime<Utc>,
) -> Submission {
    let (mcq_score, total_mcqs) = score(test, &answers);
    Submission {
        test_id: test.id.clone(),
        test_name: test.name.clone(),
        answers,
        mcq_score,
        total_mcqs,
        submitted_at,
        time_spent_seconds,
    }
}
