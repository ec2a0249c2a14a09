//! Results reports derived from archived submissions.
//!
//! A report is recomputed on demand from a submission and its test
//! definition. It is never persisted.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::archive::{SubmissionArchive, TestCatalog};
use crate::error::SessionError;
use crate::model::{Language, TestDefinition};
use crate::scoring::{percent, Submission};

/// Letter grade for an MCQ score percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn from_percent(score_percent: u32) -> Self {
        if score_percent >= 90 {
            Grade::APlus
        } else if score_percent >= 80 {
            Grade::A
        } else if score_percent >= 70 {
            Grade::B
        } else if score_percent >= 60 {
            Grade::C
        } else if score_percent >= 50 {
            Grade::D
        } else {
            Grade::F
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        };
        f.write_str(s)
    }
}

/// Correctness of one MCQ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McqOutcome {
    pub question_id: String,
    pub prompt: String,
    pub is_correct: bool,
    pub is_answered: bool,
    pub selected_option: Option<usize>,
    pub correct_option_index: usize,
}

/// A coding answer as submitted. Never graded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodingOutcome {
    pub question_id: String,
    pub prompt: String,
    pub language: Language,
    pub answer: String,
    pub is_answered: bool,
    pub expected_output: Option<String>,
}

/// Human-facing summary of a submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub test_id: String,
    pub test_name: String,
    pub submitted_at: DateTime<Utc>,
    pub time_spent_seconds: u32,
    pub mcq_score: u32,
    pub total_mcqs: u32,
    pub score_percent: u32,
    pub grade: Grade,
    pub answered_mcqs: usize,
    pub answered_coding: usize,
    pub total_questions: usize,
    pub completion_percent: u32,
    pub mcq_outcomes: Vec<McqOutcome>,
    pub coding_outcomes: Vec<CodingOutcome>,
}

/// Build the report for `submission` against the test it was taken on.
///
/// Completion is computed from the submission's answer snapshot over the
/// questions of `test`, so stray keys in the snapshot are ignored.
pub fn build_report(test: &TestDefinition, submission: &Submission) -> Report {
    let answers = &submission.answers;
    let score_percent = percent(
        submission.mcq_score as usize,
        submission.total_mcqs as usize,
    );

    let mcq_outcomes = test
        .mcq_questions
        .iter()
        .map(|q| {
            let selected = answers.mcq(&q.id).selected();
            McqOutcome {
                question_id: q.id.clone(),
                prompt: q.prompt.clone(),
                is_correct: selected == Some(q.correct_option_index),
                is_answered: selected.is_some(),
                selected_option: selected,
                correct_option_index: q.correct_option_index,
            }
        })
        .collect();

    let coding_outcomes = test
        .coding_questions
        .iter()
        .map(|q| CodingOutcome {
            question_id: q.id.clone(),
            prompt: q.prompt.clone(),
            language: q.language,
            answer: answers.coding(&q.id).to_string(),
            is_answered: answers.is_coding_answered(&q.id),
            expected_output: q.expected_output.clone(),
        })
        .collect();

    let answered_mcqs = answers.answered_mcq_count(test);
    let answered_coding = answers.answered_coding_count(test);
    let total_questions = test.total_questions();

    Report {
        test_id: submission.test_id.clone(),
        test_name: submission.test_name.clone(),
        submitted_at: submission.submitted_at,
        time_spent_seconds: submission.time_spent_seconds,
        mcq_score: submission.mcq_score,
        total_mcqs: submission.total_mcqs,
        score_percent,
        grade: Grade::from_percent(score_percent),
        answered_mcqs,
        answered_coding,
        total_questions,
        completion_percent: percent(answered_mcqs + answered_coding, total_questions),
        mcq_outcomes,
        coding_outcomes,
    }
}

/// Resolve the latest submission for `test_id` and build its report.
pub fn report_for(
    test_id: &str,
    catalog: &TestCatalog,
    archive: &SubmissionArchive,
) -> Result<Report, SessionError> {
    let submission = archive
        .latest_for(test_id)
        .ok_or_else(|| SessionError::SubmissionNotFound(test_id.to_string()))?;
    let test = catalog
        .get(test_id)
        .ok_or_else(|| SessionError::TestNotFound(test_id.to_string()))?;
    Ok(build_report(&test, &submission))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answers::{AnswerState, McqAnswer};
    use crate::model::fixtures::{coding, mcq, test_def};
    use crate::scoring::build_submission;
    use crate::store::MemoryStore;
    use std::sync::Arc;

    #[test]
    fn grade_thresholds() {
        assert_eq!(Grade::from_percent(100), Grade::APlus);
        assert_eq!(Grade::from_percent(90), Grade::APlus);
        assert_eq!(Grade::from_percent(89), Grade::A);
        assert_eq!(Grade::from_percent(70), Grade::B);
        assert_eq!(Grade::from_percent(60), Grade::C);
        assert_eq!(Grade::from_percent(50), Grade::D);
        assert_eq!(Grade::from_percent(49), Grade::F);
        assert_eq!(Grade::APlus.to_string(), "A+");
    }

    #[test]
    fn report_breaks_down_each_mcq() {
        let test = test_def(
            vec![mcq("q1", 3, 1), mcq("q2", 3, 0), mcq("q3", 3, 2)],
            vec![coding("c1")],
        );
        let mut answers = AnswerState::unanswered(&test);
        answers.mcq_answers.insert("q1".into(), McqAnswer::Selected(1));
        answers.mcq_answers.insert("q2".into(), McqAnswer::Selected(2));
        answers.coding_answers.insert("c1".into(), "print(1)".into());
        let submission = build_submission(&test, answers, 600, Utc::now());

        let report = build_report(&test, &submission);
        assert_eq!(report.mcq_score, 1);
        assert_eq!(report.score_percent, 33);
        assert_eq!(report.grade, Grade::F);
        assert_eq!(report.completion_percent, 75);
        let flags: Vec<(bool, bool)> = report
            .mcq_outcomes
            .iter()
            .map(|o| (o.is_correct, o.is_answered))
            .collect();
        assert_eq!(flags, vec![(true, true), (false, true), (false, false)]);
        assert_eq!(report.coding_outcomes[0].answer, "print(1)");
        assert!(report.coding_outcomes[0].is_answered);
    }

    #[test]
    fn no_mcqs_reports_zero_percent() {
        let test = test_def(vec![], vec![coding("c1")]);
        let submission = build_submission(&test, AnswerState::unanswered(&test), 5, Utc::now());
        let report = build_report(&test, &submission);
        assert_eq!(report.score_percent, 0);
        assert_eq!(report.total_mcqs, 0);
        assert_eq!(report.grade, Grade::F);
        assert_eq!(report.completion_percent, 0);
    }

    #[test]
    fn build_report_is_pure() {
        let test = test_def(vec![mcq("q1", 2, 0)], vec![coding("c1")]);
        let submission = build_submission(&test, AnswerState::unanswered(&test), 5, Utc::now());
        assert_eq!(build_report(&test, &submission), build_report(&test, &submission));
    }

    #[test]
    fn report_for_resolves_errors() {
        let store = Arc::new(MemoryStore::new());
        let catalog = TestCatalog::new(store.clone());
        let archive = SubmissionArchive::new(store);
        let test = test_def(vec![mcq("q1", 2, 0)], vec![]);

        assert_eq!(
            report_for("t1", &catalog, &archive).unwrap_err(),
            SessionError::SubmissionNotFound("t1".into())
        );

        let submission = build_submission(&test, AnswerState::unanswered(&test), 5, Utc::now());
        archive.append(&submission).unwrap();
        assert_eq!(
            report_for("t1", &catalog, &archive).unwrap_err(),
            SessionError::TestNotFound("t1".into())
        );

        catalog.add(test).unwrap();
        let report = report_for("t1", &catalog, &archive).unwrap();
        assert_eq!(report.total_mcqs, 1);
    }
}
