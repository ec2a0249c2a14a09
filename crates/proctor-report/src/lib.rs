//! Results report rendering for proctor.
//!
//! Turns a [`proctor_core::report::Report`] into a self-contained HTML page,
//! a Markdown summary, or a versioned JSON document.

pub mod html;
pub mod json;
pub mod markdown;

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{TimeZone, Utc};

    use proctor_core::answers::{AnswerState, McqAnswer};
    use proctor_core::model::{CodingItem, Language, McqItem, TestDefinition};
    use proctor_core::report::{build_report, Report};
    use proctor_core::scoring::build_submission;

    pub fn sample_report() -> Report {
        let test = TestDefinition {
            id: "backend".into(),
            name: "Backend <Screening>".into(),
            description: "HTTP & SQL".into(),
            mcq_questions: vec![
                McqItem {
                    id: "q1".into(),
                    prompt: "Which method is idempotent?".into(),
                    options: vec!["POST".into(), "PUT".into()],
                    correct_option_index: 1,
                },
                McqItem {
                    id: "q2".into(),
                    prompt: "Which clause filters groups?".into(),
                    options: vec!["WHERE".into(), "HAVING".into()],
                    correct_option_index: 1,
                },
            ],
            coding_questions: vec![CodingItem {
                id: "c1".into(),
                prompt: "Reverse a string".into(),
                language: Language::Python,
                expected_output: Some("olleh".into()),
            }],
        };
        let mut answers = AnswerState::unanswered(&test);
        answers.mcq_answers.insert("q1".into(), McqAnswer::Selected(1));
        answers
            .coding_answers
            .insert("c1".into(), "print(s[::-1])".into());
        let submitted_at = Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap();
        let submission = build_submission(&test, answers, 754, submitted_at);
        build_report(&test, &submission)
    }
}
