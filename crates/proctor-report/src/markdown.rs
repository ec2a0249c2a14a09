//! Markdown results summary, suitable for pasting into an issue or PR.

use std::path::Path;

use anyhow::Result;

use proctor_core::clock::format_clock;
use proctor_core::report::Report;

/// Render a report as Markdown.
pub fn to_markdown(report: &Report) -> String {
    let mut md = String::new();

    md.push_str(&format!("# Results: {}\n\n", report.test_name));
    md.push_str(&format!(
        "Submitted {} after {}.\n\n",
        report.submitted_at.format("%Y-%m-%d %H:%M UTC"),
        format_clock(report.time_spent_seconds)
    ));

    md.push_str("| Grade | MCQ score | Completion | Answered |\n");
    md.push_str("|-------|-----------|------------|----------|\n");
    md.push_str(&format!(
        "| {} | {}/{} ({}%) | {}% | {}/{} |\n\n",
        report.grade,
        report.mcq_score,
        report.total_mcqs,
        report.score_percent,
        report.completion_percent,
        report.answered_mcqs + report.answered_coding,
        report.total_questions,
    ));

    if !report.mcq_outcomes.is_empty() {
        md.push_str("## Multiple choice\n\n");
        md.push_str("| # | Question | Answer | Correct | Result |\n");
        md.push_str("|---|----------|--------|---------|--------|\n");
        for (i, o) in report.mcq_outcomes.iter().enumerate() {
            let answer = o
                .selected_option
                .map(|s| (s + 1).to_string())
                .unwrap_or_else(|| "-".into());
            let result = if o.is_correct {
                "correct"
            } else if o.is_answered {
                "incorrect"
            } else {
                "not answered"
            };
            md.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                i + 1,
                table_cell(&o.prompt),
                answer,
                o.correct_option_index + 1,
                result
            ));
        }
        md.push('\n');
    }

    if !report.coding_outcomes.is_empty() {
        md.push_str("## Coding\n\n");
        for (i, o) in report.coding_outcomes.iter().enumerate() {
            md.push_str(&format!("### {}. {}\n\n", i + 1, o.prompt));
            if o.is_answered {
                md.push_str(&format!("```{}\n{}\n```\n\n", o.language, o.answer.trim_end()));
            } else {
                md.push_str("_Not answered._\n\n");
            }
        }
    }

    md
}

// Pipes and newlines would break the table row.
/// Write a Markdown report to a file.
pub fn write_markdown_report(report: &Report, path: &Path) -> Result<()> {
    let md = to_markdown(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, md)?;
    Ok(())
}

fn table_cell(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}
