//! The `proctor report` command.

use std::path::PathBuf;

use anyhow::Result;

use proctor_core::clock::format_clock;
use proctor_core::report::{report_for, Report};
use proctor_report::{html, json, markdown};

pub fn execute(
    id: String,
    format: String,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let workspace = super::open_workspace(config_path)?;
    let report = report_for(&id, &workspace.catalog, &workspace.archive)?;

    match (format.as_str(), output) {
        ("text", None) => println!("{}", to_text(&report)),
        ("markdown" | "md", None) => println!("{}", markdown::to_markdown(&report)),
        ("html", None) => println!("{}", html::generate_html(&report)),
        ("json", None) => println!("{}", json::generate_json(&report)?),
        ("text", Some(path)) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, to_text(&report))?;
            println!("Report written to {}", path.display());
        }
        ("markdown" | "md", Some(path)) => {
            markdown::write_markdown_report(&report, &path)?;
            println!("Report written to {}", path.display());
        }
        ("html", Some(path)) => {
            html::write_html_report(&report, &path)?;
            println!("Report written to {}", path.display());
        }
        ("json", Some(path)) => {
            json::write_json_report(&report, &path)?;
            println!("Report written to {}", path.display());
        }
        (other, _) => {
            anyhow::bail!("unknown format: {other} (expected text, markdown, html or json)")
        }
    }

    Ok(())
}

fn to_text(report: &Report) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", report.test_name));
    out.push_str(&format!(
        "Submitted:  {}\n",
        report.submitted_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out.push_str(&format!(
        "Time spent: {}\n",
        format_clock(report.time_spent_seconds)
    ));
    out.push_str(&format!(
        "Score:      {}/{} ({}%)  Grade {}\n",
        report.mcq_score, report.total_mcqs, report.score_percent, report.grade
    ));
    out.push_str(&format!(
        "Completion: {}% ({} of {} answered)\n",
        report.completion_percent,
        report.answered_mcqs + report.answered_coding,
        report.total_questions
    ));

    for (i, o) in report.mcq_outcomes.iter().enumerate() {
        let mark = if o.is_correct {
            "correct"
        } else if o.is_answered {
            "wrong"
        } else {
            "skipped"
        };
        out.push_str(&format!("  Q{} [{mark}] {}\n", i + 1, o.prompt));
    }
    for (i, o) in report.coding_outcomes.iter().enumerate() {
        let mark = if o.is_answered { "answered" } else { "skipped" };
        out.push_str(&format!("  C{} [{mark}] {} ({})\n", i + 1, o.prompt, o.language));
    }

    out
}
