//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS inlined.

use anyhow::Result;
use std::path::Path;

use proctor_core::clock::format_clock;
use proctor_core::report::{Grade, Report};

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn grade_class(grade: Grade) -> &'static str {
    match grade {
        Grade::APlus | Grade::A => "pass",
        Grade::B | Grade::C => "warn",
        Grade::D | Grade::F => "fail",
    }
}

/// Generate an HTML page from a results report.
pub fn generate_html(report: &Report) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>Results: {}</title>\n",
        html_escape(&report.test_name)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str(&format!("<h1>{}</h1>\n", html_escape(&report.test_name)));
    html.push_str(&format!(
        "<p class=\"meta\">Submitted {} | Time spent {}</p>\n",
        report.submitted_at.format("%Y-%m-%d %H:%M:%S UTC"),
        format_clock(report.time_spent_seconds)
    ));
    html.push_str("</header>\n");

    // Summary
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Summary</h2>\n");
    html.push_str(&format!(
        "<div class=\"grade {}\">{}</div>\n",
        grade_class(report.grade),
        report.grade
    ));
    html.push_str("<table class=\"summary\">\n<tbody>\n");
    html.push_str(&format!(
        "<tr><th>MCQ score</th><td>{}/{} ({}%)</td></tr>\n",
        report.mcq_score, report.total_mcqs, report.score_percent
    ));
    html.push_str(&format!(
        "<tr><th>Completion</th><td>{}%</td></tr>\n",
        report.completion_percent
    ));
    html.push_str(&format!(
        "<tr><th>Questions answered</th><td>{} of {}</td></tr>\n",
        report.answered_mcqs + report.answered_coding,
        report.total_questions
    ));
    html.push_str("</tbody></table>\n");
    html.push_str(&generate_progress_bar(report.completion_percent));
    html.push_str("</section>\n");

    // Per-question MCQ breakdown
    if !report.mcq_outcomes.is_empty() {
        html.push_str("<section class=\"results\">\n");
        html.push_str("<h2>Multiple choice</h2>\n");
        html.push_str("<table class=\"results-table\">\n");
        html.push_str("<thead><tr><th>#</th><th>Question</th><th>Your answer</th><th>Correct answer</th><th>Result</th></tr></thead>\n");
        html.push_str("<tbody>\n");
        for (i, outcome) in report.mcq_outcomes.iter().enumerate() {
            let (class, verdict) = if outcome.is_correct {
                ("pass", "Correct")
            } else if outcome.is_answered {
                ("fail", "Incorrect")
            } else {
                ("skip", "Not answered")
            };
            let selected = outcome
                .selected_option
                .map(|o| (o + 1).to_string())
                .unwrap_or_else(|| "-".to_string());
            html.push_str(&format!(
                "<tr class=\"{}\"><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                class,
                i + 1,
                html_escape(&outcome.prompt),
                selected,
                outcome.correct_option_index + 1,
                verdict
            ));
        }
        html.push_str("</tbody></table>\n");
        html.push_str("</section>\n");
    }

    // Coding answers, shown as submitted
    if !report.coding_outcomes.is_empty() {
        html.push_str("<section class=\"coding\">\n");
        html.push_str("<h2>Coding</h2>\n");
        for (i, outcome) in report.coding_outcomes.iter().enumerate() {
            html.push_str("<details>\n");
            html.push_str(&format!(
                "<summary>{}. {} <span class=\"lang\">{}</span></summary>\n",
                i + 1,
                html_escape(&outcome.prompt),
                outcome.language
            ));
            if outcome.is_answered {
                html.push_str(&format!(
                    "<pre><code>{}</code></pre>\n",
                    html_escape(&outcome.answer)
                ));
            } else {
                html.push_str("<p class=\"meta\">Not answered</p>\n");
            }
            if let Some(expected) = &outcome.expected_output {
                html.push_str(&format!(
                    "<p class=\"meta\">Expected output: <code>{}</code></p>\n",
                    html_escape(expected)
                ));
            }
            html.push_str("</details>\n");
        }
        html.push_str("</section>\n");
    }

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(report).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(report: &Report, path: &Path) -> Result<()> {
    let html = generate_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

fn generate_progress_bar(completion_percent: u32) -> String {
    let max_width = 400;
    let bar_height = 24;
    let width = completion_percent.min(100) as usize * max_width / 100;

    let color = if completion_percent >= 80 {
        "#22c55e"
    } else if completion_percent >= 50 {
        "#eab308"
    } else {
        "#ef4444"
    };

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        max_width + 60,
        bar_height
    );
    svg.push_str(&format!(
        "  <rect x=\"0\" y=\"0\" width=\"{max_width}\" height=\"{bar_height}\" fill=\"var(--border)\" rx=\"4\"/>\n"
    ));
    svg.push_str(&format!(
        "  <rect x=\"0\" y=\"0\" width=\"{width}\" height=\"{bar_height}\" fill=\"{color}\" rx=\"4\"/>\n"
    ));
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{}%</text>\n",
        max_width + 8,
        bar_height / 2,
        completion_percent
    ));
    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --warn: #fef9c3; --fail: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --warn: #713f12; --fail: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
.grade { display: inline-block; font-size: 3rem; font-weight: bold; padding: 0.5rem 1.5rem; border-radius: 8px; }
.lang { color: #6b7280; font-size: 0.8rem; margin-left: 0.5rem; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); }
.pass { background: var(--pass); }
.warn { background: var(--warn); }
.fail { background: var(--fail); }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;
