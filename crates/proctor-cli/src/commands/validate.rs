//! The `proctor validate` command.

use std::path::PathBuf;

use anyhow::Result;

use proctor_core::parser::{validate_test_definition, Severity};

pub fn execute(path: PathBuf) -> Result<()> {
    let tests = super::load_tests(&path)?;

    let mut total_errors = 0;
    let mut total_warnings = 0;

    for test in &tests {
        println!("Test: {} ({} questions)", test.name, test.total_questions());

        for issue in validate_test_definition(test) {
            let prefix = issue
                .question_id
                .as_ref()
                .map(|id| format!("  [{id}]"))
                .unwrap_or_else(|| "  ".to_string());
            match issue.severity {
                Severity::Error => {
                    println!("{prefix} ERROR: {}", issue.message);
                    total_errors += 1;
                }
                Severity::Warning => {
                    println!("{prefix} WARNING: {}", issue.message);
                    total_warnings += 1;
                }
            }
        }
    }

    if total_errors > 0 {
        anyhow::bail!("{total_errors} error(s) found");
    }

    if total_warnings == 0 {
        println!("All tests valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
