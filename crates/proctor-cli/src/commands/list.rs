//! The `proctor list` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use proctor_core::scoring::percent;

pub fn execute(search: Option<String>, config_path: Option<PathBuf>) -> Result<()> {
    let workspace = super::open_workspace(config_path)?;
    let tests = match &search {
        Some(query) => workspace.catalog.search(query),
        None => workspace.catalog.list(),
    };

    if tests.is_empty() {
        match search {
            Some(query) => println!("No tests match '{query}'."),
            None => println!("No tests found. Run `proctor import --file <path>` to add one."),
        }
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "MCQs", "Coding", "Status", "Latest score"]);

    for test in &tests {
        let (status, latest) = match workspace.archive.latest_for(&test.id) {
            Some(s) => (
                "completed",
                format!(
                    "{}/{} ({}%)",
                    s.mcq_score,
                    s.total_mcqs,
                    percent(s.mcq_score as usize, s.total_mcqs as usize)
                ),
            ),
            None => ("not taken", "-".to_string()),
        };
        table.add_row(vec![
            Cell::new(&test.id),
            Cell::new(&test.name),
            Cell::new(test.mcq_questions.len()),
            Cell::new(test.coding_questions.len()),
            Cell::new(status),
            Cell::new(latest),
        ]);
    }

    println!("{table}");
    Ok(())
}
