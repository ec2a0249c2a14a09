//! The `proctor import` command.

use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{Context, Result};

use proctor_core::parser::{has_errors, validate_test_definition};

pub fn execute(path: PathBuf, config_path: Option<PathBuf>) -> Result<()> {
    let tests = super::load_tests(&path)?;
    if tests.is_empty() {
        anyhow::bail!("no tests found in {}", path.display());
    }

    // Check everything before touching the catalog
    for test in &tests {
        if has_errors(&validate_test_definition(test)) {
            anyhow::bail!(
                "test '{}' has validation errors; run `proctor validate --file {}`",
                test.name,
                path.display()
            );
        }
    }

    let workspace = super::open_workspace(config_path)?;
    let mut taken: HashSet<String> = workspace.catalog.list().into_iter().map(|t| t.id).collect();
    for test in &tests {
        if !taken.insert(test.id.clone()) {
            anyhow::bail!(
                "a test with id '{}' already exists; nothing was imported",
                test.id
            );
        }
    }

    for test in tests {
        let (id, name) = (test.id.clone(), test.name.clone());
        workspace
            .catalog
            .add(test)
            .with_context(|| format!("failed to import '{name}'"))?;
        println!("Imported {name} ({id})");
    }

    Ok(())
}
