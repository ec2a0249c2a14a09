//! The `proctor remove` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(id: String, config_path: Option<PathBuf>) -> Result<()> {
    let workspace = super::open_workspace(config_path)?;
    if !workspace.catalog.remove(&id)? {
        anyhow::bail!("test not found: {id}");
    }
    println!("Removed test {id}");
    Ok(())
}
