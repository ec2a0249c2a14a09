pub mod import;
pub mod init;
pub mod list;
pub mod remove;
pub mod report;
pub mod take;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::Result;

use proctor_core::archive::{SubmissionArchive, TestCatalog};
use proctor_core::model::TestDefinition;
use proctor_core::parser::{load_test_directory, parse_test_definition};
use proctor_store::ProctorConfig;

/// Catalog and archive over the configured store.
pub struct Workspace {
    pub config: ProctorConfig,
    pub catalog: TestCatalog,
    pub archive: SubmissionArchive,
}

pub fn open_workspace(config_path: Option<PathBuf>) -> Result<Workspace> {
    let config = proctor_store::load_config_from(config_path.as_deref())?;
    let store = proctor_store::open_store(&config)?;
    Ok(Workspace {
        catalog: TestCatalog::new(store.clone()),
        archive: SubmissionArchive::new(store),
        config,
    })
}

/// Load one test file, or every test under a directory.
pub fn load_tests(path: &Path) -> Result<Vec<TestDefinition>> {
    if path.is_dir() {
        load_test_directory(path)
    } else {
        Ok(vec![parse_test_definition(path)?])
    }
}
