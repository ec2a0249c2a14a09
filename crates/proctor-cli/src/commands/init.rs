//! The `proctor init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create proctor.toml
    if std::path::Path::new("proctor.toml").exists() {
        println!("proctor.toml already exists, skipping.");
    } else {
        std::fs::write("proctor.toml", SAMPLE_CONFIG)?;
        println!("Created proctor.toml");
    }

    // Create example test
    std::fs::create_dir_all("assessments")?;
    let example_path = std::path::Path::new("assessments/example.toml");
    if example_path.exists() {
        println!("assessments/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_TEST)?;
        println!("Created assessments/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Run: proctor validate --file assessments/example.toml");
    println!("  2. Run: proctor import --file assessments/example.toml");
    println!("  3. Run: proctor take --id example");
    println!("  4. Run: proctor report --id example");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# proctor configuration

# Where the test catalog and submissions are stored.
data_dir = "./proctor-data"

[session]
budget_seconds = 3600
warning_threshold_seconds = 300
"#;

const EXAMPLE_TEST: &str = r#"[test]
id = "example"
name = "Example Screening"
description = "A short example test to get started"

[[mcq]]
id = "http-idempotent"
prompt = "Which HTTP method is idempotent?"
options = ["POST", "PUT", "PATCH"]
correct = 1

[[mcq]]
id = "big-o-lookup"
prompt = "What is the average lookup cost in a hash map?"
options = ["O(1)", "O(log n)", "O(n)"]
correct = 0

[[coding]]
id = "reverse-string"
prompt = "Write a function that returns its string argument reversed."
language = "javascript"
expected_output = "olleh"
"#;
