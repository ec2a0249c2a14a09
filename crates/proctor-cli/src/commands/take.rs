//! The `proctor take` command.

use std::io::BufRead;
use std::path::PathBuf;

use anyhow::Result;
use tokio::sync::mpsc;

use proctor_core::clock::format_clock;
use proctor_core::driver::{run_session, SessionCommand, SessionOutcome};
use proctor_core::engine::load_session;

use crate::console::{parse_line, ConsoleInput, ConsoleObserver, HELP};

pub async fn execute(
    test_id: String,
    budget_secs: Option<u32>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let workspace = super::open_workspace(config_path)?;
    let mut session_config = workspace.config.session.session_config();
    if let Some(budget) = budget_secs {
        session_config.budget_seconds = budget;
    }

    let mut engine = load_session(
        &test_id,
        &workspace.catalog,
        workspace.archive.clone(),
        session_config,
    )?;
    let Some(test) = engine.test().cloned() else {
        anyhow::bail!("session for {test_id} did not load");
    };

    println!(
        "{} | {} multiple-choice, {} coding | {} on the clock",
        test.name,
        test.mcq_questions.len(),
        test.coding_questions.len(),
        format_clock(engine.remaining_seconds())
    );
    println!("Type `help` for commands.\n");

    let observer = ConsoleObserver::new(test);
    print!("{}", observer.render(&engine.state()));

    let (tx, rx) = mpsc::channel(16);
    spawn_stdin_reader(tx);

    match run_session(&mut engine, rx, &observer).await {
        SessionOutcome::Submitted(_) => {
            if !engine.is_archived() {
                anyhow::bail!("the submission could not be saved");
            }
            println!("Run `proctor report --id {test_id}` to see your results.");
        }
        SessionOutcome::Abandoned => println!("Left the session without submitting."),
    }

    Ok(())
}

// A plain thread, so a pending stdin read never holds up runtime shutdown.
fn spawn_stdin_reader(tx: mpsc::Sender<SessionCommand>) {
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            match parse_line(&line) {
                Ok(ConsoleInput::Command(command)) => {
                    if tx.blocking_send(command).is_err() {
                        break;
                    }
                }
                Ok(ConsoleInput::Help) => println!("{HELP}"),
                Ok(ConsoleInput::Empty) => {}
                Err(message) => println!("{message}"),
            }
        }
        tracing::debug!("console input closed");
    });
}
