//! Async driver for a live session.
//!
//! Owns the one-second interval that feeds the engine's clock and applies
//! candidate commands from a channel, one event at a time. The interval is
//! dropped on every exit path, so no tick can reach a torn-down session.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant};

use crate::engine::{SessionEngine, SessionPhase, SessionState, SubmitPrompt, SubmitTrigger};
use crate::error::SessionError;
use crate::model::{Direction, Section};
use crate::scoring::Submission;

/// A candidate action delivered to a running session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    SetMcq { question_id: String, option_index: usize },
    SetCoding { question_id: String, text: String },
    /// Answer the MCQ under the cursor.
    SelectOption { option_index: usize },
    /// Answer the coding question under the cursor.
    WriteCode { text: String },
    Navigate { section: Section, direction: Direction },
    /// Move the cursor of the active section.
    Step(Direction),
    JumpTo { section: Section, index: usize },
    /// Jump within the active section.
    Goto(usize),
    SwitchSection(Section),
    /// Ask for the confirmation summary.
    RequestSubmit,
    ConfirmSubmit,
    /// Report the current state without changing it.
    Status,
    Leave,
}

/// How a driven session ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    Submitted(Submission),
    Abandoned,
}

/// Session notification sink.
pub trait SessionObserver: Send + Sync {
    fn on_tick(&self, remaining_seconds: u32);
    fn on_warning(&self, remaining_seconds: u32);
    fn on_update(&self, state: &SessionState);
    fn on_rejected(&self, error: &SessionError);
    fn on_submit_prompt(&self, prompt: &SubmitPrompt);
    fn on_submitted(&self, submission: &Submission, trigger: SubmitTrigger);
}

/// No-op session observer.
pub struct NoopObserver;

impl SessionObserver for NoopObserver {
    fn on_tick(&self, _: u32) {}
    fn on_warning(&self, _: u32) {}
    fn on_update(&self, _: &SessionState) {}
    fn on_rejected(&self, _: &SessionError) {}
    fn on_submit_prompt(&self, _: &SubmitPrompt) {}
    fn on_submitted(&self, _: &Submission, _: SubmitTrigger) {}
}

/// Drive an active session until it is submitted or abandoned.
///
/// Closing the command channel counts as leaving the session.
pub async fn run_session(
    engine: &mut SessionEngine,
    mut commands: mpsc::Receiver<SessionCommand>,
    observer: &dyn SessionObserver,
) -> SessionOutcome {
    let period = Duration::from_secs(1);
    let mut ticker = interval_at(Instant::now() + period, period);

    while engine.phase() == SessionPhase::Active {
        tokio::select! {
            _ = ticker.tick() => {
                let report = engine.tick();
                if report.warning {
                    observer.on_warning(report.remaining_seconds);
                }
                if let Some(submission) = report.submission {
                    observer.on_submitted(&submission, SubmitTrigger::Expired);
                    return SessionOutcome::Submitted(submission);
                }
                if report.ticked {
                    observer.on_tick(report.remaining_seconds);
                }
            }
            command = commands.recv() => {
                let Some(command) = command else {
                    tracing::debug!("command channel closed");
                    engine.leave();
                    break;
                };
                if let Some(submission) = apply(engine, command, observer) {
                    observer.on_submitted(&submission, SubmitTrigger::Manual);
                    return SessionOutcome::Submitted(submission);
                }
            }
        }
    }

    engine.leave();
    match engine.submission() {
        Some(submission) => SessionOutcome::Submitted(submission.clone()),
        None => SessionOutcome::Abandoned,
    }
}

fn apply(
    engine: &mut SessionEngine,
    command: SessionCommand,
    observer: &dyn SessionObserver,
) -> Option<Submission> {
    let result = match command {
        SessionCommand::SetMcq {
            question_id,
            option_index,
        } => engine.set_mcq_answer(&question_id, option_index),
        SessionCommand::SetCoding { question_id, text } => {
            engine.set_coding_answer(&question_id, &text)
        }
        SessionCommand::SelectOption { option_index } => engine.answer_current_mcq(option_index),
        SessionCommand::WriteCode { text } => engine.answer_current_coding(&text),
        SessionCommand::Navigate { section, direction } => {
            engine.navigate(section, direction).map(|_| ())
        }
        SessionCommand::Step(direction) => engine.navigate(engine.section(), direction).map(|_| ()),
        SessionCommand::JumpTo { section, index } => engine.jump_to(section, index).map(|_| ()),
        SessionCommand::Goto(index) => engine.jump_to(engine.section(), index).map(|_| ()),
        SessionCommand::SwitchSection(section) => engine.switch_section(section),
        SessionCommand::RequestSubmit => match engine.request_submit() {
            Ok(prompt) => {
                observer.on_submit_prompt(&prompt);
                return None;
            }
            Err(e) => Err(e),
        },
        SessionCommand::ConfirmSubmit => return engine.confirm_submit(),
        SessionCommand::Status => Ok(()),
        SessionCommand::Leave => {
            engine.leave();
            return None;
        }
    };

    match result {
        Ok(()) => observer.on_update(&engine.state()),
        Err(e) => observer.on_rejected(&e),
    }
    None
}
