//! Session engine: the state machine for one candidate's attempt.
//!
//! Phases run `Loading -> Active -> Submitting -> Terminated`. Answers and
//! navigation are accepted only while `Active`. Manual confirmation and
//! clock expiry both lead to `Submitting`; a single guard makes sure the
//! submission is built and archived at most once.

use std::fmt;

use chrono::Utc;
use serde::Serialize;

use crate::answers::{AnswerState, AnswerStore};
use crate::archive::{SubmissionArchive, TestCatalog};
use crate::clock::{
    ClockState, SessionClock, DEFAULT_BUDGET_SECONDS, DEFAULT_WARNING_THRESHOLD_SECONDS,
};
use crate::error::SessionError;
use crate::model::{Direction, Section, TestDefinition};
use crate::scoring::{build_submission, percent, progress_percent, score, Submission};

/// Configuration for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Fixed time budget. Never extended or paused.
    pub budget_seconds: u32,
    /// Remaining seconds at which the low-time warning fires.
    pub warning_threshold_seconds: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            budget_seconds: DEFAULT_BUDGET_SECONDS,
            warning_threshold_seconds: DEFAULT_WARNING_THRESHOLD_SECONDS,
        }
    }
}

/// Lifecycle phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    Loading,
    Active,
    Submitting,
    Terminated,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionPhase::Loading => write!(f, "loading"),
            SessionPhase::Active => write!(f, "active"),
            SessionPhase::Submitting => write!(f, "submitting"),
            SessionPhase::Terminated => write!(f, "terminated"),
        }
    }
}

/// What moved the session into `Submitting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitTrigger {
    Manual,
    Expired,
}

impl fmt::Display for SubmitTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitTrigger::Manual => write!(f, "manual"),
            SubmitTrigger::Expired => write!(f, "expired"),
        }
    }
}

/// Full observable state of a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub phase: SessionPhase,
    pub answers: AnswerState,
    pub clock: ClockState,
    pub section: Section,
    pub current_mcq_index: usize,
    pub current_coding_index: usize,
    pub progress_percent: f64,
    pub provisional_mcq_score: u32,
}

/// Data shown to the candidate before they confirm submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitPrompt {
    pub completion_percent: u32,
    pub mcq_answered: usize,
    pub mcq_total: usize,
    pub coding_answered: usize,
    pub coding_total: usize,
    pub remaining_seconds: u32,
}

/// Result of delivering one clock tick to the engine.
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub ticked: bool,
    pub remaining_seconds: u32,
    /// The low-time warning fired on this tick.
    pub warning: bool,
    /// Set when this tick expired the clock and produced the submission.
    pub submission: Option<Submission>,
}

/// The session state machine.
pub struct SessionEngine {
    config: SessionConfig,
    phase: SessionPhase,
    test: Option<TestDefinition>,
    answers: AnswerStore,
    clock: SessionClock,
    section: Section,
    mcq_index: usize,
    coding_index: usize,
    progress_percent: f64,
    provisional_mcq_score: u32,
    submitting: bool,
    archive: SubmissionArchive,
    submission: Option<Submission>,
    archived: bool,
}

/// Open `test_id` from `catalog` as a new active session.
pub fn load_session(
    test_id: &str,
    catalog: &TestCatalog,
    archive: SubmissionArchive,
    config: SessionConfig,
) -> Result<SessionEngine, SessionError> {
    let mut engine = SessionEngine::new(archive, config);
    engine.load(test_id, catalog)?;
    Ok(engine)
}

impl SessionEngine {
    /// A session in `Loading` that will archive into `archive`.
    pub fn new(archive: SubmissionArchive, config: SessionConfig) -> Self {
        Self {
            config,
            phase: SessionPhase::Loading,
            test: None,
            answers: AnswerStore::new(),
            clock: SessionClock::new(config.budget_seconds, config.warning_threshold_seconds),
            section: Section::Mcq,
            mcq_index: 0,
            coding_index: 0,
            progress_percent: 0.0,
            provisional_mcq_score: 0,
            submitting: false,
            archive,
            submission: None,
            archived: false,
        }
    }

    /// Resolve `test_id` and enter `Active`.
    ///
    /// An unknown id terminates the session without a submission.
    pub fn load(
        &mut self,
        test_id: &str,
        catalog: &TestCatalog,
    ) -> Result<SessionState, SessionError> {
        if self.phase != SessionPhase::Loading {
            return Err(SessionError::SessionNotActive { phase: self.phase });
        }
        match catalog.get(test_id) {
            Some(test) => Ok(self.start(test)),
            None => {
                tracing::warn!(test_id, "test not found, terminating session");
                self.phase = SessionPhase::Terminated;
                Err(SessionError::TestNotFound(test_id.to_string()))
            }
        }
    }

    fn start(&mut self, test: TestDefinition) -> SessionState {
        self.answers.initialize(&test);
        self.section = if test.mcq_questions.is_empty() && !test.coding_questions.is_empty() {
            Section::Coding
        } else {
            Section::Mcq
        };
        tracing::info!(
            test_id = %test.id,
            mcqs = test.mcq_questions.len(),
            coding = test.coding_questions.len(),
            budget_secs = self.clock.budget_seconds(),
            "session started"
        );
        self.test = Some(test);
        self.clock.start();
        self.phase = SessionPhase::Active;
        self.recompute();
        self.state()
    }

    fn ensure_active(&self) -> Result<&TestDefinition, SessionError> {
        match (&self.test, self.phase) {
            (Some(test), SessionPhase::Active) => Ok(test),
            _ => Err(SessionError::SessionNotActive { phase: self.phase }),
        }
    }

    fn recompute(&mut self) {
        if let Some(test) = &self.test {
            self.progress_percent = progress_percent(test, self.answers.state());
            self.provisional_mcq_score = score(test, self.answers.state()).0;
        }
    }

    /// Select an option for an MCQ.
    pub fn set_mcq_answer(
        &mut self,
        question_id: &str,
        option_index: usize,
    ) -> Result<(), SessionError> {
        self.ensure_active()?;
        self.answers.set_mcq_answer(question_id, option_index)?;
        self.recompute();
        tracing::debug!(question_id, option_index, progress = self.progress_percent, "mcq answered");
        Ok(())
    }

    /// Replace a coding answer. Empty text marks it unanswered again.
    pub fn set_coding_answer(&mut self, question_id: &str, text: &str) -> Result<(), SessionError> {
        self.ensure_active()?;
        self.answers.set_coding_answer(question_id, text)?;
        self.recompute();
        tracing::debug!(question_id, len = text.len(), progress = self.progress_percent, "coding answered");
        Ok(())
    }

    /// Answer the MCQ under the cursor.
    pub fn answer_current_mcq(&mut self, option_index: usize) -> Result<(), SessionError> {
        let test = self.ensure_active()?;
        let id = test
            .mcq_questions
            .get(self.mcq_index)
            .map(|q| q.id.clone())
            .ok_or_else(|| SessionError::UnknownQuestion(format!("mcq #{}", self.mcq_index + 1)))?;
        self.set_mcq_answer(&id, option_index)
    }

    /// Answer the coding question under the cursor.
    pub fn answer_current_coding(&mut self, text: &str) -> Result<(), SessionError> {
        let test = self.ensure_active()?;
        let id = test
            .coding_questions
            .get(self.coding_index)
            .map(|q| q.id.clone())
            .ok_or_else(|| {
                SessionError::UnknownQuestion(format!("coding #{}", self.coding_index + 1))
            })?;
        self.set_coding_answer(&id, text)
    }

    fn cursor_mut(&mut self, section: Section) -> &mut usize {
        match section {
            Section::Mcq => &mut self.mcq_index,
            Section::Coding => &mut self.coding_index,
        }
    }

    /// Move the cursor of `section` one step, staying within bounds.
    pub fn navigate(&mut self, section: Section, direction: Direction) -> Result<usize, SessionError> {
        let len = self.ensure_active()?.section_len(section);
        self.section = section;
        let cursor = self.cursor_mut(section);
        match direction {
            Direction::Next if *cursor + 1 < len => *cursor += 1,
            Direction::Prev if *cursor > 0 => *cursor -= 1,
            _ => {}
        }
        Ok(*cursor)
    }

    /// Put the cursor of `section` on `index`, clamped to the section.
    pub fn jump_to(&mut self, section: Section, index: usize) -> Result<usize, SessionError> {
        let len = self.ensure_active()?.section_len(section);
        self.section = section;
        let cursor = self.cursor_mut(section);
        *cursor = index.min(len.saturating_sub(1));
        Ok(*cursor)
    }

    pub fn switch_section(&mut self, section: Section) -> Result<(), SessionError> {
        self.ensure_active()?;
        self.section = section;
        Ok(())
    }

    /// Summarize completion for the confirmation step. Does not transition.
    pub fn request_submit(&self) -> Result<SubmitPrompt, SessionError> {
        let test = self.ensure_active()?;
        let answers = self.answers.state();
        let mcq_answered = answers.answered_mcq_count(test);
        let coding_answered = answers.answered_coding_count(test);
        Ok(SubmitPrompt {
            completion_percent: percent(mcq_answered + coding_answered, test.total_questions()),
            mcq_answered,
            mcq_total: test.mcq_questions.len(),
            coding_answered,
            coding_total: test.coding_questions.len(),
            remaining_seconds: self.clock.remaining_seconds(),
        })
    }

    /// Submit after the candidate confirmed. Ignored unless `Active`.
    pub fn confirm_submit(&mut self) -> Option<Submission> {
        if self.phase != SessionPhase::Active {
            tracing::debug!(phase = %self.phase, "submit ignored");
            return None;
        }
        self.submit(SubmitTrigger::Manual)
    }

    /// Advance the clock by one second. Expiry submits the session.
    pub fn tick(&mut self) -> TickReport {
        if self.phase != SessionPhase::Active {
            return TickReport {
                remaining_seconds: self.clock.remaining_seconds(),
                ..TickReport::default()
            };
        }
        let outcome = self.clock.tick();
        if outcome.warning {
            tracing::info!(remaining_secs = outcome.remaining_seconds, "low time warning");
        }
        let submission = if outcome.expired {
            self.submit(SubmitTrigger::Expired)
        } else {
            None
        };
        TickReport {
            ticked: outcome.ticked,
            remaining_seconds: outcome.remaining_seconds,
            warning: outcome.warning,
            submission,
        }
    }

    fn submit(&mut self, trigger: SubmitTrigger) -> Option<Submission> {
        if self.submitting {
            tracing::debug!(%trigger, "submission already in flight");
            return None;
        }
        self.submitting = true;
        self.phase = SessionPhase::Submitting;
        self.clock.stop();
        self.answers.seal();

        let Some(test) = self.test.as_ref() else {
            self.phase = SessionPhase::Terminated;
            return None;
        };

        let submission = build_submission(
            test,
            self.answers.snapshot(),
            self.clock.elapsed_seconds(),
            Utc::now(),
        );
        match self.archive.append(&submission) {
            Ok(()) => self.archived = true,
            Err(e) => tracing::error!(test_id = %test.id, "failed to archive submission: {e:#}"),
        }
        tracing::info!(
            test_id = %submission.test_id,
            %trigger,
            score = submission.mcq_score,
            total = submission.total_mcqs,
            time_spent_secs = submission.time_spent_seconds,
            "session submitted"
        );

        self.phase = SessionPhase::Terminated;
        self.submission = Some(submission.clone());
        Some(submission)
    }

    /// Tear the session down without submitting.
    pub fn leave(&mut self) {
        if self.phase == SessionPhase::Terminated {
            return;
        }
        self.clock.stop();
        self.answers.seal();
        tracing::info!(phase = %self.phase, "session abandoned");
        self.phase = SessionPhase::Terminated;
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn config(&self) -> SessionConfig {
        self.config
    }

    pub fn test(&self) -> Option<&TestDefinition> {
        self.test.as_ref()
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn current_mcq_index(&self) -> usize {
        self.mcq_index
    }

    pub fn current_coding_index(&self) -> usize {
        self.coding_index
    }

    pub fn progress_percent(&self) -> f64 {
        self.progress_percent
    }

    pub fn provisional_mcq_score(&self) -> u32 {
        self.provisional_mcq_score
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.clock.remaining_seconds()
    }

    pub fn is_clock_running(&self) -> bool {
        self.clock.is_running()
    }

    pub fn is_answered(&self, question_id: &str) -> bool {
        self.answers.is_answered(question_id)
    }

    /// The submission, once the session has produced one.
    pub fn submission(&self) -> Option<&Submission> {
        self.submission.as_ref()
    }

    /// Whether the submission reached the archive.
    pub fn is_archived(&self) -> bool {
        self.archived
    }

    pub fn state(&self) -> SessionState {
        SessionState {
            phase: self.phase,
            answers: self.answers.snapshot(),
            clock: self.clock.state(),
            section: self.section,
            current_mcq_index: self.mcq_index,
            current_coding_index: self.coding_index,
            progress_percent: self.progress_percent,
            provisional_mcq_score: self.provisional_mcq_score,
        }
    }
}

impl Drop for SessionEngine {
    fn drop(&mut self) {
        if self.clock.is_running() {
            tracing::debug!(phase = %self.phase, "stopping clock on teardown");
            self.clock.stop();
        }
    }
}
