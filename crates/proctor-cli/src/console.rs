//! Line-oriented console for `proctor take`.
//!
//! Question and option numbers on the console are 1-based.

use proctor_core::clock::format_clock;
use proctor_core::driver::{SessionCommand, SessionObserver};
use proctor_core::engine::{SessionState, SubmitPrompt, SubmitTrigger};
use proctor_core::error::SessionError;
use proctor_core::model::{Direction, Section, TestDefinition};
use proctor_core::scoring::Submission;

pub const HELP: &str = "\
Commands:
  next | prev        move within the current section
  mcq | coding       switch section
  goto N             jump to question N of the current section
  answer N           choose option N for the current MCQ
  code TEXT          set the answer to the current coding question (\\n for newlines)
  status             show the current question
  submit             review before submitting
  confirm            submit now
  quit               leave without submitting";

/// One parsed console line.
#[derive(Debug, PartialEq, Eq)]
pub enum ConsoleInput {
    Command(SessionCommand),
    Help,
    Empty,
}

fn parse_number(arg: &str, what: &str) -> Result<usize, String> {
    let n: usize = arg
        .trim()
        .parse()
        .map_err(|_| format!("expected a {what} number, got '{}'", arg.trim()))?;
    if n == 0 {
        return Err(format!("{what} numbers start at 1"));
    }
    Ok(n - 1)
}

pub fn parse_line(line: &str) -> Result<ConsoleInput, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_lowercase().as_str() {
        "" => return Ok(ConsoleInput::Empty),
        "help" | "?" => return Ok(ConsoleInput::Help),
        "next" | "n" => SessionCommand::Step(Direction::Next),
        "prev" | "p" => SessionCommand::Step(Direction::Prev),
        "mcq" => SessionCommand::SwitchSection(Section::Mcq),
        "coding" => SessionCommand::SwitchSection(Section::Coding),
        "goto" => SessionCommand::Goto(parse_number(rest, "question")?),
        "answer" | "a" => SessionCommand::SelectOption {
            option_index: parse_number(rest, "option")?,
        },
        "code" => SessionCommand::WriteCode {
            text: rest.replace("\\n", "\n"),
        },
        "status" => SessionCommand::Status,
        "submit" => SessionCommand::RequestSubmit,
        "confirm" => SessionCommand::ConfirmSubmit,
        "quit" | "exit" => SessionCommand::Leave,
        other => return Err(format!("unknown command '{other}', type `help`")),
    };
    Ok(ConsoleInput::Command(command))
}

/// Prints session events to stdout.
pub struct ConsoleObserver {
    test: TestDefinition,
}

impl ConsoleObserver {
    pub fn new(test: TestDefinition) -> Self {
        Self { test }
    }

    pub fn render(&self, state: &SessionState) -> String {
        let mut out = format!(
            "[{} left | {:.0}% complete]\n",
            format_clock(state.clock.remaining_seconds),
            state.progress_percent
        );
        match state.section {
            Section::Mcq => match self.test.mcq_questions.get(state.current_mcq_index) {
                Some(q) => {
                    out.push_str(&format!(
                        "MCQ {}/{}: {}\n",
                        state.current_mcq_index + 1,
                        self.test.mcq_questions.len(),
                        q.prompt
                    ));
                    let selected = state.answers.mcq(&q.id).selected();
                    for (i, option) in q.options.iter().enumerate() {
                        let marker = if selected == Some(i) { "*" } else { " " };
                        out.push_str(&format!(" {marker} {}) {option}\n", i + 1));
                    }
                }
                None => out.push_str("This test has no multiple-choice questions.\n"),
            },
            Section::Coding => match self.test.coding_questions.get(state.current_coding_index) {
                Some(q) => {
                    out.push_str(&format!(
                        "Coding {}/{} ({}): {}\n",
                        state.current_coding_index + 1,
                        self.test.coding_questions.len(),
                        q.language,
                        q.prompt
                    ));
                    let answer = state.answers.coding(&q.id);
                    if answer.trim().is_empty() {
                        out.push_str("  (no answer yet)\n");
                    } else {
                        for line in answer.lines() {
                            out.push_str(&format!("  | {line}\n"));
                        }
                    }
                }
                None => out.push_str("This test has no coding questions.\n"),
            },
        }
        out
    }
}

impl SessionObserver for ConsoleObserver {
    fn on_tick(&self, remaining_seconds: u32) {
        if remaining_seconds > 0 && remaining_seconds % 60 == 0 {
            println!("{} remaining", format_clock(remaining_seconds));
        }
    }

    fn on_warning(&self, remaining_seconds: u32) {
        println!(
            "Warning: only {} left. Your answers are submitted automatically when time runs out.",
            format_clock(remaining_seconds)
        );
    }

    fn on_update(&self, state: &SessionState) {
        print!("{}", self.render(state));
    }

    fn on_rejected(&self, error: &SessionError) {
        println!("Rejected: {error}");
    }

    fn on_submit_prompt(&self, prompt: &SubmitPrompt) {
        println!(
            "You answered {}/{} multiple-choice and {}/{} coding questions ({}% complete), {} left.",
            prompt.mcq_answered,
            prompt.mcq_total,
            prompt.coding_answered,
            prompt.coding_total,
            prompt.completion_percent,
            format_clock(prompt.remaining_seconds)
        );
        println!("Type `confirm` to submit, or keep working.");
    }

    fn on_submitted(&self, submission: &Submission, trigger: SubmitTrigger) {
        if trigger == SubmitTrigger::Expired {
            println!("Time is up.");
        }
        println!(
            "Submitted. MCQ score: {}/{}",
            submission.mcq_score, submission.total_mcqs
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cursor_commands() {
        assert_eq!(
            parse_line("next"),
            Ok(ConsoleInput::Command(SessionCommand::Step(Direction::Next)))
        );
        assert_eq!(
            parse_line("  goto 3 "),
            Ok(ConsoleInput::Command(SessionCommand::Goto(2)))
        );
        assert_eq!(
            parse_line("coding"),
            Ok(ConsoleInput::Command(SessionCommand::SwitchSection(
                Section::Coding
            )))
        );
        assert_eq!(parse_line(""), Ok(ConsoleInput::Empty));
        assert_eq!(parse_line("help"), Ok(ConsoleInput::Help));
    }

    #[test]
    fn answers_are_one_based() {
        assert_eq!(
            parse_line("answer 2"),
            Ok(ConsoleInput::Command(SessionCommand::SelectOption {
                option_index: 1
            }))
        );
        assert!(parse_line("answer 0").unwrap_err().contains("start at 1"));
        assert!(parse_line("answer x").is_err());
    }

    #[test]
    fn code_keeps_rest_of_line() {
        assert_eq!(
            parse_line("code def f(s):\\n    return s[::-1]"),
            Ok(ConsoleInput::Command(SessionCommand::WriteCode {
                text: "def f(s):\n    return s[::-1]".into()
            }))
        );
    }

    #[test]
    fn unknown_command() {
        assert!(parse_line("dance").unwrap_err().contains("unknown command"));
    }
}
