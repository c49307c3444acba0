//! Line-oriented prompter over any reader/writer pair.

use super::{Answer, Answers, Prompter, Question, QuestionKind};
use crate::error::PromptError;
use std::io::{BufRead, Stdin, StdinLock, Stdout, Write};

/// Asks one question per line, re-asking until validators accept the answer.
///
/// An empty reply takes the question's default.
#[derive(Debug)]
pub struct LinePrompter<R, W> {
    input: R,
    output: W,
}

impl LinePrompter<StdinLock<'static>, Stdout> {
    /// Prompter on the process terminal
    pub fn stdio() -> Self {
        let stdin: Stdin = std::io::stdin();
        Self::new(stdin.lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    /// Prompter reading answers from `input` and writing questions to `output`
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Give back the reader and writer
    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }

    fn read_reply(&mut self) -> Result<Option<String>, PromptError> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn ask_input(&mut self, question: &Question) -> Result<String, PromptError> {
        let mut last_rejection: Option<String> = None;
        loop {
            write!(self.output, "? {}", question.message)?;
            if let Some(default) = question.default.as_deref().filter(|d| !d.is_empty()) {
                write!(self.output, " ({})", default)?;
            }
            write!(self.output, ": ")?;
            self.output.flush()?;

            let Some(reply) = self.read_reply()? else {
                return Err(match last_rejection {
                    Some(reason) => PromptError::ValidationFailed {
                        question: question.name.to_string(),
                        reason,
                    },
                    None => PromptError::InputClosed {
                        question: question.name.to_string(),
                    },
                });
            };

            let answer = if reply.is_empty() {
                question.default.clone().unwrap_or_default()
            } else {
                reply
            };

            if let Some(validate) = question.validate
                && let Err(reason) = validate(&answer)
            {
                writeln!(self.output, ">> {}", reason)?;
                last_rejection = Some(reason);
                continue;
            }

            return Ok(answer);
        }
    }

    fn ask_confirm(&mut self, question: &Question, default: bool) -> Result<bool, PromptError> {
        let hint = if default { "Y/n" } else { "y/N" };
        loop {
            write!(self.output, "? {} ({}): ", question.message, hint)?;
            self.output.flush()?;

            let Some(reply) = self.read_reply()? else {
                return Err(PromptError::InputClosed {
                    question: question.name.to_string(),
                });
            };

            match reply.to_lowercase().as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => writeln!(self.output, ">> Please answer yes or no")?,
            }
        }
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn prompt(&mut self, questions: &[Question]) -> Result<Answers, PromptError> {
        let mut answers = Answers::default();
        for question in questions {
            if !question.is_visible(&answers) {
                log::debug!("Skipping question '{}'", question.name);
                continue;
            }
            let answer = match question.kind {
                QuestionKind::Input => Answer::Text(self.ask_input(question)?),
                QuestionKind::Confirm { default } => {
                    Answer::Confirm(self.ask_confirm(question, default)?)
                }
            };
            answers.insert(question.name, answer);
        }
        Ok(answers)
    }

    fn inform(&mut self, message: &str) -> Result<(), PromptError> {
        writeln!(self.output, "{}", message)?;
        self.output.flush()?;
        Ok(())
    }
}
