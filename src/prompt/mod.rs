//! Declarative interactive prompts.
//!
//! A prompt is an ordered list of [`Question`]s. Each question carries its
//! default, an optional validator and an optional `when` predicate evaluated
//! against the answers collected so far. A [`Prompter`] interprets the list.

mod line;

pub use line::LinePrompter;

use crate::error::PromptError;
use std::collections::BTreeMap;

/// Validator: `Ok(())` accepts the answer, `Err(message)` re-asks with `message`.
pub type Validator = fn(&str) -> Result<(), String>;

/// Visibility predicate evaluated against earlier answers.
pub type Condition = fn(&Answers) -> bool;

/// Kind of answer a question expects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    /// Free text
    Input,
    /// Yes/no with the given default
    Confirm {
        /// Answer used for an empty reply
        default: bool,
    },
}

/// One question of a prompt
#[derive(Debug, Clone)]
pub struct Question {
    /// Kind of answer
    pub kind: QuestionKind,
    /// Key of the answer in [`Answers`]
    pub name: &'static str,
    /// Text shown to the user
    pub message: String,
    /// Answer used for an empty reply (input questions)
    pub default: Option<String>,
    /// Only ask when this returns true
    pub when: Option<Condition>,
    /// Re-ask until this accepts the answer
    pub validate: Option<Validator>,
}

impl Question {
    /// A free-text question
    pub fn input(name: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind: QuestionKind::Input,
            name,
            message: message.into(),
            default: None,
            when: None,
            validate: None,
        }
    }

    /// A yes/no question
    pub fn confirm(name: &'static str, message: impl Into<String>, default: bool) -> Self {
        Self {
            kind: QuestionKind::Confirm { default },
            ..Self::input(name, message)
        }
    }

    /// Set the default answer
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Set the validator
    pub fn with_validator(mut self, validate: Validator) -> Self {
        self.validate = Some(validate);
        self
    }

    /// Set the visibility predicate
    pub fn when(mut self, when: Condition) -> Self {
        self.when = Some(when);
        self
    }

    /// Whether the question should be asked given earlier answers
    pub fn is_visible(&self, answers: &Answers) -> bool {
        self.when.is_none_or(|when| when(answers))
    }
}

/// A collected answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// Free-text answer
    Text(String),
    /// Yes/no answer
    Confirm(bool),
}

/// Answers keyed by question name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Answers {
    values: BTreeMap<String, Answer>,
}

impl Answers {
    /// Record an answer
    pub fn insert(&mut self, name: &str, answer: Answer) {
        self.values.insert(name.to_string(), answer);
    }

    /// Text answer for `name`, if any
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(Answer::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// Whether `name` was answered with yes
    pub fn confirmed(&self, name: &str) -> bool {
        matches!(self.values.get(name), Some(Answer::Confirm(true)))
    }

    /// Text answer for `name`, or an error when it was never asked
    pub fn require_text(&self, name: &str) -> Result<String, PromptError> {
        self.text(name)
            .map(str::to_string)
            .ok_or_else(|| PromptError::MissingAnswer {
                question: name.to_string(),
            })
    }

    /// Number of recorded answers
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no answers were recorded
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Interprets a list of questions
pub trait Prompter {
    /// Ask every visible question in order and return the answers.
    fn prompt(&mut self, questions: &[Question]) -> Result<Answers, PromptError>;

    /// Show context the user needs to answer the next questions.
    fn inform(&mut self, message: &str) -> Result<(), PromptError>;
}

impl<P: Prompter + ?Sized> Prompter for &mut P {
    fn prompt(&mut self, questions: &[Question]) -> Result<Answers, PromptError> {
        (**self).prompt(questions)
    }

    fn inform(&mut self, message: &str) -> Result<(), PromptError> {
        (**self).inform(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_predicate() {
        let question = Question::input("revision", "Version").when(|a| a.confirmed("cache"));
        let mut answers = Answers::default();
        assert!(!question.is_visible(&answers));

        answers.insert("cache", Answer::Confirm(true));
        assert!(question.is_visible(&answers));
    }

    #[test]
    fn test_require_text() {
        let mut answers = Answers::default();
        answers.insert("name", Answer::Text("App".to_string()));
        assert_eq!(answers.require_text("name").unwrap(), "App");
        assert!(matches!(
            answers.require_text("id"),
            Err(PromptError::MissingAnswer { .. })
        ));
        assert!(!answers.confirmed("name"));
    }
}
