//! Prompt that replays prepared answers.

use super::Prompt;
use crate::{Error, Result};
use std::cell::RefCell;
use std::collections::VecDeque;

/// Prompt answering from a fixed script.
///
/// Records every message shown so callers can assert on what was asked.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: RefCell<VecDeque<String>>,
    transcript: RefCell<Vec<String>>,
}

impl ScriptedPrompt {
    /// Creates a prompt that answers with `answers` in order.
    #[must_use]
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: RefCell::new(answers.into_iter().map(Into::into).collect()),
            transcript: RefCell::new(Vec::new()),
        }
    }

    /// Returns every displayed text and question, in order.
    #[must_use]
    pub fn transcript(&self) -> Vec<String> {
        self.transcript.borrow().clone()
    }

    /// Returns how many answers are left.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.answers.borrow().len()
    }
}

impl Prompt for ScriptedPrompt {
    fn display(&self, text: &str) {
        self.transcript.borrow_mut().push(text.to_string());
    }

    fn read_line(&self, message: &str) -> Result<String> {
        self.transcript.borrow_mut().push(message.to_string());
        self.answers
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| Error::OperationFailed {
                operation: "read_scripted_answer".to_string(),
                cause: "script exhausted".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choose_index_reprompts_out_of_range() {
        let prompt = ScriptedPrompt::new(["0", "-1", "7", " 2 "]);
        let index = prompt.choose_index("Pick: ", 3).expect("valid choice");
        assert_eq!(index, 1);
        assert_eq!(prompt.remaining(), 0);
        assert_eq!(prompt.transcript().len(), 4);
    }

    #[test]
    fn test_choose_index_reprompts_on_overflowing_number() {
        let prompt = ScriptedPrompt::new(["99999999999999999999", "-99999999999999999999", "1"]);
        let index = prompt.choose_index("Pick: ", 3).expect("valid choice");
        assert_eq!(index, 0);
        assert_eq!(prompt.remaining(), 0);
    }

    #[test]
    fn test_choose_index_rejects_non_numeric() {
        for answer in ["two", "", "-", "1.5"] {
            let prompt = ScriptedPrompt::new([answer]);
            let result = prompt.choose_index("Pick: ", 3);
            assert!(matches!(result, Err(Error::InvalidSelection(_))), "{answer:?}");
        }
    }

    #[test]
    fn test_confirm_defaults() {
        let prompt = ScriptedPrompt::new(["", "", "Y", "no", "yes"]);
        assert!(prompt.confirm("? ", true).expect("answer"));
        assert!(!prompt.confirm("? ", false).expect("answer"));
        assert!(prompt.confirm("? ", false).expect("answer"));
        assert!(!prompt.confirm("? ", true).expect("answer"));
        assert!(prompt.confirm("? ", false).expect("answer"));
    }

    #[test]
    fn test_exhausted_script_errors() {
        let prompt = ScriptedPrompt::new(Vec::<String>::new());
        assert!(prompt.read_line("? ").is_err());
    }
}
