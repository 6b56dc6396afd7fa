//! Interactive prompt capability.
//!
//! Core services ask the user questions only through [`Prompt`]. The default
//! methods turn raw answers into choices and confirmations, so an
//! implementation only needs [`Prompt::display`] and [`Prompt::read_line`].

mod scripted;
mod terminal;

pub use scripted::ScriptedPrompt;
pub use terminal::TerminalPrompt;

use crate::{Error, Result};

/// Trait for asking the user questions.
pub trait Prompt {
    /// Shows informational text to the user.
    fn display(&self, text: &str);

    /// Shows `message` and reads one line of input, without the line ending.
    ///
    /// # Errors
    ///
    /// Returns an error if input cannot be read.
    fn read_line(&self, message: &str) -> Result<String>;

    /// Asks for a 1-based choice among `count` items and returns it 0-based.
    ///
    /// Re-prompts until the answer is in range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSelection`] if the answer is not a number, or
    /// [`Error::InvalidInput`] if `count` is zero.
    fn choose_index(&self, message: &str, count: usize) -> Result<usize> {
        if count == 0 {
            return Err(Error::InvalidInput("nothing to choose from".to_string()));
        }
        loop {
            let answer = self.read_line(message)?;
            let answer = answer.trim();
            let Ok(choice) = answer.parse::<i64>() else {
                if !is_integer(answer) {
                    return Err(Error::InvalidSelection(format!(
                        "'{answer}' is not a number"
                    )));
                }
                tracing::debug!(answer, count, "Selection out of range");
                continue;
            };

            if let Some(index) = usize::try_from(choice).ok().and_then(|c| c.checked_sub(1))
                && index < count
            {
                return Ok(index);
            }
            tracing::debug!(choice, count, "Selection out of range");
        }
    }

    /// Asks a yes/no question.
    ///
    /// An empty answer returns `default`; `y` or `yes` (any case) is yes.
    ///
    /// # Errors
    ///
    /// Returns an error if input cannot be read.
    fn confirm(&self, message: &str, default: bool) -> Result<bool> {
        let answer = self.read_line(message)?;
        let answer = answer.trim();
        if answer.is_empty() {
            return Ok(default);
        }
        Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
    }
}

/// Returns true for an optionally signed run of ASCII digits.
fn is_integer(answer: &str) -> bool {
    let digits = answer.strip_prefix(['-', '+']).unwrap_or(answer);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}
