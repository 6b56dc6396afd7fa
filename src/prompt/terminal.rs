//! Terminal prompt on stdin/stdout.

// Allow print_stdout for interactive prompts
#![allow(clippy::print_stdout)]

use super::Prompt;
use crate::{Error, Result};
use std::io::{self, BufRead, Write};

/// Prompt that reads answers from stdin.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

impl TerminalPrompt {
    /// Creates a terminal prompt.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Prompt for TerminalPrompt {
    fn display(&self, text: &str) {
        println!("{text}");
    }

    fn read_line(&self, message: &str) -> Result<String> {
        print!("{message}");
        io::stdout().flush().map_err(|e| Error::OperationFailed {
            operation: "flush_stdout".to_string(),
            cause: e.to_string(),
        })?;

        let mut input = String::new();
        let read = io::stdin()
            .lock()
            .read_line(&mut input)
            .map_err(|e| Error::OperationFailed {
                operation: "read_stdin".to_string(),
                cause: e.to_string(),
            })?;
        if read == 0 {
            return Err(Error::OperationFailed {
                operation: "read_stdin".to_string(),
                cause: "end of input".to_string(),
            });
        }

        Ok(input.trim_end_matches(['\r', '\n']).to_string())
    }
}
