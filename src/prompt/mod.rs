//! Operator prompting for integration type selection
//!
//! The prompt loop is written against the `PromptSource` trait so tests
//! can drive it with a scripted source instead of a terminal.

use anyhow::Result;
use rustyline::{error::ReadlineError, DefaultEditor};

use crate::manifest::IntegrationType;

/// A line-oriented input source; `None` means the source is exhausted
/// (EOF or interrupt)
pub trait PromptSource {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

/// Terminal-backed source used by the real tool
pub struct InteractivePrompt {
    editor: DefaultEditor,
}

impl InteractivePrompt {
    pub fn new() -> Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }
}

impl PromptSource for InteractivePrompt {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                let _ = self.editor.add_history_entry(line.as_str());
                Ok(Some(line))
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

/// Ask the operator to pick an integration type.
///
/// Loops until a valid choice or `skip` (case-insensitive) is entered.
/// Returns `None` when skipped, or when the input source runs out.
pub fn select_integration_type(
    source: &mut dyn PromptSource,
    integration_name: &str,
) -> Result<Option<IntegrationType>> {
    println!();
    println!("Select the `integration_type` for `{integration_name}`");
    println!("Options: {}", IntegrationType::options());
    println!("Enter 'skip' to skip this integration");

    loop {
        let Some(line) = source.read_line("> ")? else {
            return Ok(None);
        };
        let choice = line.trim().to_lowercase();

        if choice == "skip" {
            return Ok(None);
        }

        match choice.parse::<IntegrationType>() {
            Ok(integration_type) => return Ok(Some(integration_type)),
            Err(_) => println!(
                "Invalid choice. Please select one of: {}, or 'skip'",
                IntegrationType::options()
            ),
        }
    }
}
