use log::{debug, warn};
use std::collections::HashMap;

use super::ClipboardWriter;
use crate::db::Prompt;
use crate::utils::params::{extract_variables, initial_values, replace_variables, Variable};

/// What the values dialog came back with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogResponse {
    Submitted(HashMap<String, String>),
    Cancelled,
}

/// Asks the user for placeholder values.
pub trait ValuesDialog {
    fn prompt_for_values(
        &self,
        variables: &[Variable],
        initial: &HashMap<String, String>,
    ) -> DialogResponse;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    /// The text that ended up on the clipboard.
    Copied(String),
    Cancelled,
    Failed(String),
}

impl CopyOutcome {
    pub fn is_copied(&self) -> bool {
        matches!(self, Self::Copied(_))
    }
}

/// Copy a prompt, asking for placeholder values first when it has any.
///
/// At most one clipboard write happens, and none when the dialog is
/// cancelled. A writer failure is reported in the outcome, not retried.
pub fn resolve_and_copy(
    prompt: &Prompt,
    writer: &dyn ClipboardWriter,
    dialog: &dyn ValuesDialog,
) -> CopyOutcome {
    let variables = extract_variables(&prompt.content);

    let text = if variables.is_empty() {
        prompt.content.clone()
    } else {
        let initial = initial_values(&variables);
        match dialog.prompt_for_values(&variables, &initial) {
            DialogResponse::Submitted(values) => replace_variables(&prompt.content, &values),
            DialogResponse::Cancelled => {
                debug!("Copy of prompt {} cancelled", prompt.id);
                return CopyOutcome::Cancelled;
            }
        }
    };

    match writer.write_text(&text) {
        Ok(()) => CopyOutcome::Copied(text),
        Err(e) => {
            warn!("Copy of prompt {} failed: {}", prompt.id, e);
            CopyOutcome::Failed(e.to_string())
        }
    }
}
