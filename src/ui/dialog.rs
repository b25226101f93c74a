use colored::*;
use dialoguer::{theme::ColorfulTheme, Confirm, FuzzySelect, Input};
use log::warn;
use std::collections::HashMap;

use crate::clipboard::{DialogResponse, ValuesDialog};
use crate::db::Prompt;
use crate::utils::params::Variable;

/// Asks for each placeholder on the terminal, pre-filled with its default.
///
/// Without a terminal on stdin the initial values are submitted as they are.
#[derive(Default)]
pub struct InteractiveDialog;

impl InteractiveDialog {
    pub fn new() -> Self {
        Self
    }

    fn ask(
        &self,
        variables: &[Variable],
        initial: &HashMap<String, String>,
    ) -> dialoguer::Result<Option<HashMap<String, String>>> {
        let theme = ColorfulTheme::default();
        let mut values = HashMap::new();

        println!("{}", "─".repeat(45).dimmed());
        for variable in variables {
            let start = initial.get(&variable.name).cloned().unwrap_or_default();
            let value = Input::<String>::with_theme(&theme)
                .with_prompt(variable.name.as_str())
                .with_initial_text(start)
                .allow_empty(true)
                .interact_text()?;
            values.insert(variable.name.clone(), value);
        }

        let confirmed = Confirm::with_theme(&theme)
            .with_prompt("Copy to clipboard?")
            .default(true)
            .interact_opt()?;

        Ok(match confirmed {
            Some(true) => Some(values),
            _ => None,
        })
    }
}

impl ValuesDialog for InteractiveDialog {
    fn prompt_for_values(
        &self,
        variables: &[Variable],
        initial: &HashMap<String, String>,
    ) -> DialogResponse {
        if !atty::is(atty::Stream::Stdin) {
            return DialogResponse::Submitted(initial.clone());
        }

        match self.ask(variables, initial) {
            Ok(Some(values)) => DialogResponse::Submitted(values),
            Ok(None) => DialogResponse::Cancelled,
            Err(e) => {
                warn!("Values dialog failed: {}", e);
                DialogResponse::Cancelled
            }
        }
    }
}

/// Submits the initial values overlaid with values fixed up front.
#[derive(Default)]
pub struct PresetDialog {
    values: HashMap<String, String>,
}

impl PresetDialog {
    pub fn new(values: HashMap<String, String>) -> Self {
        Self { values }
    }
}

impl ValuesDialog for PresetDialog {
    fn prompt_for_values(
        &self,
        _variables: &[Variable],
        initial: &HashMap<String, String>,
    ) -> DialogResponse {
        let mut values = initial.clone();
        values.extend(self.values.iter().map(|(k, v)| (k.clone(), v.clone())));
        DialogResponse::Submitted(values)
    }
}

/// Let the user pick a prompt by fuzzy-matching its title.
pub fn pick_prompt(prompts: &[Prompt]) -> anyhow::Result<Option<usize>> {
    if prompts.is_empty() {
        return Ok(None);
    }
    let items: Vec<String> = prompts
        .iter()
        .map(|p| {
            if p.tags.is_empty() {
                p.title.clone()
            } else {
                format!("{}  [{}]", p.title, p.tags.join(", "))
            }
        })
        .collect();

    let selection = FuzzySelect::with_theme(&ColorfulTheme::default())
        .with_prompt("Prompt")
        .items(&items)
        .default(0)
        .interact_opt()?;
    Ok(selection)
}
