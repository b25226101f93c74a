use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, sync::OnceLock};

/// A placeholder found in prompt content: `{{name}}` or `{{name:default}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub default_value: Option<String>,
}

impl Variable {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), default_value: None }
    }

    pub fn with_default(name: impl Into<String>, default_value: Option<String>) -> Self {
        Self { name: name.into(), default_value }
    }
}

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // Names may be any run of characters other than `}` and `:`, including whitespace.
    PATTERN.get_or_init(|| {
        Regex::new(r"\{\{([^}:]+)(?::([^}]*))?\}\}").expect("placeholder pattern is valid")
    })
}

/// Collect the distinct placeholders in `content`, in order of first appearance.
///
/// The default value kept for a name is the one from its first occurrence,
/// even if that occurrence had none and a later one does.
pub fn extract_variables(content: &str) -> Vec<Variable> {
    let mut variables: Vec<Variable> = Vec::new();

    for cap in placeholder_pattern().captures_iter(content) {
        let name = cap[1].trim();
        if variables.iter().any(|v| v.name == name) {
            continue;
        }
        let default_value = cap.get(2).map(|m| m.as_str().trim().to_string());
        variables.push(Variable::with_default(name, default_value));
    }

    variables
}

/// Substitute placeholders with `values`.
///
/// A name missing from `values` is written back as `{{name}}` with any
/// default annotation dropped. An empty string in `values` is substituted as-is.
pub fn replace_variables(content: &str, values: &HashMap<String, String>) -> String {
    placeholder_pattern()
        .replace_all(content, |cap: &Captures| {
            let name = cap[1].trim();
            match values.get(name) {
                Some(value) => value.clone(),
                None => format!("{{{{{}}}}}", name),
            }
        })
        .into_owned()
}

/// Initial dialog values: each variable's default, or an empty string.
pub fn initial_values(variables: &[Variable]) -> HashMap<String, String> {
    variables
        .iter()
        .map(|v| (v.name.clone(), v.default_value.clone().unwrap_or_default()))
        .collect()
}

/// Parse `name=value` pairs given on the command line.
pub fn parse_assignments(pairs: &[String]) -> Result<HashMap<String, String>, String> {
    let mut values = HashMap::new();
    for pair in pairs {
        let (name, value) = pair
            .split_once('=')
            .ok_or_else(|| format!("Expected name=value, got '{}'", pair))?;
        values.insert(name.trim().to_string(), value.to_string());
    }
    Ok(values)
}
