use prompt_vault::utils::params::{
    extract_variables, initial_values, parse_assignments, replace_variables, Variable,
};
use std::collections::HashMap;

fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_extract_variables_basic() {
    let vars = extract_variables("Hello {{name}}");

    assert_eq!(vars.len(), 1);
    assert_eq!(vars[0].name, "name");
    assert_eq!(vars[0].default_value, None);
}

#[test]
fn test_extract_variables_with_default() {
    let vars = extract_variables("Translate to {{language:French}}");

    assert_eq!(vars, vec![Variable::with_default("language", Some("French".to_string()))]);
}

#[test]
fn test_extract_multiple_variables_in_order() {
    let vars = extract_variables("{{tone:formal}} email to {{recipient}} about {{topic:the project}}");

    let names: Vec<&str> = vars.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, vec!["tone", "recipient", "topic"]);
    assert_eq!(vars[0].default_value.as_deref(), Some("formal"));
    assert_eq!(vars[1].default_value, None);
    assert_eq!(vars[2].default_value.as_deref(), Some("the project"));
}

#[test]
fn test_extract_variables_trims_name_and_default() {
    let vars = extract_variables("{{  city  :  Paris  }}");

    assert_eq!(vars, vec![Variable::with_default("city", Some("Paris".to_string()))]);
}

#[test]
fn test_extract_variables_first_occurrence_wins() {
    let vars = extract_variables("{{a}} and {{a:default}}");
    assert_eq!(vars, vec![Variable::new("a")]);

    let vars = extract_variables("{{a:first}} {{b}} {{a:second}}");
    assert_eq!(vars.len(), 2);
    assert_eq!(vars[0].default_value.as_deref(), Some("first"));
}

#[test]
fn test_extract_variables_dedupes_on_trimmed_name() {
    let vars = extract_variables("{{name}} {{ name }} {{name:x}}");
    assert_eq!(vars, vec![Variable::new("name")]);
}

#[test]
fn test_extract_variables_none() {
    assert!(extract_variables("No placeholders here").is_empty());
    assert!(extract_variables("").is_empty());
    assert!(extract_variables("{single} {{}} {{unclosed").is_empty());
}

#[test]
fn test_extract_variables_empty_default() {
    let vars = extract_variables("{{name:}}");
    assert_eq!(vars, vec![Variable::with_default("name", Some(String::new()))]);
}

#[test]
fn test_extract_variables_accepts_whitespace_name() {
    // Whitespace-only names are kept as an empty name rather than rejected.
    let vars = extract_variables("before {{   }} after");
    assert_eq!(vars, vec![Variable::new("")]);
}

#[test]
fn test_replace_variables_with_value() {
    let result = replace_variables("Hi {{name:Bob}}", &values(&[("name", "Alice")]));
    assert_eq!(result, "Hi Alice");
}

#[test]
fn test_replace_variables_missing_value_strips_default() {
    let result = replace_variables("Hi {{name:Bob}}", &HashMap::new());
    assert_eq!(result, "Hi {{name}}");
}

#[test]
fn test_replace_variables_empty_map_keeps_plain_placeholders() {
    let content = "Dear {{ recipient }}, see {{doc:README}}. Thanks!";
    let result = replace_variables(content, &HashMap::new());
    assert_eq!(result, "Dear {{recipient}}, see {{doc}}. Thanks!");
}

#[test]
fn test_replace_variables_empty_string_is_a_value() {
    let result = replace_variables("[{{a:x}}][{{b:y}}]", &values(&[("a", "")]));
    assert_eq!(result, "[][{{b}}]");
}

#[test]
fn test_replace_variables_every_occurrence() {
    let result = replace_variables(
        "{{x}} + {{x:1}} = {{ y }}",
        &values(&[("x", "2"), ("y", "4")]),
    );
    assert_eq!(result, "2 + 2 = 4");
}

#[test]
fn test_replace_variables_does_not_expand_values() {
    let result = replace_variables("{{a}}", &values(&[("a", "{{b}}"), ("b", "nope")]));
    assert_eq!(result, "{{b}}");
}

#[test]
fn test_replace_variables_without_placeholders() {
    let content = "Nothing to see {here}";
    assert_eq!(replace_variables(content, &values(&[("here", "x")])), content);
}

#[test]
fn test_replace_variables_is_pure() {
    let content = String::from("Hello {{name:World}}");
    let vals = values(&[("name", "Rust")]);

    let first = replace_variables(&content, &vals);
    let second = replace_variables(&content, &vals);

    assert_eq!(first, second);
    assert_eq!(content, "Hello {{name:World}}");
    assert_eq!(vals.len(), 1);
}

#[test]
fn test_initial_values_use_defaults_or_empty() {
    let vars = extract_variables("{{a:one}} {{b}}");
    let initial = initial_values(&vars);

    assert_eq!(initial.get("a").map(String::as_str), Some("one"));
    assert_eq!(initial.get("b").map(String::as_str), Some(""));
}

#[test]
fn test_parse_assignments() {
    let parsed = parse_assignments(&[
        "name=Alice".to_string(),
        "expr=a=b".to_string(),
        "empty=".to_string(),
    ])
    .unwrap();

    assert_eq!(parsed.get("name").map(String::as_str), Some("Alice"));
    assert_eq!(parsed.get("expr").map(String::as_str), Some("a=b"));
    assert_eq!(parsed.get("empty").map(String::as_str), Some(""));

    assert!(parse_assignments(&["novalue".to_string()]).is_err());
}
