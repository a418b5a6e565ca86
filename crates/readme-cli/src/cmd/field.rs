use crate::output::{print_json, print_suggestions};
use anyhow::Context;
use readme_core::controller::SuggestionOutcome;
use std::io::Read;
use std::path::Path;

fn read_value(value: &str) -> anyhow::Result<String> {
    if value != "-" {
        return Ok(value.to_string());
    }
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("failed to read value from stdin")?;
    Ok(buf.trim_end_matches(['\n', '\r']).to_string())
}

pub fn set(root: &Path, id: &str, value: &str, yes: bool, json: bool) -> anyhow::Result<()> {
    let (_, mut controller) = super::open(root)?;
    let value = read_value(value)?;

    let mut outcome = controller.set_field(id, value.as_str())?;
    if yes && matches!(outcome, Some(SuggestionOutcome::NeedsConfirmation { .. })) {
        outcome = Some(controller.apply_category_suggestions(&value, true));
    }

    if json {
        return print_json(&serde_json::json!({
            "field": id,
            "value": value,
            "suggestions": outcome,
        }));
    }
    println!("Set {id}.");
    if let Some(outcome) = &outcome {
        print_suggestions(outcome);
    }
    Ok(())
}

pub fn toggle(root: &Path, id: &str, on: bool, json: bool) -> anyhow::Result<()> {
    let (_, mut controller) = super::open(root)?;
    controller.set_field(id, on)?;
    if json {
        return print_json(&serde_json::json!({ "field": id, "value": on }));
    }
    println!("{id} is {}.", if on { "on" } else { "off" });
    Ok(())
}

pub fn suggest(root: &Path, category: &str, yes: bool, json: bool) -> anyhow::Result<()> {
    let (_, mut controller) = super::open(root)?;
    let outcome = controller.apply_category_suggestions(category, yes);

    if json {
        return print_json(&outcome);
    }
    print_suggestions(&outcome);
    if let SuggestionOutcome::UnknownCategory { .. } = outcome {
        anyhow::bail!("unknown category '{category}' (see `readme-wizard categories`)");
    }
    Ok(())
}

pub fn categories(root: &Path, json: bool) -> anyhow::Result<()> {
    let (_, controller) = super::open(root)?;
    let labels: Vec<&str> = controller.catalog().labels().collect();
    if json {
        return print_json(&labels);
    }
    for label in labels {
        println!("{label}");
    }
    Ok(())
}
