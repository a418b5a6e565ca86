use crate::output::{print_json, print_suggestions};
use readme_core::controller::SuggestionOutcome;
use std::path::Path;

pub fn run(root: &Path, url: &str, yes: bool, json: bool) -> anyhow::Result<()> {
    let (ws, mut controller) = super::open(root)?;
    let report = ws
        .analyze_into(&mut controller, url, yes)
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;

    if json {
        return print_json(&report);
    }

    println!("Analyzed {}.", report.repo.full_name());
    match &report.prefill.category {
        Some(category) => println!("Project type: {category}"),
        None => println!("Project type: not detected"),
    }
    if !report.languages.is_empty() {
        println!("Languages: {}", report.languages.join(", "));
    }
    if !report.prefill.fields.is_empty() {
        println!("Filled: {}", report.prefill.fields.join(", "));
    }
    if let Some(outcome) = &report.prefill.suggestions {
        if !matches!(outcome, SuggestionOutcome::Applied { .. }) {
            print_suggestions(outcome);
        }
    }
    Ok(())
}
