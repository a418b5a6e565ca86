//! Interactive walk through every step, backed by the same saved progress as
//! the one-shot commands.

use crate::output::print_suggestions;
use anyhow::Context;
use inquire::error::InquireError;
use inquire::{Confirm, Editor, Select, Text};
use readme_core::controller::{FieldView, FormController, SuggestionOutcome, WizardState};
use readme_core::export;
use readme_core::schema::{FieldKind, PROJECT_TYPE};
use readme_core::types::FieldValue;
use readme_core::workspace::Workspace;
use std::path::Path;

const NO_SELECTION: &str = "(none)";

/// Prompt result; `None` means the user cancelled.
type Answer<T> = anyhow::Result<Option<T>>;

fn answered<T>(result: Result<T, InquireError>) -> Answer<T> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e).context("prompt failed"),
    }
}

pub fn run(root: &Path) -> anyhow::Result<()> {
    let (ws, mut controller) = super::open(root)?;

    if controller.record().is_empty() {
        if !offer_prefill(&ws, &mut controller)? {
            return cancelled();
        }
    }

    loop {
        let index = match controller.state() {
            WizardState::Result => return finish(&ws, &controller),
            WizardState::Step(i) => i,
        };
        let view = controller.build_step(index)?;
        println!("\n== Step {}/{}: {} ==", view.index + 1, view.total, view.title);

        for field in &view.fields {
            if !ask_field(&mut controller, field)? {
                return cancelled();
            }
        }

        if index > 0 {
            let choice = answered(Select::new("Continue?", vec!["Next", "Back"]).prompt())?;
            match choice {
                None => return cancelled(),
                Some("Back") => {
                    controller.retreat();
                    continue;
                }
                Some(_) => {}
            }
        }

        if !controller.advance() {
            let report = controller.validate_step(index)?;
            println!("Please fix: {}", report.invalid_field_ids.join(", "));
        }
    }
}

fn cancelled() -> anyhow::Result<()> {
    println!("\nProgress saved. Run `readme-wizard wizard` to continue.");
    Ok(())
}

/// Returns false when the user cancelled.
fn offer_prefill(ws: &Workspace, controller: &mut FormController) -> anyhow::Result<bool> {
    let url = answered(
        Text::new("GitHub repository to pre-fill from (blank to skip):")
            .with_help_message("https://github.com/<owner>/<repo> or owner/repo")
            .prompt(),
    )?;
    let Some(url) = url else {
        return Ok(false);
    };
    if url.trim().is_empty() {
        return Ok(true);
    }

    match ws.analyze_into(controller, &url, false) {
        Ok(report) => {
            println!("Analyzed {}.", report.repo.full_name());
            if let Some(category) = &report.prefill.category {
                println!("Project type: {category}");
            }
        }
        Err(e) => println!("{}", e.user_message()),
    }
    Ok(true)
}

/// Prompt for one field and store the answer. Returns false on cancel.
fn ask_field(controller: &mut FormController, field: &FieldView) -> anyhow::Result<bool> {
    let label = if field.required {
        format!("{} *", field.label)
    } else {
        field.label.to_string()
    };
    let current = field.value.as_text();

    let value: FieldValue = match &field.kind {
        FieldKind::SingleLine | FieldKind::Url => {
            let mut prompt = Text::new(&label).with_initial_value(&current);
            if !field.placeholder.is_empty() {
                prompt = prompt.with_placeholder(field.placeholder);
            }
            if !field.help_text.is_empty() {
                prompt = prompt.with_help_message(field.help_text);
            }
            match answered(prompt.prompt())? {
                Some(text) => FieldValue::Text(text),
                None => return Ok(false),
            }
        }
        FieldKind::MultiLine => {
            let mut prompt = Editor::new(&label)
                .with_predefined_text(&current)
                .with_file_extension(".md");
            if !field.help_text.is_empty() {
                prompt = prompt.with_help_message(field.help_text);
            }
            match answered(prompt.prompt())? {
                Some(text) => FieldValue::Text(text.trim_end().to_string()),
                None => return Ok(false),
            }
        }
        FieldKind::Select { options } => {
            let shown: Vec<&str> = options
                .iter()
                .map(|o| if o.is_empty() { NO_SELECTION } else { o.as_str() })
                .collect();
            let cursor = options.iter().position(|o| *o == current).unwrap_or(0);
            match answered(Select::new(&label, shown).with_starting_cursor(cursor).prompt())? {
                Some(NO_SELECTION) => FieldValue::Text(String::new()),
                Some(choice) => FieldValue::Text(choice.to_string()),
                None => return Ok(false),
            }
        }
        FieldKind::Toggle => {
            let on = matches!(field.value, FieldValue::Flag(true));
            match answered(Confirm::new(&label).with_default(on).prompt())? {
                Some(on) => FieldValue::Flag(on),
                None => return Ok(false),
            }
        }
    };

    if value == field.value {
        return Ok(true);
    }
    let category = value.as_text();
    let outcome = controller.set_field(field.id, value)?;

    if let Some(SuggestionOutcome::NeedsConfirmation { conflicting }) = &outcome {
        let question = format!(
            "Overwrite {} with suggestions for {category}?",
            conflicting.join(", ")
        );
        match answered(Confirm::new(&question).with_default(false).prompt())? {
            Some(true) => {
                let applied = controller.apply_category_suggestions(&category, true);
                print_suggestions(&applied);
            }
            Some(false) => {}
            None => return Ok(false),
        }
    } else if let Some(applied @ SuggestionOutcome::Applied { .. }) = &outcome {
        if field.id == PROJECT_TYPE {
            print_suggestions(applied);
        }
    }
    Ok(true)
}

fn finish(ws: &Workspace, controller: &FormController) -> anyhow::Result<()> {
    let generated = match controller.output() {
        Some(done) => done.clone(),
        None => controller.generate(),
    };
    if let Some(notice) = &generated.notice {
        println!("note: {notice}");
    }
    println!("\n{}\n", generated.text);

    let path = ws.output_path();
    let question = format!("Write this to {}?", path.display());
    if answered(Confirm::new(&question).with_default(true).prompt())? == Some(true) {
        export::write_markdown(&path, &generated.text)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}
