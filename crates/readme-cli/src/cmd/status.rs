use crate::output::{preview, print_json, print_table};
use readme_core::controller::{StepView, WizardState};
use readme_core::schema::FieldKind;
use readme_core::types::FieldValue;
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let (_, controller) = super::open(root)?;
    let status = controller.status();

    if json {
        return print_json(&status);
    }

    match status.state {
        WizardState::Result => println!("Finished. Run `readme-wizard generate` to print the README."),
        WizardState::Step(i) => println!(
            "Step {}/{}: {}",
            i + 1,
            status.total_steps,
            status.step_title
        ),
    }
    println!("Mode: {}", status.mode);
    println!("Filled fields: {}", status.filled_fields);
    Ok(())
}

pub fn step(root: &Path, index: Option<usize>, json: bool) -> anyhow::Result<()> {
    let (_, controller) = super::open(root)?;
    let index = index.unwrap_or_else(|| controller.current_step());
    let view = controller.build_step(index)?;

    if json {
        return print_json(&view);
    }
    print_step(&view);
    Ok(())
}

pub fn print_step(view: &StepView) {
    println!("Step {}/{}: {}\n", view.index + 1, view.total, view.title);
    let rows = view
        .fields
        .iter()
        .map(|f| {
            vec![
                f.id.to_string(),
                kind_name(&f.kind).to_string(),
                if f.required { "yes" } else { "" }.to_string(),
                display_value(&f.value),
            ]
        })
        .collect();
    print_table(&["FIELD", "KIND", "REQUIRED", "VALUE"], rows);
}

fn kind_name(kind: &FieldKind) -> &'static str {
    match kind {
        FieldKind::SingleLine => "text",
        FieldKind::MultiLine => "multiline",
        FieldKind::Url => "url",
        FieldKind::Select { .. } => "select",
        FieldKind::Toggle => "toggle",
    }
}

fn display_value(value: &FieldValue) -> String {
    match value {
        FieldValue::Flag(true) => "on".to_string(),
        FieldValue::Flag(false) => "off".to_string(),
        FieldValue::Text(text) => preview(text, 48),
    }
}
