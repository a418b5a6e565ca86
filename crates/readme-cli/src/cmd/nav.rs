use crate::output::print_json;
use anyhow::Context;
use inquire::error::InquireError;
use inquire::Confirm;
use readme_core::controller::WizardState;
use std::io::IsTerminal;
use std::path::Path;

pub fn next(root: &Path, json: bool) -> anyhow::Result<()> {
    let (_, mut controller) = super::open(root)?;

    let WizardState::Step(index) = controller.state() else {
        println!("The wizard is finished. Run `readme-wizard restart` to edit again.");
        return Ok(());
    };

    let report = controller.validate_step(index)?;
    let advanced = controller.advance();

    if json {
        print_json(&serde_json::json!({
            "advanced": advanced,
            "state": controller.state(),
            "invalid_field_ids": report.invalid_field_ids,
        }))?;
    } else if advanced {
        match controller.state() {
            WizardState::Step(i) => {
                let title = controller.schema().step(i).map(|s| s.title).unwrap_or("");
                println!("Step {}/{}: {title}", i + 1, controller.schema().len());
            }
            WizardState::Result => {
                println!("All steps complete. Run `readme-wizard generate` to get your README.");
            }
        }
    } else {
        for id in &report.invalid_field_ids {
            let label = controller
                .schema()
                .field(id)
                .map(|f| f.label)
                .unwrap_or(id.as_str());
            eprintln!("  invalid: {id} ({label})");
        }
    }

    if !advanced {
        anyhow::bail!("step {} has invalid fields", index + 1);
    }
    Ok(())
}

pub fn back(root: &Path, json: bool) -> anyhow::Result<()> {
    let (_, mut controller) = super::open(root)?;
    controller.retreat();
    if json {
        return print_json(&controller.status());
    }
    let i = controller.current_step();
    let title = controller.schema().step(i).map(|s| s.title).unwrap_or("");
    println!("Step {}/{}: {title}", i + 1, controller.schema().len());
    Ok(())
}

pub fn restart(root: &Path, json: bool) -> anyhow::Result<()> {
    let (_, mut controller) = super::open(root)?;
    let restarted = controller.restart();
    if json {
        return print_json(&serde_json::json!({ "restarted": restarted }));
    }
    if restarted {
        println!("Back to step 1.");
    } else {
        println!("Nothing to restart; the wizard is still in progress.");
    }
    Ok(())
}

pub fn reset(root: &Path, yes: bool, json: bool) -> anyhow::Result<()> {
    let confirmed = yes || (!json && std::io::stdin().is_terminal() && confirm_reset()?);
    if !confirmed {
        anyhow::bail!("reset discards all saved progress; re-run with --yes to confirm");
    }

    let (_, mut controller) = super::open(root)?;
    controller.reset(true).context("failed to clear saved progress")?;
    if json {
        return print_json(&serde_json::json!({ "reset": true }));
    }
    println!("All fields cleared.");
    Ok(())
}

fn confirm_reset() -> anyhow::Result<bool> {
    match Confirm::new("Clear all fields and remove saved progress?")
        .with_default(false)
        .prompt()
    {
        Ok(answer) => Ok(answer),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(false),
        Err(e) => Err(e).context("failed to read confirmation"),
    }
}
