use readme_core::controller::SuggestionOutcome;
use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    let header_row: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{:width$}", h, width = widths[i]))
        .collect();
    println!("{}", header_row.join("  ").trim_end());

    let sep: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    println!("{}", sep.join("  "));

    for row in &rows {
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let w = widths.get(i).copied().unwrap_or(0);
                format!("{:width$}", cell, width = w)
            })
            .collect();
        println!("{}", cells.join("  ").trim_end());
    }
}

/// First line of `value`, cut to `max` characters with an ellipsis.
pub fn preview(value: &str, max: usize) -> String {
    let first = value.lines().next().unwrap_or("");
    let more = value.lines().nth(1).is_some();
    let mut out: String = first.chars().take(max).collect();
    if more || first.chars().count() > max {
        out.push('…');
    }
    out
}

pub fn print_suggestions(outcome: &SuggestionOutcome) {
    match outcome {
        SuggestionOutcome::Applied { fields } => {
            println!("Suggestions applied to: {}", fields.join(", "));
        }
        SuggestionOutcome::NeedsConfirmation { conflicting } => {
            println!(
                "Suggestions not applied: {} already {} content. Re-run with --yes to overwrite.",
                conflicting.join(", "),
                if conflicting.len() == 1 { "has" } else { "have" }
            );
        }
        SuggestionOutcome::UnknownCategory { category } => {
            println!("No suggestions for '{category}'.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_truncates_and_marks_more() {
        assert_eq!(preview("short", 10), "short");
        assert_eq!(preview("abcdef", 3), "abc…");
        assert_eq!(preview("one\ntwo", 10), "one…");
        assert_eq!(preview("", 10), "");
    }
}
