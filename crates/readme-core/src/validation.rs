use crate::schema::{FieldKind, FormStep};
use crate::types::DataRecord;
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

static URL_RE: OnceLock<Regex> = OnceLock::new();

fn url_re() -> &'static Regex {
    URL_RE.get_or_init(|| {
        Regex::new(r"^(https?://)?([\da-z.-]+)\.([a-z.]{2,6})([/\w .-]*)*/?$").unwrap()
    })
}

/// Permissive URL shape check. Accepts bare hosts like `example.com/path`.
pub fn is_valid_url(value: &str) -> bool {
    url_re().is_match(value.trim())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub invalid_field_ids: Vec<String>,
}

impl ValidationReport {
    pub fn ok() -> Self {
        Self {
            valid: true,
            invalid_field_ids: Vec::new(),
        }
    }
}

/// Check every field of `step` against `record`. A field is invalid when it
/// is required and blank, or is a URL field holding something that is not a
/// URL. Each field is judged on its own value only.
pub fn validate_step(step: &FormStep, record: &DataRecord) -> ValidationReport {
    let invalid_field_ids: Vec<String> = step
        .fields
        .iter()
        .filter(|field| {
            let blank = record.is_blank(field.id);
            if field.required && blank {
                return true;
            }
            matches!(field.kind, FieldKind::Url) && !blank && !is_valid_url(&record.text(field.id))
        })
        .map(|field| field.id.to_string())
        .collect();

    ValidationReport {
        valid: invalid_field_ids.is_empty(),
        invalid_field_ids,
    }
}
