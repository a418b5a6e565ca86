//! Template merge engine.
//!
//! Templates use `{{id}}` placeholders and non-nesting conditional regions
//! `{{#if id}} ... {{/if}}`. A template is tokenized once into segments and
//! rendered in a single pass; substituted values are never rescanned.

use crate::schema::FormSchema;
use crate::types::DataRecord;
use std::collections::HashMap;

/// Output used when a merge produces nothing but whitespace.
pub const EMPTY_DOCUMENT: &str =
    "*Nothing generated yet. Fill in the wizard to build your README.*";

// ---------------------------------------------------------------------------
// Tokenizer
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    Text(&'a str),
    Field(&'a str),
    Section { key: &'a str, body: Vec<Segment<'a>> },
}

struct OpenSection<'a> {
    key: &'a str,
    body: Vec<Segment<'a>>,
    /// Byte offset of the opening tag, for falling back to literal text.
    start: usize,
}

fn is_ident(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Skip one line break directly after a block tag.
fn skip_line_break(template: &str, pos: usize) -> usize {
    let rest = &template[pos..];
    if rest.starts_with("\r\n") {
        pos + 2
    } else if rest.starts_with('\n') {
        pos + 1
    } else {
        pos
    }
}

fn tokenize(template: &str) -> Vec<Segment<'_>> {
    let mut top: Vec<Segment<'_>> = Vec::new();
    let mut open: Option<OpenSection<'_>> = None;
    let mut pos = 0;

    loop {
        let sink = match open.as_mut() {
            Some(section) => &mut section.body,
            None => &mut top,
        };

        let Some(rel) = template[pos..].find("{{") else {
            if pos < template.len() {
                sink.push(Segment::Text(&template[pos..]));
            }
            break;
        };
        let tag_start = pos + rel;
        if tag_start > pos {
            sink.push(Segment::Text(&template[pos..tag_start]));
        }

        let Some(close_rel) = template[tag_start + 2..].find("}}") else {
            sink.push(Segment::Text(&template[tag_start..]));
            break;
        };
        let inner = &template[tag_start + 2..tag_start + 2 + close_rel];
        let tag_end = tag_start + 2 + close_rel + 2;

        if let Some(key) = inner.strip_prefix("#if ").map(str::trim) {
            if is_ident(key) {
                if open.is_none() {
                    open = Some(OpenSection {
                        key,
                        body: Vec::new(),
                        start: tag_start,
                    });
                }
                // Nested openers are dropped.
                pos = skip_line_break(template, tag_end);
                continue;
            }
        } else if inner.trim() == "/if" {
            if let Some(section) = open.take() {
                top.push(Segment::Section {
                    key: section.key,
                    body: section.body,
                });
            }
            pos = skip_line_break(template, tag_end);
            continue;
        } else if is_ident(inner.trim()) {
            sink.push(Segment::Field(inner.trim()));
            pos = tag_end;
            continue;
        }

        sink.push(Segment::Text(&template[tag_start..tag_end]));
        pos = tag_end;
    }

    if let Some(section) = open {
        top.push(Segment::Text(&template[section.start..]));
    }
    top
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Record values for every schema field, passed through the field formatter.
/// Keys outside the schema are not carried.
fn processed_values(record: &DataRecord, schema: &FormSchema) -> HashMap<&'static str, String> {
    schema
        .fields()
        .filter_map(|field| {
            record
                .get(field.id)
                .map(|value| (field.id, field.format(&value.as_text())))
        })
        .collect()
}

fn render_into(segments: &[Segment<'_>], values: &HashMap<&'static str, String>, out: &mut String) {
    for segment in segments {
        match segment {
            Segment::Text(text) => out.push_str(text),
            Segment::Field(key) => {
                if let Some(value) = values.get(key) {
                    out.push_str(value);
                }
            }
            Segment::Section { key, body } => {
                let present = values.get(key).is_some_and(|v| !v.trim().is_empty());
                if present {
                    render_into(body, values, out);
                }
            }
        }
    }
}

/// Merge `record` into `template`. Deterministic and total: malformed markup
/// is emitted literally rather than rejected.
pub fn merge(template: &str, record: &DataRecord, schema: &FormSchema) -> String {
    let segments = tokenize(template);
    let values = processed_values(record, schema);

    let mut out = String::with_capacity(template.len());
    render_into(&segments, &values, &mut out);

    let trimmed = out.trim();
    if trimmed.is_empty() {
        EMPTY_DOCUMENT.to_string()
    } else {
        trimmed.to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SuggestionCatalog;

    fn schema() -> FormSchema {
        FormSchema::standard(&SuggestionCatalog::builtin().unwrap())
    }

    fn record(pairs: &[(&str, &str)]) -> DataRecord {
        pairs.iter().map(|(k, v)| (*k, *v)).collect()
    }

    #[test]
    fn title_and_guarded_license_render() {
        let tpl = "# {{projectTitle}}\n{{#if license}}\nLicense: {{license}}\n{{/if}}\n";
        let out = merge(tpl, &record(&[("projectTitle", "Foo Bar"), ("license", "MIT")]), &schema());
        assert!(out.contains("# Foo Bar"));
        assert!(out.contains("License: MIT"));
        assert!(!out.contains("{{"));
    }

    #[test]
    fn region_for_missing_field_is_dropped_whole() {
        let tpl = "# {{projectTitle}}\n{{#if liveDemoUrl}}\nDemo lives at {{liveDemoUrl}}\n{{/if}}\nEnd";
        let out = merge(tpl, &record(&[("projectTitle", "Foo")]), &schema());
        assert_eq!(out, "# Foo\nEnd");
        assert!(!out.contains("Demo lives at"));
    }

    #[test]
    fn whitespace_only_value_drops_region() {
        let tpl = "{{#if usage}}Usage: {{usage}}{{/if}}tail";
        let out = merge(tpl, &record(&[("usage", "  \n ")]), &schema());
        assert_eq!(out, "tail");
    }

    #[test]
    fn unchecked_toggle_drops_region() {
        let tpl = "a\n{{#if includeFaq}}\n## FAQ\n{{/if}}\nb";
        let mut rec = DataRecord::new();
        rec.set("includeFaq", false);
        assert_eq!(merge(tpl, &rec, &schema()), "a\nb");
        rec.set("includeFaq", true);
        assert_eq!(merge(tpl, &rec, &schema()), "a\n## FAQ\nb");
    }

    #[test]
    fn formatter_is_applied_before_substitution() {
        let tpl = "{{projectTools}}";
        let out = merge(tpl, &record(&[("projectTools", "Git, Docker")]), &schema());
        assert_eq!(out, "* Git\n* Docker");
    }

    #[test]
    fn substituted_values_are_not_rescanned() {
        let tpl = "{{projectTitle}} / {{license}}";
        let out = merge(
            tpl,
            &record(&[("projectTitle", "{{license}}"), ("license", "MIT")]),
            &schema(),
        );
        assert_eq!(out, "{{license}} / MIT");
    }

    #[test]
    fn unknown_placeholders_become_empty() {
        let tpl = "[{{notAField}}]";
        let out = merge(tpl, &record(&[("notAField", "x")]), &schema());
        assert_eq!(out, "[]");
    }

    #[test]
    fn merge_is_deterministic() {
        let tpl = crate::assets::asset_text("templates/professional.md").unwrap();
        let rec = record(&[
            ("projectTitle", "Foo"),
            ("projectDescription", "Bar"),
            ("techStack", "Rust, Go"),
            ("license", "MIT"),
        ]);
        let first = merge(&tpl, &rec, &schema());
        let second = merge(&tpl, &rec, &schema());
        assert_eq!(first, second);
        assert!(first.starts_with("# Foo"));
        assert!(!first.contains("{{"));
    }

    #[test]
    fn empty_output_yields_sentinel() {
        let tpl = "{{#if projectTitle}}\n# {{projectTitle}}\n{{/if}}\n   ";
        assert_eq!(merge(tpl, &DataRecord::new(), &schema()), EMPTY_DOCUMENT);
    }

    #[test]
    fn unmatched_opener_leaves_remainder_literal() {
        let tpl = "A {{#if usage}}B {{usage}}";
        let out = merge(tpl, &record(&[("usage", "x")]), &schema());
        assert_eq!(out, "A {{#if usage}}B {{usage}}");
    }

    #[test]
    fn stray_closer_is_dropped() {
        let out = merge("A{{/if}}B", &DataRecord::new(), &schema());
        assert_eq!(out, "AB");
    }

    #[test]
    fn nested_opener_is_dropped() {
        let tpl = "{{#if usage}}a{{#if license}}b{{/if}}c{{/if}}";
        let out = merge(tpl, &record(&[("usage", "x")]), &schema());
        assert_eq!(out, "abc");
    }

    #[test]
    fn non_identifier_tags_are_literal() {
        let out = merge("x {{ not valid! }} y", &DataRecord::new(), &schema());
        assert_eq!(out, "x {{ not valid! }} y");
    }

    #[test]
    fn unterminated_tag_is_literal() {
        let out = merge("# {{projectTitle", &record(&[("projectTitle", "Foo")]), &schema());
        assert_eq!(out, "# {{projectTitle");
    }

    #[test]
    fn crlf_after_block_tag_is_consumed() {
        let tpl = "a\r\n{{#if usage}}\r\nu\r\n{{/if}}\r\nb";
        let out = merge(tpl, &DataRecord::new(), &schema());
        assert_eq!(out, "a\r\nb");
    }
}
