use rust_embed::Embed;

/// Static resources compiled into the binary: the suggestion catalog and
/// one Markdown template per tone.
#[derive(Embed)]
#[folder = "$CARGO_MANIFEST_DIR/assets/"]
struct CoreAssets;

pub const CATALOG_ASSET: &str = "catalog.yaml";

/// Path of the built-in template for a tone stem, e.g. `templates/concise.md`.
pub fn template_asset(stem: &str) -> String {
    format!("templates/{stem}.md")
}

/// UTF-8 contents of an embedded asset, or `None` when it is not bundled.
pub fn asset_text(path: &str) -> Option<String> {
    let file = <CoreAssets as Embed>::get(path)?;
    String::from_utf8(file.data.into_owned()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Tone;

    #[test]
    fn every_tone_has_a_bundled_template() {
        for tone in Tone::all() {
            let text = asset_text(&template_asset(tone.as_str()));
            assert!(text.is_some(), "missing template for {tone}");
        }
    }

    #[test]
    fn unknown_asset_is_none() {
        assert!(asset_text("templates/nope.md").is_none());
    }
}
