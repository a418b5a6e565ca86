use crate::output::print_json;
use anyhow::Context;
use readme_core::export;
use std::path::Path;

pub fn run(root: &Path, output: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let (_, controller) = super::open(root)?;
    let generated = controller.generate();

    if let Some(notice) = &generated.notice {
        eprintln!("note: {notice}");
    }

    let Some(path) = output else {
        if json {
            return print_json(&generated);
        }
        println!("{}", generated.text);
        return Ok(());
    };

    export::write_markdown(path, &generated.text)
        .with_context(|| format!("failed to write {}", path.display()))?;
    if json {
        return print_json(&serde_json::json!({
            "path": path,
            "tone": generated.tone,
        }));
    }
    println!("Wrote {}", path.display());
    Ok(())
}
