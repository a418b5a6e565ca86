use anyhow::Context;
use readme_core::paths;
use readme_core::workspace::Workspace;
use std::path::Path;

pub fn run(root: &Path) -> anyhow::Result<()> {
    println!("Initializing readme-wizard in: {}", root.display());
    let created = Workspace::init(root).context("failed to write config.yaml")?;
    if created {
        println!("  created: {}", paths::CONFIG_FILE);
    } else {
        println!("  exists:  {}", paths::CONFIG_FILE);
    }
    println!("\nNext: readme-wizard wizard");
    Ok(())
}
