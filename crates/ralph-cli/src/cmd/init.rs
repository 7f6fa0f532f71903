use crate::output::print_json;
use anyhow::Context;
use ralph_core::config::{self, Config};
use ralph_core::store::PrdStore;
use std::path::Path;

/// Create `.ralph/` with a default config and an empty store. Idempotent:
/// an existing config is left untouched.
pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    std::fs::create_dir_all(config::ralph_dir(root)).context("failed to create .ralph/")?;

    let config_path = config::config_path(root);
    let created = if config_path.exists() {
        false
    } else {
        Config::default()
            .save(root)
            .context("failed to write default config")?;
        true
    };

    PrdStore::open(&config::store_path(root)).context("failed to create PRD store")?;

    if json {
        return print_json(&serde_json::json!({
            "root": root,
            "config_created": created,
        }));
    }

    if created {
        println!("Initialized Ralph Mode in {}", root.display());
        println!("  config: {}", config_path.display());
        println!("  store:  {}", config::store_path(root).display());
    } else {
        println!("Ralph Mode already initialized in {}", root.display());
    }
    Ok(())
}
