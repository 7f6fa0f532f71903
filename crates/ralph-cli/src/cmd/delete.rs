use crate::output::print_json;
use anyhow::Context;
use ralph_core::config;
use ralph_core::store::PrdStore;
use std::path::Path;

pub fn run(root: &Path, id: &str, json: bool) -> anyhow::Result<()> {
    let id = super::parse_id(id)?;
    let store = PrdStore::open(&config::store_path(root)).context("failed to open PRD store")?;
    store.delete(id)?;

    if json {
        return print_json(&serde_json::json!({ "deleted": id }));
    }
    println!("Deleted PRD {id}");
    Ok(())
}
