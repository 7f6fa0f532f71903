use crate::output::print_json;
use anyhow::Context;
use ralph_core::config;
use ralph_core::store::PrdStore;
use std::path::Path;

pub fn run(root: &Path, id: &str, json: bool) -> anyhow::Result<()> {
    let id = super::parse_id(id)?;
    let store = PrdStore::open(&config::store_path(root)).context("failed to open PRD store")?;
    let record = store.get(id)?;

    if json {
        return print_json(&record);
    }

    let doc = &record.doc;
    println!("PRD {}", record.id);
    println!("Created: {}", record.created_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("\nProject: {}", doc.project_name);
    println!("{}", doc.description);
    println!(
        "\nStack: {} / {} / {}",
        doc.tech_stack.lang, doc.tech_stack.fw, doc.tech_stack.db
    );
    if !doc.tech_stack.oth.is_empty() {
        println!("Also: {}", doc.tech_stack.oth.join(", "));
    }

    if !doc.file_structure.is_empty() {
        println!("\nFiles:");
        for f in &doc.file_structure {
            println!("  {f}");
        }
    }

    for (key, phase) in doc.phases.iter() {
        println!("\n{} ({} tasks)", key.display_name(), phase.tasks.len());
        for task in &phase.tasks {
            println!("  [{}] {} ({})", task.id, task.title, task.priority.as_str());
        }
    }

    if !doc.starter_prompt.is_empty() {
        println!("\nStarter prompt:\n{}", doc.starter_prompt);
    }
    Ok(())
}
