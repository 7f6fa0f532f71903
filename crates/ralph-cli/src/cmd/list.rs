use crate::output::{print_json, print_table};
use anyhow::Context;
use ralph_core::config;
use ralph_core::store::PrdStore;
use std::path::Path;

pub fn run(root: &Path, page: usize, per_page: usize, json: bool) -> anyhow::Result<()> {
    let store = PrdStore::open(&config::store_path(root)).context("failed to open PRD store")?;
    let (records, total) = store.list(page, per_page)?;

    if json {
        #[derive(serde::Serialize)]
        struct Summary {
            id: String,
            project_name: String,
            task_count: usize,
            created_at: String,
        }

        #[derive(serde::Serialize)]
        struct Output {
            prds: Vec<Summary>,
            total: usize,
        }

        let prds = records
            .iter()
            .map(|r| Summary {
                id: r.id.to_string(),
                project_name: r.doc.project_name.clone(),
                task_count: r.doc.phases.task_count(),
                created_at: r.created_at.to_rfc3339(),
            })
            .collect();
        return print_json(&Output { prds, total });
    }

    if records.is_empty() {
        println!("No PRDs stored. Run: ralph generate --name <name> --description <text>");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|r| {
            vec![
                r.id.to_string(),
                r.doc.project_name.clone(),
                r.doc.phases.task_count().to_string(),
                r.created_at.format("%Y-%m-%d %H:%M").to_string(),
            ]
        })
        .collect();
    print_table(&["ID", "PROJECT", "TASKS", "CREATED"], rows);
    println!("\n{} of {} total", records.len(), total);
    Ok(())
}
