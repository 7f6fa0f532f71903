use crate::output::print_json;
use anyhow::Context;
use ralph_core::config::{self, Config};
use ralph_core::prd::{GenerateRequest, TechStackPreset};
use ralph_core::store::{PrdStore, StoredPrd};
use ralph_provider::{ocr, Assembler, OcrEngine, Provider};
use std::path::{Path, PathBuf};

pub struct GenerateArgs {
    pub name: String,
    pub description: String,
    pub prompt: String,
    pub stack: String,
    pub tasks: u32,
    pub image: Option<PathBuf>,
}

/// Generate a PRD through the configured provider and store it.
pub fn run(root: &Path, args: GenerateArgs, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let tech_stack = TechStackPreset::parse(&args.stack)?.stack();

    let runtime = tokio::runtime::Runtime::new()?;

    let mut starter_prompt = args.prompt;
    if let Some(image) = &args.image {
        let engine = OcrEngine::new(&config.ocr);
        let bytes =
            std::fs::read(image).with_context(|| format!("failed to read {}", image.display()))?;
        let extracted = runtime
            .block_on(engine.extract(&bytes))
            .context("text extraction failed")?;
        starter_prompt = ocr::fold_into_prompt(&starter_prompt, &extracted);
    }

    let request = GenerateRequest {
        project_name: args.name,
        description: args.description,
        starter_prompt,
        tech_stack,
        task_count: args.tasks,
    };

    let provider = Provider::from_config(&config.provider)?;
    let assembler = Assembler::new(provider, config.generation.clone());
    let doc = runtime.block_on(assembler.generate(&request))?;

    let record = StoredPrd::new(doc);
    let store = PrdStore::open(&config::store_path(root)).context("failed to open PRD store")?;
    store.put(&record)?;

    if json {
        return print_json(&serde_json::json!({
            "id": record.id,
            "created_at": record.created_at,
            "task_count": record.doc.phases.task_count(),
        }));
    }

    println!("Generated PRD {}", record.id);
    println!("  project: {}", record.doc.project_name);
    println!("  tasks:   {}", record.doc.phases.task_count());
    for (key, phase) in record.doc.phases.iter() {
        println!("    {:24} {}", key.display_name(), phase.tasks.len());
    }
    Ok(())
}
