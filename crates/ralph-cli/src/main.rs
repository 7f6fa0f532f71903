mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "ralph",
    about = "Ralph Mode — generate phased PRD documents from a short project description",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .ralph/ or .git/)
    #[arg(long, global = true, env = "RALPH_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize Ralph Mode in the current project
    Init,

    /// Generate a PRD and store it
    Generate {
        /// Project name
        #[arg(long)]
        name: String,

        /// One-paragraph project description
        #[arg(long)]
        description: String,

        /// Starter prompt for the coding agent (optional)
        #[arg(long, default_value = "")]
        prompt: String,

        /// Tech stack preset: python-flask, python-fastapi, node-express, rust-axum
        #[arg(long, default_value = "python-flask")]
        stack: String,

        /// Total number of tasks across all five phases
        #[arg(long, default_value = "15")]
        tasks: u32,

        /// Screenshot to OCR and fold into the starter prompt
        #[arg(long)]
        image: Option<PathBuf>,
    },

    /// List stored PRDs, newest first
    List {
        /// Page number (1-based)
        #[arg(long, default_value = "1")]
        page: usize,

        /// Records per page
        #[arg(long, default_value = "20")]
        per_page: usize,
    },

    /// Show one stored PRD
    Show { id: String },

    /// Delete one stored PRD
    Delete { id: String },

    /// Run the HTTP API server
    Serve {
        /// Port to listen on (0 = OS-assigned)
        #[arg(long, default_value = "7878")]
        port: u16,
    },

    /// Check the local setup: config, provider, OCR binary, store
    Doctor,
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let root_path = cli.root.as_deref();
    let root = root::resolve_root(root_path);

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root, cli.json),
        Commands::Generate {
            name,
            description,
            prompt,
            stack,
            tasks,
            image,
        } => cmd::generate::run(
            &root,
            cmd::generate::GenerateArgs {
                name,
                description,
                prompt,
                stack,
                tasks,
                image,
            },
            cli.json,
        ),
        Commands::List { page, per_page } => cmd::list::run(&root, page, per_page, cli.json),
        Commands::Show { id } => cmd::show::run(&root, &id, cli.json),
        Commands::Delete { id } => cmd::delete::run(&root, &id, cli.json),
        Commands::Serve { port } => cmd::serve::run(&root, port),
        Commands::Doctor => cmd::doctor::run(&root, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
