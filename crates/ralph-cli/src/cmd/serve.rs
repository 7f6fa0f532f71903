use anyhow::Context;
use ralph_core::config::Config;
use std::path::Path;

pub fn run(root: &Path, port: u16) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(ralph_server::serve(root, &config, port))
}
