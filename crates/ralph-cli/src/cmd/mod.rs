pub mod delete;
pub mod doctor;
pub mod generate;
pub mod init;
pub mod list;
pub mod serve;
pub mod show;

use anyhow::Context;
use uuid::Uuid;

/// Parse a PRD id argument into a Uuid with a readable error.
pub fn parse_id(raw: &str) -> anyhow::Result<Uuid> {
    Uuid::parse_str(raw).with_context(|| format!("'{raw}' is not a valid PRD id"))
}
