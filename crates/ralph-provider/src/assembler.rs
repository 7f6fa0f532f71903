//! The PRD assembler: drives one generation request to a validated document.

use std::time::Duration;

use ralph_core::config::GenerationConfig;
use ralph_core::prd::{self, GenerateRequest, PrdDocument};
use ralph_core::{prompt, screen};

use crate::client::Provider;
use crate::error::{AssembleError, ProviderError};

/// Orchestrates screen → prompt → provider → parse → validate → repair.
///
/// Holds no mutable state; concurrent generations are fully independent.
#[derive(Debug, Clone)]
pub struct Assembler {
    provider: Provider,
    generation: GenerationConfig,
}

impl Assembler {
    pub fn new(provider: Provider, generation: GenerationConfig) -> Self {
        Self {
            provider,
            generation,
        }
    }

    pub fn provider(&self) -> &Provider {
        &self.provider
    }

    /// Produce a validated PRD document for `request`.
    ///
    /// Screening runs before any external call. On malformed provider output
    /// the assembler re-prompts with the defect list, up to the configured
    /// attempt budget; duplicate task ids are repaired locally instead of
    /// burning an attempt. The request's own fields (name, description,
    /// starter prompt, tech stack) are authoritative and overwrite whatever
    /// paraphrase the provider produced.
    pub async fn generate(
        &self,
        request: &GenerateRequest,
    ) -> std::result::Result<PrdDocument, AssembleError> {
        screen::screen_request(request, &self.generation)?;

        let attempts = self.generation.repair_attempts.max(1);
        let mut next_prompt = prompt::generation_prompt(request);
        let mut last_defects = String::new();
        let mut last_raw = String::new();

        for attempt in 1..=attempts {
            let raw = self.call(&next_prompt).await?;

            let defects = match prd::parse_completion(&raw) {
                Ok(mut doc) => {
                    let renumbered = doc.renumber_task_ids();
                    if renumbered > 0 {
                        tracing::debug!(renumbered, "repaired task ids in provider output");
                    }
                    let issues = doc.validate(request.task_count);
                    if issues.is_empty() {
                        doc.project_name = request.project_name.clone();
                        doc.description = request.description.clone();
                        doc.starter_prompt = request.starter_prompt.clone();
                        doc.tech_stack = request.tech_stack.clone();
                        return Ok(doc);
                    }
                    prd::describe_issues(&issues)
                }
                Err(e) => format!("output was not a valid PRD JSON object ({e})"),
            };

            tracing::warn!(attempt, %defects, "provider output rejected");
            last_defects = defects;
            last_raw = raw;
            next_prompt = prompt::repair_prompt(request, &last_defects);
        }

        Err(AssembleError::Malformed {
            attempts,
            defects: last_defects,
            raw: last_raw,
        })
    }

    async fn call(&self, prompt: &str) -> std::result::Result<String, ProviderError> {
        let timeout = Duration::from_secs(self.generation.timeout_secs);
        tokio::time::timeout(timeout, self.provider.generate(prompt))
            .await
            .map_err(|_| ProviderError::Timeout(self.generation.timeout_secs))?
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
