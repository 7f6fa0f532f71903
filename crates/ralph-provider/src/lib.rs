//! `ralph-provider` — external-service clients for Ralph Mode PRD generation.
//!
//! # Architecture
//!
//! ```text
//! GenerateRequest
//!     │
//!     ▼
//! Assembler       ← screen → prompt → provider call → parse → validate
//!     │              bounded repair re-prompts on malformed output
//!     ▼
//! PrdDocument     ← typed, five fixed phases, unique task ids
//! ```
//!
//! The text-generation capability is a [`Provider`] with two variants —
//! local (Ollama-style) and remote (OpenAI-style) — chosen once from
//! configuration at construction time. [`OcrEngine`] wraps an external
//! `tesseract` binary for folding screenshot text into the starter prompt.

pub mod assembler;
pub mod client;
pub mod error;
pub mod ocr;

pub use assembler::Assembler;
pub use client::{LocalClient, Provider, RemoteClient};
pub use error::{AssembleError, ProviderError};
pub use ocr::OcrEngine;

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, ProviderError>;
