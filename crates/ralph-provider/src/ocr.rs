//! Optical text extraction via an external `tesseract` binary.
//!
//! The engine is a pass-through: image bytes in, plain text out. Extracted
//! text is meant to be folded into the starter prompt before generation.

use std::io::Write;
use std::process::Stdio;

use ralph_core::config::OcrConfig;
use tokio::process::Command;

use crate::error::ProviderError;
use crate::Result;

#[derive(Debug, Clone)]
pub struct OcrEngine {
    binary: String,
    language: String,
}

impl OcrEngine {
    pub fn new(config: &OcrConfig) -> Self {
        Self {
            binary: config.binary.clone(),
            language: config.language.clone(),
        }
    }

    /// Whether the configured binary is on PATH.
    pub fn binary_available(&self) -> bool {
        which::which(&self.binary).is_ok()
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Run OCR over raw image bytes and return the extracted text, trimmed.
    ///
    /// The bytes are written to a temp file because tesseract wants a path;
    /// `stdout` as the output target keeps the result on the pipe.
    pub async fn extract(&self, image: &[u8]) -> Result<String> {
        if !self.binary_available() {
            return Err(ProviderError::OcrMissing(self.binary.clone()));
        }

        let mut tmp = tempfile::NamedTempFile::new()?;
        tmp.write_all(image)?;
        tmp.flush()?;

        let output = Command::new(&self.binary)
            .arg(tmp.path())
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ProviderError::Ocr(format!(
                "{} exited with {}: {}",
                self.binary,
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// Append extracted screenshot text to a starter prompt.
pub fn fold_into_prompt(starter_prompt: &str, extracted: &str) -> String {
    if extracted.is_empty() {
        return starter_prompt.to_string();
    }
    if starter_prompt.is_empty() {
        return extracted.to_string();
    }
    format!("{starter_prompt}\n\nText extracted from attached image:\n{extracted}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with_binary(binary: &str) -> OcrEngine {
        OcrEngine::new(&OcrConfig {
            binary: binary.to_string(),
            language: "eng".to_string(),
        })
    }

    #[tokio::test]
    async fn missing_binary_is_reported_distinctly() {
        let engine = engine_with_binary("ralph-test-no-such-ocr-binary");
        let err = engine.extract(b"not an image").await.unwrap_err();
        assert!(matches!(err, ProviderError::OcrMissing(_)));
    }

    #[tokio::test]
    async fn nonzero_exit_maps_to_ocr_error_with_stderr() {
        if which::which("cat").is_err() {
            return;
        }
        // `cat <tmp> stdout -l eng` fails on the extra arguments, which is
        // exactly the non-zero-exit path under test.
        let engine = engine_with_binary("cat");
        let err = engine.extract(b"hello ocr").await.unwrap_err();
        assert!(matches!(err, ProviderError::Ocr(_)));
        assert!(err.to_string().contains("cat"));
    }

    #[tokio::test]
    async fn successful_run_returns_trimmed_stdout() {
        // `true` ignores all arguments and exits 0 with empty stdout, which
        // exercises the success path without requiring tesseract.
        if which::which("true").is_err() {
            return;
        }
        let engine = engine_with_binary("true");
        let text = engine.extract(b"hello ocr").await.unwrap();
        assert_eq!(text, "");
    }

    #[test]
    fn fold_appends_extracted_text() {
        let folded = fold_into_prompt("Build a todo app", "TODO: buy milk");
        assert!(folded.starts_with("Build a todo app"));
        assert!(folded.contains("TODO: buy milk"));
    }

    #[test]
    fn fold_with_empty_extraction_is_identity() {
        assert_eq!(fold_into_prompt("Build a todo app", ""), "Build a todo app");
    }

    #[test]
    fn fold_with_empty_prompt_uses_extraction() {
        assert_eq!(fold_into_prompt("", "menu text"), "menu text");
    }
}
