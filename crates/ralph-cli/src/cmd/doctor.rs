use crate::output::print_json;
use ralph_core::config::{self, Config};
use ralph_core::store::PrdStore;
use ralph_provider::OcrEngine;
use std::path::Path;

struct Check {
    name: &'static str,
    ok: bool,
    detail: String,
    fatal: bool,
}

/// Inspect the local setup and report what `generate` and `serve` would
/// find at startup. A missing OCR binary is a warning (OCR is optional);
/// a broken config, secret, or store fails the command.
pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let mut checks = Vec::new();

    let config = match Config::load(root) {
        Ok(config) => {
            checks.push(Check {
                name: "config",
                ok: true,
                detail: config::config_path(root).display().to_string(),
                fatal: true,
            });
            config
        }
        Err(e) => {
            checks.push(Check {
                name: "config",
                ok: false,
                detail: e.to_string(),
                fatal: true,
            });
            Config::default()
        }
    };

    let provider_detail = format!("{} ({})", config.provider.kind(), config.provider.model());
    match config.provider.api_key() {
        Ok(_) => checks.push(Check {
            name: "provider",
            ok: true,
            detail: provider_detail,
            fatal: true,
        }),
        Err(e) => checks.push(Check {
            name: "provider",
            ok: false,
            detail: e.to_string(),
            fatal: true,
        }),
    }

    let engine = OcrEngine::new(&config.ocr);
    checks.push(Check {
        name: "ocr",
        ok: engine.binary_available(),
        detail: if engine.binary_available() {
            format!("{} found", engine.binary())
        } else {
            format!("{} not found on PATH", engine.binary())
        },
        fatal: false,
    });

    match PrdStore::open(&config::store_path(root)) {
        Ok(store) => {
            let detail = match store.list(1, 1) {
                Ok((_, total)) => format!("{total} PRDs stored"),
                Err(e) => e.to_string(),
            };
            checks.push(Check {
                name: "store",
                ok: true,
                detail,
                fatal: true,
            });
        }
        Err(e) => checks.push(Check {
            name: "store",
            ok: false,
            detail: e.to_string(),
            fatal: true,
        }),
    }

    if json {
        let entries: Vec<serde_json::Value> = checks
            .iter()
            .map(|c| {
                serde_json::json!({
                    "name": c.name,
                    "ok": c.ok,
                    "detail": c.detail,
                })
            })
            .collect();
        print_json(&entries)?;
    } else {
        for c in &checks {
            let mark = if c.ok {
                "ok"
            } else if c.fatal {
                "FAIL"
            } else {
                "warn"
            };
            println!("{:8} {:4} {}", c.name, mark, c.detail);
        }
    }

    let failed = checks.iter().filter(|c| !c.ok && c.fatal).count();
    if failed > 0 {
        anyhow::bail!("{failed} check(s) failed");
    }
    Ok(())
}
