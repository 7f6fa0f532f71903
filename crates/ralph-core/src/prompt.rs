//! Prompt construction for PRD generation and repair.
//!
//! The instruction given to the provider pins the exact output contract: one
//! JSON object, the five fixed phase keys in order, the short wire field
//! names, and an explicit per-phase task split so the total comes out equal
//! to the requested count.

use crate::prd::{GenerateRequest, PhaseKey};

/// Split `total` tasks across the five phases, remainder round-robin from
/// the first phase. `distribute(12)` is `[3, 3, 2, 2, 2]`.
pub fn distribute(total: u32) -> [u32; 5] {
    let base = total / 5;
    let rem = (total % 5) as usize;
    let mut split = [base; 5];
    for slot in split.iter_mut().take(rem) {
        *slot += 1;
    }
    split
}

/// Build the generation prompt for one request.
pub fn generation_prompt(req: &GenerateRequest) -> String {
    let split = distribute(req.task_count);
    let phase_lines: String = PhaseKey::all()
        .iter()
        .zip(split.iter())
        .map(|(key, n)| {
            format!(
                "  - \"{}\" (display name \"{}\"): exactly {} task(s)\n",
                key.as_str(),
                key.display_name(),
                n
            )
        })
        .collect();

    let oth = req.tech_stack.oth.join(", ");

    format!(
        r#"You are drafting a Ralph Mode PRD: a build plan an autonomous coding agent can execute top to bottom.

Project name: {name}
Project description: {description}
Build instructions from the user: {starter}
Tech stack: {lang} / {fw} / {db} (also: {oth})

Respond with a single JSON object and nothing else. No Markdown fences, no commentary. The object must have exactly these fields:

- "pn": project name (string)
- "pd": project description (string)
- "sp": full build instructions for the agent (string)
- "ts": {{"lang": string, "fw": string, "db": string, "oth": [string]}}
- "fs": proposed file structure as an array of relative paths, in creation order
- "p": an object with exactly these five keys, in this order:
{phases}
Each phase is {{"n": display name, "t": [task]}}. Each task is:
{{"id": string, "ti": short title, "d": what to build and why, "f": the file it primarily touches, "pr": "critical"|"high"|"medium"|"low"}}

Rules:
- Task ids are "<phase>-<n>" (e.g. "security-1") and unique across the whole document.
- The total number of tasks across all phases must be exactly {count}.
- Order tasks so each one only depends on tasks that appear earlier.
- Security tasks cover input validation, secret handling, and auth for this specific project."#,
        name = req.project_name,
        description = req.description,
        starter = req.starter_prompt,
        lang = req.tech_stack.lang,
        fw = req.tech_stack.fw,
        db = req.tech_stack.db,
        oth = oth,
        phases = phase_lines,
        count = req.task_count,
    )
}

/// Build a corrective re-prompt after a malformed completion.
pub fn repair_prompt(req: &GenerateRequest, defects: &str) -> String {
    format!(
        "{}\n\nYour previous response was rejected: {}.\nProduce the corrected JSON object now. Output only the JSON object.",
        generation_prompt(req),
        defects
    )
}
