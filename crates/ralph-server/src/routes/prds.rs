use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use ralph_core::prd::{GenerateRequest, TechStack, TechStackPreset};
use ralph_core::store::StoredPrd;

use crate::error::AppError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

/// Tech stack selector: either a preset name or a full custom stack.
#[derive(serde::Deserialize)]
#[serde(untagged)]
pub enum TechStackBody {
    Preset(String),
    Custom(TechStack),
}

#[derive(serde::Deserialize)]
pub struct GenerateBody {
    pub project_name: String,
    pub description: String,
    #[serde(default)]
    pub starter_prompt: String,
    #[serde(default)]
    pub tech_stack: Option<TechStackBody>,
    pub task_count: u32,
}

impl GenerateBody {
    fn into_request(self) -> Result<GenerateRequest, AppError> {
        let tech_stack = match self.tech_stack {
            None => TechStackPreset::PythonFlask.stack(),
            Some(TechStackBody::Preset(name)) => TechStackPreset::parse(&name)?.stack(),
            Some(TechStackBody::Custom(stack)) => stack,
        };
        Ok(GenerateRequest {
            project_name: self.project_name,
            description: self.description,
            starter_prompt: self.starter_prompt,
            tech_stack,
            task_count: self.task_count,
        })
    }
}

#[derive(serde::Deserialize)]
pub struct Pagination {
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_per_page")]
    pub per_page: usize,
}

fn default_page() -> usize {
    1
}

fn default_per_page() -> usize {
    20
}

fn parse_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::bad_request(format!("invalid prd id '{id}'")))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/prds — generate a document and persist it.
pub async fn create_prd(
    State(app): State<AppState>,
    Json(body): Json<GenerateBody>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let request = body.into_request()?;
    let doc = app.assembler.generate(&request).await?;

    let record = StoredPrd::new(doc);
    let stored = record.clone();
    let store = app.store.clone();
    tokio::task::spawn_blocking(move || store.put(&stored))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    tracing::info!(id = %record.id, tasks = record.doc.phases.task_count(), "prd generated");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "id": record.id,
            "created_at": record.created_at,
            "doc": record.doc,
        })),
    ))
}

/// GET /api/prds — paged summaries, newest first.
pub async fn list_prds(
    State(app): State<AppState>,
    Query(page): Query<Pagination>,
) -> Result<Json<serde_json::Value>, AppError> {
    let per_page = page.per_page.clamp(1, 100);
    let store = app.store.clone();
    let (records, total) = tokio::task::spawn_blocking(move || store.list(page.page, per_page))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    let items: Vec<serde_json::Value> = records
        .iter()
        .map(|r| {
            serde_json::json!({
                "id": r.id,
                "pn": r.doc.project_name,
                "pd": r.doc.description,
                "task_count": r.doc.phases.task_count(),
                "created_at": r.created_at,
            })
        })
        .collect();

    Ok(Json(serde_json::json!({ "prds": items, "total": total })))
}

/// GET /api/prds/:id — full stored record.
pub async fn get_prd(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let id = parse_id(&id)?;
    let store = app.store.clone();
    let record = tokio::task::spawn_blocking(move || store.get(id))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::json!({
        "id": record.id,
        "created_at": record.created_at,
        "doc": record.doc,
    })))
}

/// DELETE /api/prds/:id — remove a record wholesale.
pub async fn delete_prd(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let id = parse_id(&id)?;
    let store = app.store.clone();
    tokio::task::spawn_blocking(move || store.delete(id))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::json!({ "deleted": id })))
}
