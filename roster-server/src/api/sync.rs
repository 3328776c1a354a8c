//! Bulk maintenance endpoints

use axum::{extract::State, Json};
use tracing::info;

use crate::import::truncate_roster;
use crate::AppState;

/// POST /api/employees/sync
///
/// Runs the import pipeline against the configured feed. Failures are logged
/// by the pipeline and reported as `false`.
pub async fn sync_employees(State(state): State<AppState>) -> Json<bool> {
    info!("Employee sync requested");
    Json(state.pipeline.sync().await)
}

/// POST /api/employees/truncate
pub async fn truncate_employees(State(state): State<AppState>) -> Json<bool> {
    info!("Employee truncate requested");
    Json(truncate_roster(state.store.as_ref()).await)
}
