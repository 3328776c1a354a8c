//! roster-server library
//!
//! Employee roster service: CRUD and conditional queries over SQLite, plus a
//! bulk import pipeline fed by a JSON document.

use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod cli;
pub mod db;
pub mod error;
pub mod import;
pub mod pagination;
pub mod query;

use db::EmployeeStore;
use import::{FeedSource, ImportPipeline};
use query::ConditionQueryEngine;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EmployeeStore>,
    pub engine: ConditionQueryEngine,
    pub pipeline: ImportPipeline,
}

impl AppState {
    /// Wire the query engine and import pipeline to one store
    pub fn new(store: Arc<dyn EmployeeStore>, feed: Arc<dyn FeedSource>) -> Self {
        Self {
            engine: ConditionQueryEngine::new(store.clone()),
            pipeline: ImportPipeline::new(store.clone(), feed),
            store,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let employees = Router::new()
        .route(
            "/api/employees",
            get(api::list_employees).post(api::create_employee),
        )
        .route("/api/employees/active", get(api::active_employees))
        .route("/api/employees/search", get(api::search_employees))
        .route("/api/employees/page", get(api::page_employees))
        .route("/api/employees/level/:level", get(api::employees_by_level))
        .route("/api/employees/sync", post(api::sync_employees))
        .route("/api/employees/truncate", post(api::truncate_employees))
        .route(
            "/api/employees/:user_id",
            get(api::get_employee)
                .put(api::update_employee)
                .delete(api::delete_employee),
        );

    Router::new()
        .merge(employees)
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
