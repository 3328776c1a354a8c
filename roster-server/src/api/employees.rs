//! Employee CRUD and query endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use roster_common::{Employee, EmployeeFilter, EmployeeInput, Window};
use serde::Deserialize;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::pagination::{calculate_pagination, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::query::EmployeePage;
use crate::AppState;

/// Filter fields accepted on the query string
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub last_name: Option<String>,
    pub is_active: Option<bool>,
    pub level: Option<u8>,
}

impl SearchQuery {
    fn filter(&self) -> EmployeeFilter {
        EmployeeFilter {
            last_name: non_blank(self.last_name.as_deref()),
            is_active: self.is_active,
            level: self.level,
        }
    }
}

/// An empty `last_name=` on the query string leaves the field unconstrained
fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

/// Filter fields plus page selection
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub last_name: Option<String>,
    pub is_active: Option<bool>,
    pub level: Option<u8>,

    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    pub page: i64,

    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

/// GET /api/employees
pub async fn list_employees(State(state): State<AppState>) -> ApiResult<Json<Vec<Employee>>> {
    Ok(Json(state.engine.all().await?))
}

/// GET /api/employees/:user_id
pub async fn get_employee(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> ApiResult<Json<Employee>> {
    state
        .store
        .get_by_id(user_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("employee {}", user_id)))
}

/// GET /api/employees/level/:level
pub async fn employees_by_level(
    State(state): State<AppState>,
    Path(level): Path<u8>,
) -> ApiResult<Json<Vec<Employee>>> {
    Ok(Json(state.engine.by_level(level).await?))
}

/// GET /api/employees/active
pub async fn active_employees(State(state): State<AppState>) -> ApiResult<Json<Vec<Employee>>> {
    Ok(Json(state.engine.active().await?))
}

/// GET /api/employees/search?last_name=&is_active=&level=
pub async fn search_employees(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<Vec<Employee>>> {
    let rows = state
        .engine
        .fetch(&query.filter(), Window::unbounded())
        .await?;
    Ok(Json(rows))
}

/// GET /api/employees/page?...&page=&page_size=
///
/// The requested page is clamped into `[1, total_pages]`.
pub async fn page_employees(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<EmployeePage>> {
    if !(1..=MAX_PAGE_SIZE).contains(&query.page_size) {
        return Err(ApiError::BadRequest(format!(
            "page_size must be between 1 and {}",
            MAX_PAGE_SIZE
        )));
    }

    let filter = EmployeeFilter {
        last_name: non_blank(query.last_name.as_deref()),
        is_active: query.is_active,
        level: query.level,
    };

    let total_results = state.engine.count(&filter).await?;
    let pagination = calculate_pagination(total_results, query.page, query.page_size);
    let window = Window::new(Some(pagination.offset), Some(query.page_size))?;
    let rows = state.engine.fetch(&filter, window).await?;

    Ok(Json(EmployeePage {
        total_results,
        page: pagination.page,
        page_size: query.page_size,
        total_pages: pagination.total_pages,
        rows,
    }))
}

/// POST /api/employees
pub async fn create_employee(
    State(state): State<AppState>,
    Json(input): Json<EmployeeInput>,
) -> ApiResult<Json<bool>> {
    let employee = Employee::from_input(input, roster_common::time::now())?;
    let affected = state.store.insert(&employee).await?;
    info!("Inserted employee {}", employee.user_id);
    Ok(Json(affected > 0))
}

/// PUT /api/employees/:user_id
///
/// The path id wins over any `user_id` in the body.
pub async fn update_employee(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    Json(mut input): Json<EmployeeInput>,
) -> ApiResult<Json<bool>> {
    input.user_id = Some(user_id);
    let employee = Employee::from_input(input, roster_common::time::now())?;
    let affected = state.store.update(&employee).await?;
    Ok(Json(affected > 0))
}

/// DELETE /api/employees/:user_id
pub async fn delete_employee(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> ApiResult<Json<bool>> {
    let affected = state.store.delete_by_id(user_id).await?;
    if affected > 0 {
        info!("Deleted employee {}", user_id);
    }
    Ok(Json(affected > 0))
}
