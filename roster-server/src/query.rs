//! Condition query engine
//!
//! Turns an [`EmployeeFilter`] plus an optional window into a bounded result
//! set, and counts the same filter independently so callers can compute the
//! number of pages. Nothing is cached between the two calls.

use roster_common::{Employee, EmployeeFilter, Result, Window};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use crate::db::EmployeeStore;

/// One counted page of a filtered result set
#[derive(Debug, Clone, Serialize)]
pub struct EmployeePage {
    pub total_results: i64,
    /// Page number (1-indexed)
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub rows: Vec<Employee>,
}

/// Filtered reads over an [`EmployeeStore`]
#[derive(Clone)]
pub struct ConditionQueryEngine {
    store: Arc<dyn EmployeeStore>,
}

impl ConditionQueryEngine {
    pub fn new(store: Arc<dyn EmployeeStore>) -> Self {
        Self { store }
    }

    /// Rows matching `filter` in `user_id` order, restricted to `window`
    pub async fn fetch(&self, filter: &EmployeeFilter, window: Window) -> Result<Vec<Employee>> {
        debug!(?filter, ?window, "Fetching employees by condition");
        self.store.get_by_condition(filter, window).await
    }

    /// Number of rows matching `filter`, ignoring any window
    pub async fn count(&self, filter: &EmployeeFilter) -> Result<i64> {
        self.store.count_by_condition(filter).await
    }

    /// Count, then fetch the requested 1-based page with the same filter.
    ///
    /// `page_num < 1` or `page_size < 1` is rejected. A page past the end is
    /// returned empty rather than clamped.
    pub async fn page(
        &self,
        filter: &EmployeeFilter,
        page_num: i64,
        page_size: i64,
    ) -> Result<EmployeePage> {
        let window = Window::for_page(page_num, page_size)?;
        let total_results = self.count(filter).await?;
        let rows = self.fetch(filter, window).await?;

        Ok(EmployeePage {
            total_results,
            page: page_num,
            page_size,
            total_pages: total_pages(total_results, page_size),
            rows,
        })
    }

    pub async fn all(&self) -> Result<Vec<Employee>> {
        self.fetch(&EmployeeFilter::any(), Window::unbounded()).await
    }

    pub async fn by_level(&self, level: u8) -> Result<Vec<Employee>> {
        self.fetch(&EmployeeFilter::by_level(level), Window::unbounded())
            .await
    }

    pub async fn active(&self) -> Result<Vec<Employee>> {
        self.fetch(&EmployeeFilter::active(), Window::unbounded())
            .await
    }

    pub async fn by_last_name(&self, last_name: &str) -> Result<Vec<Employee>> {
        self.fetch(&EmployeeFilter::by_last_name(last_name), Window::unbounded())
            .await
    }
}

/// `ceil(total / page_size)`; zero when `page_size` is not positive
pub fn total_pages(total_results: i64, page_size: i64) -> i64 {
    if page_size <= 0 {
        return 0;
    }
    total_results / page_size + i64::from(total_results % page_size != 0)
}
