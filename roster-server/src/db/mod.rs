//! Storage gateway for employee rows
//!
//! [`EmployeeStore`] is the seam the query engine and import pipeline are
//! built on; [`SqliteEmployeeStore`] is the production implementation.

use async_trait::async_trait;
use roster_common::{Employee, EmployeeFilter, Result, Window};

mod employees;
pub use employees::SqliteEmployeeStore;

/// Durable CRUD, conditional select, count and truncate over employee rows.
///
/// Write methods return the number of affected rows.
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    async fn get_by_id(&self, user_id: i32) -> Result<Option<Employee>>;

    /// Every row, ordered by `user_id` ascending
    async fn get_all(&self) -> Result<Vec<Employee>>;

    /// Rows matching every populated filter field, ordered by `user_id`
    /// ascending, restricted to `window`
    async fn get_by_condition(&self, filter: &EmployeeFilter, window: Window)
        -> Result<Vec<Employee>>;

    /// Number of rows matching `filter` (no window applied)
    async fn count_by_condition(&self, filter: &EmployeeFilter) -> Result<i64>;

    /// Insert one row. A duplicate `user_id` is [`roster_common::Error::Conflict`].
    async fn insert(&self, employee: &Employee) -> Result<u64>;

    /// Insert rows one at a time inside a single transaction.
    ///
    /// The first failing row aborts the remainder and rolls back the rows
    /// already written by this call.
    async fn insert_batch(&self, employees: &[Employee]) -> Result<u64>;

    /// Rewrite business fields and `updated_at` of the row keyed by `user_id`.
    /// `created_at` is left untouched.
    async fn update(&self, employee: &Employee) -> Result<u64>;

    async fn delete_by_id(&self, user_id: i32) -> Result<u64>;

    /// Remove every row, keeping the table
    async fn truncate(&self) -> Result<()>;
}
