//! SQLite-backed employee storage

use async_trait::async_trait;
use roster_common::{Employee, EmployeeFilter, Error, Result, Window};
use rust_decimal::Decimal;
use sqlx::{sqlite::SqliteRow, Executor, QueryBuilder, Row, Sqlite, SqlitePool};
use std::str::FromStr;
use tracing::{debug, info};

use super::EmployeeStore;

const SELECT_EMPLOYEES: &str = "SELECT user_id, first_name, last_name, salary, currency, \
     birthdate, is_active, level, created_at, updated_at FROM employees";

/// Employee store on a shared SQLite pool
#[derive(Debug, Clone)]
pub struct SqliteEmployeeStore {
    pool: SqlitePool,
}

impl SqliteEmployeeStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmployeeStore for SqliteEmployeeStore {
    async fn get_by_id(&self, user_id: i32) -> Result<Option<Employee>> {
        let row = sqlx::query(&format!("{} WHERE user_id = ?", SELECT_EMPLOYEES))
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(employee_from_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn get_all(&self) -> Result<Vec<Employee>> {
        self.get_by_condition(&EmployeeFilter::any(), Window::unbounded())
            .await
    }

    async fn get_by_condition(
        &self,
        filter: &EmployeeFilter,
        window: Window,
    ) -> Result<Vec<Employee>> {
        let mut query = QueryBuilder::<Sqlite>::new(SELECT_EMPLOYEES);
        push_filter(&mut query, filter);
        query.push(" ORDER BY user_id ASC");

        if !window.is_unbounded() {
            // SQLite only accepts OFFSET after LIMIT; -1 means no limit
            query.push(" LIMIT ").push_bind(window.limit().unwrap_or(-1));
            if let Some(offset) = window.offset() {
                query.push(" OFFSET ").push_bind(offset);
            }
        }

        debug!("Conditional select: {}", query.sql());

        let rows = query.build().fetch_all(&self.pool).await?;
        let employees = rows
            .iter()
            .map(employee_from_row)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(employees)
    }

    async fn count_by_condition(&self, filter: &EmployeeFilter) -> Result<i64> {
        let mut query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM employees");
        push_filter(&mut query, filter);

        let count = query
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn insert(&self, employee: &Employee) -> Result<u64> {
        insert_employee(&self.pool, employee).await
    }

    async fn insert_batch(&self, employees: &[Employee]) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;

        for employee in employees {
            // Dropping `tx` on the error path rolls the batch back
            inserted += insert_employee(&mut *tx, employee).await?;
        }

        tx.commit().await?;
        Ok(inserted)
    }

    async fn update(&self, employee: &Employee) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE employees
            SET first_name = ?, last_name = ?, salary = ?, currency = ?,
                birthdate = ?, is_active = ?, level = ?, updated_at = ?
            WHERE user_id = ?
            "#,
        )
        .bind(&employee.first_name)
        .bind(&employee.last_name)
        .bind(employee.salary.to_string())
        .bind(&employee.currency)
        .bind(employee.birthdate)
        .bind(employee.is_active)
        .bind(i64::from(employee.level))
        .bind(employee.updated_at)
        .bind(employee.user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn delete_by_id(&self, user_id: i32) -> Result<u64> {
        let result = sqlx::query("DELETE FROM employees WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn truncate(&self) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query("DELETE FROM employees")
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        info!("Truncated employees table ({} rows removed)", result.rows_affected());
        Ok(())
    }
}

/// Append `WHERE` equality predicates for every populated filter field
fn push_filter(query: &mut QueryBuilder<'_, Sqlite>, filter: &EmployeeFilter) {
    if filter.is_empty() {
        return;
    }
    query.push(" WHERE 1 = 1");

    if let Some(last_name) = &filter.last_name {
        query.push(" AND last_name = ").push_bind(last_name.clone());
    }
    if let Some(is_active) = filter.is_active {
        query.push(" AND is_active = ").push_bind(is_active);
    }
    if let Some(level) = filter.level {
        query.push(" AND level = ").push_bind(i64::from(level));
    }
}

async fn insert_employee<'e, E>(executor: E, employee: &Employee) -> Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO employees (
            user_id, first_name, last_name, salary, currency, birthdate,
            is_active, level, created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(employee.user_id)
    .bind(&employee.first_name)
    .bind(&employee.last_name)
    .bind(employee.salary.to_string())
    .bind(&employee.currency)
    .bind(employee.birthdate)
    .bind(employee.is_active)
    .bind(i64::from(employee.level))
    .bind(employee.created_at)
    .bind(employee.updated_at)
    .execute(executor)
    .await
    .map_err(|e| map_insert_error(e, employee.user_id))?;

    Ok(result.rows_affected())
}

fn map_insert_error(err: sqlx::Error, user_id: i32) -> Error {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            Error::Conflict(format!("Employee {} already exists", user_id))
        }
        _ => Error::Database(err),
    }
}

fn employee_from_row(row: &SqliteRow) -> std::result::Result<Employee, sqlx::Error> {
    let salary: String = row.try_get("salary")?;
    let salary = Decimal::from_str(&salary).map_err(|e| sqlx::Error::ColumnDecode {
        index: "salary".to_string(),
        source: Box::new(e),
    })?;

    let level: i64 = row.try_get("level")?;
    let level = u8::try_from(level).map_err(|e| sqlx::Error::ColumnDecode {
        index: "level".to_string(),
        source: Box::new(e),
    })?;

    Ok(Employee {
        user_id: row.try_get("user_id")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        salary,
        currency: row.try_get("currency")?,
        birthdate: row.try_get("birthdate")?,
        is_active: row.try_get("is_active")?,
        level,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, Utc};
    use roster_common::db::init_memory_database;

    fn employee(user_id: i32, last_name: &str, is_active: bool, level: u8) -> Employee {
        let now = Utc::now();
        Employee {
            user_id,
            first_name: format!("First{}", user_id),
            last_name: last_name.to_string(),
            salary: Decimal::from_str("1000.25").unwrap(),
            currency: "USD".to_string(),
            birthdate: NaiveDate::from_ymd_opt(1985, 4, 12).unwrap(),
            is_active,
            level,
            created_at: now,
            updated_at: now,
        }
    }

    async fn store() -> SqliteEmployeeStore {
        SqliteEmployeeStore::new(init_memory_database().await.unwrap())
    }

    #[tokio::test]
    async fn test_insert_and_get_by_id_round_trips_exact_salary() {
        let store = store().await;
        let original = employee(1, "Smith", true, 3);

        assert_eq!(store.insert(&original).await.unwrap(), 1);

        let loaded = store.get_by_id(1).await.unwrap().expect("row exists");
        assert_eq!(loaded, original);
        assert_eq!(loaded.salary.to_string(), "1000.25");
    }

    #[tokio::test]
    async fn test_get_by_id_missing() {
        let store = store().await;
        assert!(store.get_by_id(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_insert_is_conflict() {
        let store = store().await;
        store.insert(&employee(1, "Smith", true, 3)).await.unwrap();

        let err = store.insert(&employee(1, "Jones", false, 1)).await.unwrap_err();
        assert!(matches!(err, Error::Conflict(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_get_all_orders_by_user_id() {
        let store = store().await;
        for id in [5, 2, 9, 1] {
            store.insert(&employee(id, "Smith", true, 1)).await.unwrap();
        }

        let ids: Vec<i32> = store
            .get_all()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.user_id)
            .collect();
        assert_eq!(ids, vec![1, 2, 5, 9]);
    }

    #[tokio::test]
    async fn test_condition_combines_with_and() {
        let store = store().await;
        store.insert(&employee(1, "Smith", true, 3)).await.unwrap();
        store.insert(&employee(2, "Smith", false, 3)).await.unwrap();
        store.insert(&employee(3, "Jones", true, 3)).await.unwrap();
        store.insert(&employee(4, "Smith", true, 4)).await.unwrap();

        let filter = EmployeeFilter {
            last_name: Some("Smith".to_string()),
            is_active: Some(true),
            level: Some(3),
        };
        let rows = store
            .get_by_condition(&filter, Window::unbounded())
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].user_id, 1);
        assert_eq!(store.count_by_condition(&filter).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_last_name_is_exact_match() {
        let store = store().await;
        store.insert(&employee(1, "Smith", true, 3)).await.unwrap();
        store.insert(&employee(2, "Smithson", true, 3)).await.unwrap();

        let rows = store
            .get_by_condition(&EmployeeFilter::by_last_name("Smith"), Window::unbounded())
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].last_name, "Smith");
    }

    #[tokio::test]
    async fn test_window_limit_and_offset() {
        let store = store().await;
        for id in 1..=10 {
            store.insert(&employee(id, "Smith", true, 1)).await.unwrap();
        }
        let any = EmployeeFilter::any();

        let page = store
            .get_by_condition(&any, Window::new(Some(3), Some(4)).unwrap())
            .await
            .unwrap();
        let ids: Vec<i32> = page.iter().map(|e| e.user_id).collect();
        assert_eq!(ids, vec![4, 5, 6, 7]);

        let only_offset = store
            .get_by_condition(&any, Window::new(Some(8), None).unwrap())
            .await
            .unwrap();
        assert_eq!(only_offset.len(), 2);

        let only_limit = store
            .get_by_condition(&any, Window::new(None, Some(2)).unwrap())
            .await
            .unwrap();
        assert_eq!(only_limit.len(), 2);

        // Count ignores the window
        assert_eq!(store.count_by_condition(&any).await.unwrap(), 10);
    }

    #[tokio::test]
    async fn test_update_keeps_created_at() {
        let store = store().await;
        let original = employee(1, "Smith", true, 3);
        store.insert(&original).await.unwrap();

        let mut changed = original.clone();
        changed.last_name = "Jones".to_string();
        changed.level = 7;
        changed.created_at = original.created_at + Duration::days(30);
        changed.updated_at = original.updated_at + Duration::seconds(5);

        assert_eq!(store.update(&changed).await.unwrap(), 1);

        let loaded = store.get_by_id(1).await.unwrap().unwrap();
        assert_eq!(loaded.last_name, "Jones");
        assert_eq!(loaded.level, 7);
        assert_eq!(loaded.created_at, original.created_at);
        assert_eq!(loaded.updated_at, changed.updated_at);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_row_affect_nothing() {
        let store = store().await;
        assert_eq!(store.update(&employee(99, "X", true, 1)).await.unwrap(), 0);
        assert_eq!(store.delete_by_id(99).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_by_id() {
        let store = store().await;
        store.insert(&employee(1, "Smith", true, 3)).await.unwrap();
        assert_eq!(store.delete_by_id(1).await.unwrap(), 1);
        assert!(store.get_by_id(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_batch_rolls_back_on_failure() {
        let store = store().await;
        store.insert(&employee(3, "Existing", true, 1)).await.unwrap();

        let batch = vec![
            employee(1, "A", true, 1),
            employee(2, "B", true, 1),
            employee(3, "Duplicate", true, 1),
            employee(4, "D", true, 1),
        ];
        let err = store.insert_batch(&batch).await.unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));

        let ids: Vec<i32> = store
            .get_all()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.user_id)
            .collect();
        assert_eq!(ids, vec![3], "rows 1 and 2 must be rolled back");
    }

    #[tokio::test]
    async fn test_insert_batch_commits() {
        let store = store().await;
        let batch: Vec<Employee> = (1..=3).map(|id| employee(id, "A", true, 1)).collect();
        assert_eq!(store.insert_batch(&batch).await.unwrap(), 3);
        assert_eq!(store.get_all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_truncate_clears_rows_and_keeps_table() {
        let store = store().await;
        for id in 1..=3 {
            store.insert(&employee(id, "Smith", true, 1)).await.unwrap();
        }

        store.truncate().await.unwrap();
        assert!(store.get_all().await.unwrap().is_empty());

        // Table still usable
        store.insert(&employee(1, "Smith", true, 1)).await.unwrap();
        assert_eq!(store.get_all().await.unwrap().len(), 1);
    }
}
