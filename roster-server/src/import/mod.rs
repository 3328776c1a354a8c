//! Employee import pipeline
//!
//! Reads one bounded JSON document from a [`FeedSource`], normalizes each
//! record, drops the ones that fail validation and writes the rest through
//! [`EmployeeStore::insert_batch`].
//!
//! Failure policy:
//! - unreadable, empty or malformed document: nothing is written
//! - invalid record: skipped and logged, the batch continues
//! - storage error on any insert: the remaining rows are abandoned and the
//!   rows already written in this run are rolled back

use roster_common::{Error, Result};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::db::EmployeeStore;

pub mod feed;
pub mod record;
pub mod validator;

pub use feed::{feed_for, FeedSource, FileFeed, HttpFeed, MemoryFeed};
pub use record::{parse_legacy_date, ImportRecord};
pub use validator::{is_valid, validate_draft, RequiredField, ValidationFailure};

/// Per-run counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportOutcome {
    /// Elements in the document, including `null` ones
    pub received: usize,
    pub inserted: u64,
    pub skipped: usize,
}

/// Bulk load from a feed document into storage
#[derive(Clone)]
pub struct ImportPipeline {
    store: Arc<dyn EmployeeStore>,
    feed: Arc<dyn FeedSource>,
}

impl ImportPipeline {
    pub fn new(store: Arc<dyn EmployeeStore>, feed: Arc<dyn FeedSource>) -> Self {
        Self { store, feed }
    }

    /// Run the import and report counts; document and storage failures propagate
    pub async fn run(&self) -> Result<ImportOutcome> {
        let source = self.feed.name();
        info!("Reading employee feed {}", source);

        let bytes = self.feed.read().await?;
        let records = parse_document(&bytes, &source)?;
        let received = records.len();
        info!("Parsed {} records from {}", received, source);

        let now = roster_common::time::now();
        let mut accepted = Vec::with_capacity(received);
        let mut skipped = 0;

        for (index, record) in records.into_iter().enumerate() {
            let Some(record) = record else {
                warn!("Skipping null record at index {}", index);
                skipped += 1;
                continue;
            };

            let draft = record.normalize(now);
            if !validator::is_valid(&draft) {
                warn!("Skipping invalid employee record at index {}", index);
                skipped += 1;
                continue;
            }

            match draft.into_employee() {
                Some(employee) => accepted.push(employee),
                None => {
                    warn!("Skipping unstamped employee record at index {}", index);
                    skipped += 1;
                }
            }
        }

        let inserted = self.store.insert_batch(&accepted).await?;

        info!(
            "Employee sync complete: {} received, {} inserted, {} skipped",
            received, inserted, skipped
        );

        Ok(ImportOutcome {
            received,
            inserted,
            skipped,
        })
    }

    /// Run the import, collapsing the result to success/failure
    pub async fn sync(&self) -> bool {
        match self.run().await {
            Ok(_) => true,
            Err(e) => {
                error!("Employee sync from {} failed: {}", self.feed.name(), e);
                false
            }
        }
    }
}

/// Parse the feed document as an ordered array of records.
///
/// Whitespace-only content is [`Error::EmptyDocument`]; anything that is not a
/// JSON array of record objects (or `null`) is [`Error::Json`].
pub fn parse_document(bytes: &[u8], source: &str) -> Result<Vec<Option<ImportRecord>>> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(Error::EmptyDocument(source.to_string()));
    }
    Ok(serde_json::from_slice(bytes)?)
}

/// Remove every employee row; `false` (and an error log) if storage fails
pub async fn truncate_roster(store: &dyn EmployeeStore) -> bool {
    match store.truncate().await {
        Ok(()) => true,
        Err(e) => {
            error!("Failed to truncate employees table: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::SqliteEmployeeStore;
    use async_trait::async_trait;
    use roster_common::db::init_memory_database;
    use roster_common::{Employee, EmployeeFilter, Window};

    const MIXED_FEED: &str = r#"[
        {"UserID":1,"Firstname":"A","Lastname":"B","Salary":1000.00,"Currency":"USD","Birthdate":"/Date(0)/","Active":true,"Level":3},
        {"UserID":2,"Firstname":"","Lastname":"C","Salary":500,"Currency":"USD","Birthdate":"/Date(0)/","Active":true,"Level":1},
        null,
        {"UserID":3,"Firstname":"D","Lastname":"E","Salary":12.5,"Currency":"EUR","Birthdate":"/Date(nope)/","Active":false,"Level":2},
        {"UserID":4,"Firstname":"F","Lastname":"G","Salary":"77.70","Currency":"GBP","Birthdate":"/Date(86400000)/","Active":false,"Level":12}
    ]"#;

    async fn sqlite_store() -> Arc<SqliteEmployeeStore> {
        Arc::new(SqliteEmployeeStore::new(init_memory_database().await.unwrap()))
    }

    fn pipeline(store: Arc<dyn EmployeeStore>, document: &str) -> ImportPipeline {
        ImportPipeline::new(store, Arc::new(MemoryFeed::new("test-feed", document)))
    }

    /// Store whose writes always fail
    struct BrokenStore;

    #[async_trait]
    impl EmployeeStore for BrokenStore {
        async fn get_by_id(&self, _: i32) -> Result<Option<Employee>> {
            Ok(None)
        }
        async fn get_all(&self) -> Result<Vec<Employee>> {
            Ok(Vec::new())
        }
        async fn get_by_condition(&self, _: &EmployeeFilter, _: Window) -> Result<Vec<Employee>> {
            Ok(Vec::new())
        }
        async fn count_by_condition(&self, _: &EmployeeFilter) -> Result<i64> {
            Ok(0)
        }
        async fn insert(&self, _: &Employee) -> Result<u64> {
            Err(Error::Internal("disk on fire".to_string()))
        }
        async fn insert_batch(&self, _: &[Employee]) -> Result<u64> {
            Err(Error::Internal("disk on fire".to_string()))
        }
        async fn update(&self, _: &Employee) -> Result<u64> {
            Err(Error::Internal("disk on fire".to_string()))
        }
        async fn delete_by_id(&self, _: i32) -> Result<u64> {
            Err(Error::Internal("disk on fire".to_string()))
        }
        async fn truncate(&self) -> Result<()> {
            Err(Error::Internal("disk on fire".to_string()))
        }
    }

    #[tokio::test]
    async fn test_invalid_records_are_skipped_not_fatal() {
        let store = sqlite_store().await;
        let outcome = pipeline(store.clone(), MIXED_FEED).run().await.unwrap();

        assert_eq!(
            outcome,
            ImportOutcome {
                received: 5,
                inserted: 2,
                skipped: 3,
            }
        );

        let ids: Vec<i32> = store
            .get_all()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.user_id)
            .collect();
        assert_eq!(ids, vec![1, 4]);
    }

    #[tokio::test]
    async fn test_imported_rows_are_stamped_identically() {
        let store = sqlite_store().await;
        let before = roster_common::time::now();
        assert!(pipeline(store.clone(), MIXED_FEED).sync().await);

        let row = store.get_by_id(4).await.unwrap().unwrap();
        assert_eq!(row.created_at, row.updated_at);
        assert!(row.created_at >= before);
        assert_eq!(row.salary.to_string(), "77.70");
        assert_eq!(row.level, 12);
    }

    #[tokio::test]
    async fn test_empty_document_fails_without_writes() {
        let store = sqlite_store().await;
        for document in ["", "   \n\t"] {
            let err = pipeline(store.clone(), document).run().await.unwrap_err();
            assert!(matches!(err, Error::EmptyDocument(_)), "got {:?}", err);
        }
        assert!(!pipeline(store.clone(), "").sync().await);
        assert!(store.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_document_fails_without_writes() {
        let store = sqlite_store().await;
        let documents = [
            r#"[{"UserID":1,"Firstname":"A""#,
            r#"{"UserID":1}"#,
            r#"[{"UserID":"one"}]"#,
            r#"[{"UserID":1,"Firstname":"A","Lastname":"B","Salary":1,"Currency":"USD","Birthdate":"/Date(0)/","Active":true,"Level":1}, 42]"#,
        ];

        for document in documents {
            let err = pipeline(store.clone(), document).run().await.unwrap_err();
            assert!(matches!(err, Error::Json(_)), "document {:?} gave {:?}", document, err);
        }
        assert!(store.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_out_of_range_level_skips_only_that_record() {
        let store = sqlite_store().await;
        let document = r#"[
            {"UserID":20,"Firstname":"A","Lastname":"B","Salary":1,"Currency":"USD","Birthdate":"/Date(0)/","Active":true,"Level":-1},
            {"UserID":21,"Firstname":"C","Lastname":"D","Salary":2,"Currency":"USD","Birthdate":"/Date(0)/","Active":true,"Level":3}
        ]"#;

        let outcome = pipeline(store.clone(), document).run().await.unwrap();
        assert_eq!(outcome.inserted, 1);
        assert_eq!(outcome.skipped, 1);
        assert!(store.get_by_id(20).await.unwrap().is_none());
        assert!(store.get_by_id(21).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_pre_1970_birthdate_is_skipped() {
        let store = sqlite_store().await;
        let document = r#"[
            {"UserID":30,"Firstname":"A","Lastname":"B","Salary":1,"Currency":"USD","Birthdate":"/Date(-315619200000)/","Active":true,"Level":1}
        ]"#;

        let outcome = pipeline(store.clone(), document).run().await.unwrap();
        assert_eq!(outcome.skipped, 1);
        assert!(store.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_array_succeeds() {
        let store = sqlite_store().await;
        let outcome = pipeline(store, "[]").run().await.unwrap();
        assert_eq!(outcome, ImportOutcome::default());
    }

    #[tokio::test]
    async fn test_duplicate_key_aborts_and_rolls_back_batch() {
        let store = sqlite_store().await;
        let document = r#"[
            {"UserID":10,"Firstname":"A","Lastname":"B","Salary":1,"Currency":"USD","Birthdate":"/Date(0)/","Active":true,"Level":1},
            {"UserID":10,"Firstname":"C","Lastname":"D","Salary":2,"Currency":"USD","Birthdate":"/Date(0)/","Active":true,"Level":1},
            {"UserID":11,"Firstname":"E","Lastname":"F","Salary":3,"Currency":"USD","Birthdate":"/Date(0)/","Active":true,"Level":1}
        ]"#;

        let err = pipeline(store.clone(), document).run().await.unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
        assert!(!pipeline(store.clone(), document).sync().await);
        assert!(store.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_storage_failure_is_sync_false() {
        assert!(!pipeline(Arc::new(BrokenStore), MIXED_FEED).sync().await);
    }

    #[tokio::test]
    async fn test_truncate_roster() {
        let store = sqlite_store().await;
        assert!(pipeline(store.clone(), MIXED_FEED).sync().await);
        assert!(!store.get_all().await.unwrap().is_empty());

        assert!(truncate_roster(store.as_ref()).await);
        assert!(store.get_all().await.unwrap().is_empty());

        assert!(!truncate_roster(&BrokenStore).await);
    }

    #[test]
    fn test_parse_document_keeps_order_and_nulls() {
        let records = parse_document(br#"[{"UserID":2}, null, {"UserID":1}]"#, "inline").unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].as_ref().unwrap().user_id, Some(2));
        assert!(records[1].is_none());
        assert_eq!(records[2].as_ref().unwrap().user_id, Some(1));
    }
}
