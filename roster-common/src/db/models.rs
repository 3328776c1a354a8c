//! Employee record model
//!
//! Three shapes of the same business record:
//! - [`Employee`]: the persisted row, every field present
//! - [`EmployeeInput`]: insert/update payload, timestamps are never accepted from callers
//! - [`EmployeeDraft`]: a normalized but unvalidated record coming out of the import feed
//!
//! Queries use [`EmployeeFilter`] and [`Window`], never the entity itself.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Documented level range. Not enforced by storage or the import validator.
pub const LEVEL_RANGE: std::ops::RangeInclusive<u8> = 0..=12;

/// Persisted employee row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Caller-assigned unique identifier
    pub user_id: i32,
    pub first_name: String,
    pub last_name: String,
    /// Exact decimal amount
    pub salary: Decimal,
    /// Currency code, e.g. "USD"
    pub currency: String,
    pub birthdate: NaiveDate,
    pub is_active: bool,
    pub level: u8,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Employee {
    /// Build a row from a caller payload, stamping both timestamps with `now`.
    ///
    /// Fails when the payload carries no `user_id`.
    pub fn from_input(input: EmployeeInput, now: DateTime<Utc>) -> Result<Self> {
        let user_id = input
            .user_id
            .ok_or_else(|| Error::InvalidInput("user_id is required".to_string()))?;

        Ok(Self {
            user_id,
            first_name: input.first_name,
            last_name: input.last_name,
            salary: input.salary,
            currency: input.currency,
            birthdate: input.birthdate,
            is_active: input.is_active,
            level: input.level,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Insert/update payload
///
/// `user_id` is optional so that an update can take its key from the request path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeInput {
    #[serde(default)]
    pub user_id: Option<i32>,
    pub first_name: String,
    pub last_name: String,
    pub salary: Decimal,
    pub currency: String,
    pub birthdate: NaiveDate,
    pub is_active: bool,
    pub level: u8,
}

/// Normalized import record awaiting validation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmployeeDraft {
    pub user_id: Option<i32>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub salary: Option<Decimal>,
    pub currency: Option<String>,
    pub birthdate: Option<NaiveDate>,
    pub is_active: Option<bool>,
    pub level: Option<u8>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl EmployeeDraft {
    /// Convert into a persisted row.
    ///
    /// Returns `None` if any field is absent. Blank-text checks belong to the
    /// import validator; this only refuses to invent values.
    pub fn into_employee(self) -> Option<Employee> {
        Some(Employee {
            user_id: self.user_id?,
            first_name: self.first_name?,
            last_name: self.last_name?,
            salary: self.salary?,
            currency: self.currency?,
            birthdate: self.birthdate?,
            is_active: self.is_active?,
            level: self.level?,
            created_at: self.created_at?,
            updated_at: self.updated_at?,
        })
    }
}

/// Equality predicates for conditional queries.
///
/// `None` leaves a field unconstrained; populated fields are combined with AND.
/// Last name matches exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeFilter {
    pub last_name: Option<String>,
    pub is_active: Option<bool>,
    pub level: Option<u8>,
}

impl EmployeeFilter {
    /// Unconstrained filter (matches every row)
    pub fn any() -> Self {
        Self::default()
    }

    pub fn by_level(level: u8) -> Self {
        Self {
            level: Some(level),
            ..Self::default()
        }
    }

    pub fn active() -> Self {
        Self {
            is_active: Some(true),
            ..Self::default()
        }
    }

    pub fn by_last_name(last_name: impl Into<String>) -> Self {
        Self {
            last_name: Some(last_name.into()),
            ..Self::default()
        }
    }

    /// True when no predicate is set
    pub fn is_empty(&self) -> bool {
        self.last_name.is_none() && self.is_active.is_none() && self.level.is_none()
    }
}

/// Offset/limit pair for a conditional fetch.
///
/// Policy: a negative offset or a limit below 1 is rejected with
/// [`Error::InvalidInput`]; values are never clamped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Window {
    offset: Option<i64>,
    limit: Option<i64>,
}

impl Window {
    /// No offset, no limit: the full matching set
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn new(offset: Option<i64>, limit: Option<i64>) -> Result<Self> {
        if let Some(offset) = offset {
            if offset < 0 {
                return Err(Error::InvalidInput(format!(
                    "offset must be >= 0, got {}",
                    offset
                )));
            }
        }
        if let Some(limit) = limit {
            if limit < 1 {
                return Err(Error::InvalidInput(format!(
                    "limit must be >= 1, got {}",
                    limit
                )));
            }
        }
        Ok(Self { offset, limit })
    }

    /// Window for a 1-based page number: `offset = (page_num - 1) * page_size`
    pub fn for_page(page_num: i64, page_size: i64) -> Result<Self> {
        if page_num < 1 {
            return Err(Error::InvalidInput(format!(
                "page number must be >= 1, got {}",
                page_num
            )));
        }
        let offset = (page_num - 1)
            .checked_mul(page_size)
            .ok_or_else(|| Error::InvalidInput("page offset overflows".to_string()))?;
        Self::new(Some(offset), Some(page_size))
    }

    pub fn offset(&self) -> Option<i64> {
        self.offset
    }

    pub fn limit(&self) -> Option<i64> {
        self.limit
    }

    pub fn is_unbounded(&self) -> bool {
        self.offset.is_none() && self.limit.is_none()
    }
}
