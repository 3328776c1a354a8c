//! Completeness gate for normalized import records
//!
//! A record passes when every business field is present and the text fields
//! are not blank. Validation never fails loudly: it logs and answers a bool.

use roster_common::db::LEVEL_RANGE;
use roster_common::EmployeeDraft;
use std::fmt;
use tracing::{debug, warn};

/// Business fields a record must carry to be persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    UserId,
    FirstName,
    LastName,
    Salary,
    Currency,
    Birthdate,
    IsActive,
    Level,
}

impl RequiredField {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequiredField::UserId => "user_id",
            RequiredField::FirstName => "first_name",
            RequiredField::LastName => "last_name",
            RequiredField::Salary => "salary",
            RequiredField::Currency => "currency",
            RequiredField::Birthdate => "birthdate",
            RequiredField::IsActive => "is_active",
            RequiredField::Level => "level",
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every missing or blank field of one rejected record
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("employee {} is missing or blank: {}", display_id(.user_id), join_fields(.missing))]
pub struct ValidationFailure {
    pub user_id: Option<i32>,
    pub missing: Vec<RequiredField>,
}

fn display_id(user_id: &Option<i32>) -> String {
    user_id.map_or_else(|| "<no id>".to_string(), |id| id.to_string())
}

fn join_fields(fields: &[RequiredField]) -> String {
    fields
        .iter()
        .map(RequiredField::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn has_text(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.trim().is_empty())
}

/// Check a draft, listing every field that fails
pub fn validate_draft(draft: &EmployeeDraft) -> Result<(), ValidationFailure> {
    let checks = [
        (draft.user_id.is_some(), RequiredField::UserId),
        (has_text(&draft.first_name), RequiredField::FirstName),
        (has_text(&draft.last_name), RequiredField::LastName),
        (draft.salary.is_some(), RequiredField::Salary),
        (has_text(&draft.currency), RequiredField::Currency),
        (draft.birthdate.is_some(), RequiredField::Birthdate),
        (draft.is_active.is_some(), RequiredField::IsActive),
        (draft.level.is_some(), RequiredField::Level),
    ];

    let missing: Vec<RequiredField> = checks
        .into_iter()
        .filter(|(ok, _)| !ok)
        .map(|(_, field)| field)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationFailure {
            user_id: draft.user_id,
            missing,
        })
    }
}

/// Boolean gate used by the import pipeline; logs the reason on rejection
pub fn is_valid(draft: &EmployeeDraft) -> bool {
    match validate_draft(draft) {
        Ok(()) => {
            if let Some(level) = draft.level.filter(|l| !LEVEL_RANGE.contains(l)) {
                // Accepted as-is; the range is informational
                debug!("Employee {:?} has level {} outside 0-12", draft.user_id, level);
            }
            true
        }
        Err(failure) => {
            warn!(
                "Employee validation failed: {} (first_name={:?}, last_name={:?}, salary={:?}, \
                 currency={:?}, birthdate={:?}, is_active={:?}, level={:?})",
                failure,
                draft.first_name,
                draft.last_name,
                draft.salary,
                draft.currency,
                draft.birthdate,
                draft.is_active,
                draft.level
            );
            false
        }
    }
}
