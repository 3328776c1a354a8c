//! Feed-shaped employee record and its normalization
//!
//! The external feed names fields in its own convention (`UserID`,
//! `Firstname`, ...) and encodes birthdates as `"/Date(<epoch-millis>)/"`.

use chrono::{DateTime, NaiveDate, Utc};
use roster_common::time::epoch_millis_to_local_date;
use roster_common::EmployeeDraft;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

pub const LEGACY_DATE_PREFIX: &str = "/Date(";
pub const LEGACY_DATE_SUFFIX: &str = ")/";

/// One element of the feed document. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ImportRecord {
    #[serde(rename = "UserID")]
    pub user_id: Option<i32>,
    #[serde(rename = "Firstname")]
    pub first_name: Option<String>,
    #[serde(rename = "Lastname")]
    pub last_name: Option<String>,
    #[serde(rename = "Salary")]
    pub salary: Option<Decimal>,
    #[serde(rename = "Currency")]
    pub currency: Option<String>,
    /// Legacy encoding, see [`parse_legacy_date`]
    #[serde(rename = "Birthdate")]
    pub birthdate: Option<String>,
    #[serde(rename = "Active")]
    pub is_active: Option<bool>,
    /// Integers outside `u8` read as absent, so only that record is rejected
    #[serde(rename = "Level", default, deserialize_with = "level_or_none")]
    pub level: Option<u8>,
}

fn level_or_none<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<i64>::deserialize(deserializer)?;
    Ok(raw.and_then(|level| u8::try_from(level).ok()))
}

impl ImportRecord {
    /// Birthdate as a calendar date; `None` when absent or unparseable
    pub fn birthdate_as_date(&self) -> Option<NaiveDate> {
        self.birthdate.as_deref().and_then(parse_legacy_date)
    }

    /// Map to the canonical shape, stamping both timestamps with `now`.
    ///
    /// A bad birthdate becomes `None` here; rejecting the record is the
    /// validator's call.
    pub fn normalize(self, now: DateTime<Utc>) -> EmployeeDraft {
        let birthdate = self.birthdate_as_date();
        EmployeeDraft {
            user_id: self.user_id,
            first_name: self.first_name,
            last_name: self.last_name,
            salary: self.salary,
            currency: self.currency,
            birthdate,
            is_active: self.is_active,
            level: self.level,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }
}

/// Parse `"/Date(<millis>)/"` into a date in the local time zone.
///
/// Never panics. Returns `None` for an empty string, a missing prefix or
/// suffix, a non-integer payload (including zone offsets such as
/// `/Date(0+0100)/`), a negative value, or an instant chrono cannot represent.
pub fn parse_legacy_date(raw: &str) -> Option<NaiveDate> {
    let millis: i64 = raw
        .strip_prefix(LEGACY_DATE_PREFIX)?
        .strip_suffix(LEGACY_DATE_SUFFIX)?
        .parse()
        .ok()?;

    if millis < 0 {
        return None;
    }

    epoch_millis_to_local_date(millis)
}
