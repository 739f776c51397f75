//! Key layout of the flat key-value namespace.
//!
//! ```text
//! aurora-settings-v2          ← settings blob
//! aurora-daily-2024-03-10     ← one daily completion record per date
//! aurora-spent-2024-03        ← one spent ledger per month
//! ```

use chrono::NaiveDate;

use crate::domain::dates::{self, MonthKey};

/// Builds and parses the keys used for every stored value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    namespace: String,
}

impl StorageKeys {
    pub const DEFAULT_NAMESPACE: &'static str = "aurora";

    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn settings(&self) -> String {
        format!("{}-settings-v2", self.namespace)
    }

    pub fn daily_prefix(&self) -> String {
        format!("{}-daily-", self.namespace)
    }

    pub fn daily(&self, date: NaiveDate) -> String {
        format!("{}{}", self.daily_prefix(), dates::format_date_key(date))
    }

    pub fn spent(&self, month: MonthKey) -> String {
        format!("{}-spent-{}", self.namespace, month)
    }

    /// Extract the date from a daily record key.
    /// Keys outside the daily prefix or with a malformed date yield None.
    pub fn parse_daily(&self, key: &str) -> Option<NaiveDate> {
        let date_part = key.strip_prefix(&self.daily_prefix())?;
        dates::parse_date_key(date_part).ok()
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::new(Self::DEFAULT_NAMESPACE)
    }
}
