//! Export document as read back for import.
//!
//! Mirrors `shared::MonthExport` but tolerates older documents: settings go
//! through the lenient `StoredSettings` path and flags may be strings.

use serde::Deserialize;
use std::collections::BTreeMap;

use super::daily_record::DailyRecord;
use super::settings::StoredSettings;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredMonthExport {
    #[serde(default)]
    pub generated_at: Option<String>,
    #[serde(default)]
    pub settings: StoredSettings,
    pub month: String,
    #[serde(default)]
    pub entries: BTreeMap<String, DailyRecord>,
}
