//! Month export and import.
//!
//! An export is a self-contained JSON document:
//!
//! ```json
//! {
//!   "generatedAt": "2024-03-31T20:00:00Z",
//!   "settings": { "heroes": [...], "quests": [...], ... },
//!   "month": "2024-03",
//!   "entries": { "2024-03-10": { "<hero id>": { "<quest id>": true } } }
//! }
//! ```
//!
//! Writing the document to a file is left to the caller.

use anyhow::Result;
use chrono::Utc;
use log::{info, warn};
use shared::{MonthExport, Settings};
use std::sync::Arc;

use super::commands::export::ImportResult;
use super::dates::{self, MonthKey};
use super::errors::ProgressError;
use super::integrity::{ensure_integrity, prune_record};
use super::models::StoredMonthExport;
use crate::storage::{DailyRecordRepository, KeyValueStore, StorageKeys};

#[derive(Clone)]
pub struct ExportService<S: KeyValueStore> {
    records: DailyRecordRepository<S>,
    keys: StorageKeys,
}

impl<S: KeyValueStore> ExportService<S> {
    pub fn new(store: Arc<S>, keys: StorageKeys) -> Self {
        Self {
            records: DailyRecordRepository::new(store, keys.clone()),
            keys,
        }
    }

    /// Snapshot of the settings and every record stored for `month`
    pub fn export_month(&self, settings: &Settings, month: MonthKey) -> MonthExport {
        let entries = self
            .records
            .list_in_month(month)
            .into_iter()
            .map(|(date, record)| (dates::format_date_key(date), record.into_entries()))
            .collect();

        MonthExport {
            generated_at: Utc::now(),
            settings: settings.clone(),
            month: month.to_string(),
            entries,
        }
    }

    /// Pretty-printed export document
    pub fn export_month_json(&self, settings: &Settings, month: MonthKey) -> Result<String> {
        let export = self.export_month(settings, month);
        info!("Exported {} days for {}", export.entries.len(), month);
        Ok(serde_json::to_string_pretty(&export)?)
    }

    /// Suggested download name, e.g. `aurora-2024-03.json`
    pub fn export_file_name(&self, month: MonthKey) -> String {
        format!("{}-{}.json", self.keys.namespace(), month)
    }

    /// Read an export document back in. Returns the repaired settings from
    /// the document; storing them is the caller's step. Every entry of the
    /// document's month is written over the current record for that date,
    /// pruned against the imported settings.
    pub fn import_month(&self, json: &str) -> Result<(Settings, ImportResult), ProgressError> {
        let document: StoredMonthExport =
            serde_json::from_str(json).map_err(|e| ProgressError::InvalidExport(e.to_string()))?;
        let month: MonthKey = document.month.parse()?;
        let settings = ensure_integrity(document.settings.into_settings());

        let mut result = ImportResult {
            month: month.to_string(),
            ..Default::default()
        };

        for (key, record) in document.entries {
            let date = match dates::parse_date_key(&key) {
                Ok(date) if month.contains(date) => date,
                _ => {
                    warn!("Skipping export entry {} outside {}", key, month);
                    result.skipped_keys.push(key);
                    continue;
                }
            };

            let record = prune_record(record, &settings);
            match self.records.store(date, &record) {
                Ok(()) => result.imported_days += 1,
                Err(e) => warn!("Failed to import record for {}: {}", date, e),
            }
        }

        info!(
            "Imported {} days for {} ({} skipped)",
            result.imported_days,
            month,
            result.skipped_keys.len()
        );
        Ok((settings, result))
    }
}
