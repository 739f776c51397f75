use anyhow::Result;
use chrono::NaiveDate;
use log::{debug, warn};
use std::sync::Arc;

use super::read_json;
use crate::domain::dates::MonthKey;
use crate::domain::models::DailyRecord;
use crate::storage::{KeyValueStore, StorageKeys};

/// Daily completion records, one stored value per date
#[derive(Clone)]
pub struct DailyRecordRepository<S: KeyValueStore> {
    store: Arc<S>,
    keys: StorageKeys,
}

impl<S: KeyValueStore> DailyRecordRepository<S> {
    pub fn new(store: Arc<S>, keys: StorageKeys) -> Self {
        Self { store, keys }
    }

    /// The record for `date`; empty if none is stored or it cannot be read
    pub fn get(&self, date: NaiveDate) -> DailyRecord {
        read_json(self.store.as_ref(), &self.keys.daily(date)).unwrap_or_default()
    }

    pub fn store(&self, date: NaiveDate, record: &DailyRecord) -> Result<()> {
        let json = serde_json::to_string(record)?;
        self.store.put(&self.keys.daily(date), &json)
    }

    /// Returns true if a record existed
    pub fn delete(&self, date: NaiveDate) -> Result<bool> {
        self.store.remove(&self.keys.daily(date))
    }

    /// Every date that has a stored record, ascending.
    /// Keys with a malformed date part are skipped.
    pub fn list_dates(&self) -> Vec<NaiveDate> {
        match self.store.list_keys() {
            Ok(keys) => {
                let mut dates: Vec<NaiveDate> =
                    keys.iter().filter_map(|key| self.keys.parse_daily(key)).collect();
                dates.sort();
                dates
            }
            Err(e) => {
                warn!("Failed to list storage keys: {}", e);
                Vec::new()
            }
        }
    }

    pub fn list_dates_in_month(&self, month: MonthKey) -> Vec<NaiveDate> {
        self.list_dates()
            .into_iter()
            .filter(|date| month.contains(*date))
            .collect()
    }

    /// Every stored record with its date, ascending by date
    pub fn list_all(&self) -> Vec<(NaiveDate, DailyRecord)> {
        let records: Vec<(NaiveDate, DailyRecord)> = self
            .list_dates()
            .into_iter()
            .map(|date| (date, self.get(date)))
            .collect();
        debug!("Scanned {} daily records", records.len());
        records
    }

    pub fn list_in_month(&self, month: MonthKey) -> Vec<(NaiveDate, DailyRecord)> {
        self.list_dates_in_month(month)
            .into_iter()
            .map(|date| (date, self.get(date)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn setup() -> (Arc<MemoryStore>, DailyRecordRepository<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let repo = DailyRecordRepository::new(store.clone(), StorageKeys::default());
        (store, repo)
    }

    #[test]
    fn test_missing_and_corrupt_records_read_as_empty() -> Result<()> {
        let (store, repo) = setup();
        assert!(repo.get(date(2024, 3, 10)).is_empty());

        store.put("aurora-daily-2024-03-11", "[1, 2")?;
        assert!(repo.get(date(2024, 3, 11)).is_empty());

        store.put("aurora-daily-2024-03-12", "null")?;
        assert!(repo.get(date(2024, 3, 12)).is_empty());
        Ok(())
    }

    #[test]
    fn test_store_and_delete() -> Result<()> {
        let (_store, repo) = setup();
        let mut record = DailyRecord::new();
        record.set("hero-a", "q1", true);

        repo.store(date(2024, 3, 10), &record)?;
        assert_eq!(repo.get(date(2024, 3, 10)), record);

        assert!(repo.delete(date(2024, 3, 10))?);
        assert!(!repo.delete(date(2024, 3, 10))?);
        Ok(())
    }

    #[test]
    fn test_listing_filters_by_prefix_and_month() -> Result<()> {
        let (store, repo) = setup();
        store.put("aurora-daily-2024-03-31", "{}")?;
        store.put("aurora-daily-2024-03-01", "{}")?;
        store.put("aurora-daily-2024-04-01", "{}")?;
        store.put("aurora-daily-bogus", "{}")?;
        store.put("aurora-spent-2024-03", "{}")?;
        store.put("other-daily-2024-03-05", "{}")?;

        assert_eq!(
            repo.list_dates(),
            vec![date(2024, 3, 1), date(2024, 3, 31), date(2024, 4, 1)]
        );

        let march = MonthKey::new(2024, 3).unwrap();
        assert_eq!(repo.list_dates_in_month(march), vec![date(2024, 3, 1), date(2024, 3, 31)]);
        assert_eq!(repo.list_in_month(march).len(), 2);
        Ok(())
    }
}
