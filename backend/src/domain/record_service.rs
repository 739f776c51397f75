//! Mutations of the daily completion log: toggles, resets and orphan pruning.

use chrono::NaiveDate;
use log::{info, warn};
use shared::Settings;
use std::sync::Arc;

use super::commands::records::{Confirmer, DestructiveAction, PruneResult, ResetOutcome};
use super::dates::MonthKey;
use super::errors::ProgressError;
use super::models::DailyRecord;
use crate::storage::{DailyRecordRepository, KeyValueStore, SpentLedgerRepository, StorageKeys};

#[derive(Clone)]
pub struct RecordService<S: KeyValueStore> {
    records: DailyRecordRepository<S>,
    ledgers: SpentLedgerRepository<S>,
}

impl<S: KeyValueStore> RecordService<S> {
    pub fn new(store: Arc<S>, keys: StorageKeys) -> Self {
        Self {
            records: DailyRecordRepository::new(store.clone(), keys.clone()),
            ledgers: SpentLedgerRepository::new(store, keys),
        }
    }

    /// Flip one quest for one hero on `date` and return the new flag.
    /// `true` means the quest was just completed.
    pub fn toggle_task(
        &self,
        settings: &Settings,
        hero_id: &str,
        quest_id: &str,
        date: NaiveDate,
    ) -> Result<bool, ProgressError> {
        if settings.find_hero(hero_id).is_none() {
            return Err(ProgressError::UnknownHero(hero_id.to_string()));
        }
        if settings.find_quest(quest_id).is_none() {
            return Err(ProgressError::UnknownQuest(quest_id.to_string()));
        }

        let mut record = self.records.get(date);
        let done = record.toggle(hero_id, quest_id);
        self.save(date, &record);

        info!(
            "Quest {} for {} on {} is now {}",
            quest_id,
            hero_id,
            date,
            if done { "done" } else { "not done" }
        );
        Ok(done)
    }

    /// Clear one hero's flags on `date`. Nothing is asked when the hero has
    /// no entry that day.
    pub fn reset_hero_day<C: Confirmer + ?Sized>(
        &self,
        settings: &Settings,
        hero_id: &str,
        date: NaiveDate,
        confirmer: &C,
    ) -> Result<ResetOutcome, ProgressError> {
        let hero = settings
            .find_hero(hero_id)
            .ok_or_else(|| ProgressError::UnknownHero(hero_id.to_string()))?;

        let mut record = self.records.get(date);
        if !record.has_hero(hero_id) {
            return Ok(ResetOutcome::NothingToReset);
        }

        let action = DestructiveAction::ResetHeroDay {
            hero_id: hero.id.clone(),
            hero_name: hero.name.clone(),
            date,
        };
        if !confirmer.confirm(&action) {
            return Ok(ResetOutcome::Declined);
        }

        record.remove_hero(hero_id);
        self.save(date, &record);
        info!("Reset {} on {}", hero_id, date);
        Ok(ResetOutcome::Applied { affected: 1 })
    }

    /// Remove the whole record for `date`
    pub fn reset_day<C: Confirmer + ?Sized>(&self, date: NaiveDate, confirmer: &C) -> ResetOutcome {
        if !confirmer.confirm(&DestructiveAction::ResetDay { date }) {
            return ResetOutcome::Declined;
        }

        let affected = match self.records.delete(date) {
            Ok(true) => 1,
            Ok(false) => 0,
            Err(e) => {
                warn!("Failed to remove record for {}: {}", date, e);
                0
            }
        };
        info!("Reset day {}", date);
        ResetOutcome::Applied { affected }
    }

    /// Remove every record in `month` and the month's spent ledger
    pub fn reset_month<C: Confirmer + ?Sized>(&self, month: MonthKey, confirmer: &C) -> ResetOutcome {
        if !confirmer.confirm(&DestructiveAction::ResetMonth { month }) {
            return ResetOutcome::Declined;
        }

        let mut affected = 0;
        for date in self.records.list_dates_in_month(month) {
            match self.records.delete(date) {
                Ok(true) => affected += 1,
                Ok(false) => {}
                Err(e) => warn!("Failed to remove record for {}: {}", date, e),
            }
        }
        match self.ledgers.delete(month) {
            Ok(true) => affected += 1,
            Ok(false) => {}
            Err(e) => warn!("Failed to remove spent ledger for {}: {}", month, e),
        }

        info!("Reset month {} ({} stored values removed)", month, affected);
        ResetOutcome::Applied { affected }
    }

    /// Drop flags for heroes and quests that no longer exist, rewriting only
    /// the records that changed
    pub fn prune_orphaned_records(&self, settings: &Settings) -> PruneResult {
        let mut result = PruneResult::default();

        for (date, mut record) in self.records.list_all() {
            result.records_scanned += 1;
            if record.retain_known(settings) {
                self.save(date, &record);
                result.records_rewritten += 1;
            }
        }

        if result.records_rewritten > 0 {
            info!(
                "Pruned orphaned flags from {} of {} records",
                result.records_rewritten, result.records_scanned
            );
        }
        result
    }

    fn save(&self, date: NaiveDate, record: &DailyRecord) {
        if let Err(e) = self.records.store(date, record) {
            warn!("Failed to save record for {}: {}", date, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{default_settings, SpentLedger};
    use crate::storage::{KeyValueStore, MemoryStore};
    use std::cell::Cell;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn approve(_: &DestructiveAction) -> bool {
        true
    }

    fn decline(_: &DestructiveAction) -> bool {
        false
    }

    struct Fixture {
        store: Arc<MemoryStore>,
        service: RecordService<MemoryStore>,
        records: DailyRecordRepository<MemoryStore>,
        settings: Settings,
    }

    fn setup() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let keys = StorageKeys::default();
        Fixture {
            service: RecordService::new(store.clone(), keys.clone()),
            records: DailyRecordRepository::new(store.clone(), keys),
            store,
            settings: default_settings(),
        }
    }

    #[test]
    fn test_toggle_task_round_trip() {
        let f = setup();
        let day = date(2024, 3, 10);

        assert_eq!(f.service.toggle_task(&f.settings, "hero-hikari", "quest-dishes", day), Ok(true));
        assert!(f.records.get(day).is_done("hero-hikari", "quest-dishes"));
        assert_eq!(f.service.toggle_task(&f.settings, "hero-hikari", "quest-dishes", day), Ok(false));
        assert!(!f.records.get(day).is_done("hero-hikari", "quest-dishes"));
    }

    #[test]
    fn test_toggle_task_rejects_unknown_ids() {
        let f = setup();
        let day = date(2024, 3, 10);

        assert_eq!(
            f.service.toggle_task(&f.settings, "ghost", "quest-dishes", day),
            Err(ProgressError::UnknownHero("ghost".to_string()))
        );
        assert_eq!(
            f.service.toggle_task(&f.settings, "hero-hikari", "nope", day),
            Err(ProgressError::UnknownQuest("nope".to_string()))
        );
        assert!(f.store.is_empty());
    }

    #[test]
    fn test_toggle_survives_write_failure() {
        let f = setup();
        f.store.set_reject_writes(true);
        let result = f.service.toggle_task(&f.settings, "hero-hikari", "quest-dishes", date(2024, 3, 10));
        assert_eq!(result, Ok(true));
        assert!(f.store.is_empty());
    }

    #[test]
    fn test_reset_hero_day_without_data_does_not_prompt() {
        let f = setup();
        let asked = Cell::new(false);
        let confirmer = |_: &DestructiveAction| {
            asked.set(true);
            true
        };

        let outcome = f
            .service
            .reset_hero_day(&f.settings, "hero-hikari", date(2024, 3, 10), &confirmer)
            .unwrap();
        assert_eq!(outcome, ResetOutcome::NothingToReset);
        assert!(!asked.get());
    }

    #[test]
    fn test_reset_hero_day_clears_only_that_hero() {
        let f = setup();
        let day = date(2024, 3, 10);
        f.service.toggle_task(&f.settings, "hero-hikari", "quest-dishes", day).unwrap();
        f.service.toggle_task(&f.settings, "hero-mirai", "quest-dishes", day).unwrap();

        let declined = f.service.reset_hero_day(&f.settings, "hero-hikari", day, &decline).unwrap();
        assert_eq!(declined, ResetOutcome::Declined);
        assert!(f.records.get(day).has_hero("hero-hikari"));

        let seen = Cell::new(None);
        let confirmer = |action: &DestructiveAction| {
            seen.set(Some(action.clone()));
            true
        };
        let applied = f.service.reset_hero_day(&f.settings, "hero-hikari", day, &confirmer).unwrap();
        assert_eq!(applied, ResetOutcome::Applied { affected: 1 });
        assert_eq!(
            seen.take(),
            Some(DestructiveAction::ResetHeroDay {
                hero_id: "hero-hikari".to_string(),
                hero_name: "Hikari".to_string(),
                date: day,
            })
        );

        let record = f.records.get(day);
        assert!(!record.has_hero("hero-hikari"));
        assert!(record.is_done("hero-mirai", "quest-dishes"));
    }

    #[test]
    fn test_reset_day() {
        let f = setup();
        let day = date(2024, 3, 10);
        f.service.toggle_task(&f.settings, "hero-hikari", "quest-dishes", day).unwrap();

        assert_eq!(f.service.reset_day(day, &decline), ResetOutcome::Declined);
        assert!(!f.records.get(day).is_empty());

        assert_eq!(f.service.reset_day(day, &approve), ResetOutcome::Applied { affected: 1 });
        assert!(f.records.get(day).is_empty());
        assert_eq!(f.service.reset_day(day, &approve), ResetOutcome::Applied { affected: 0 });
    }

    #[test]
    fn test_reset_month_removes_records_and_ledger() {
        let f = setup();
        for day in [date(2024, 3, 1), date(2024, 3, 31), date(2024, 4, 1)] {
            f.service.toggle_task(&f.settings, "hero-hikari", "quest-dishes", day).unwrap();
        }
        let march = MonthKey::new(2024, 3).unwrap();
        let mut ledger = SpentLedger::new();
        ledger.set("hero-hikari", 2);
        SpentLedgerRepository::new(f.store.clone(), StorageKeys::default())
            .store(march, &ledger)
            .unwrap();

        assert_eq!(f.service.reset_month(march, &decline), ResetOutcome::Declined);
        assert_eq!(f.service.reset_month(march, &approve), ResetOutcome::Applied { affected: 3 });

        assert_eq!(f.records.list_dates(), vec![date(2024, 4, 1)]);
        assert_eq!(f.store.get("aurora-spent-2024-03").unwrap(), None);
    }

    #[test]
    fn test_prune_orphaned_records() {
        let f = setup();
        let day = date(2024, 3, 10);
        let mut record = DailyRecord::new();
        record.set("hero-hikari", "quest-dishes", true);
        record.set("removed-hero", "quest-dishes", true);
        f.records.store(day, &record).unwrap();
        f.records.store(date(2024, 3, 11), &DailyRecord::new()).unwrap();

        let result = f.service.prune_orphaned_records(&f.settings);
        assert_eq!(result, PruneResult { records_scanned: 2, records_rewritten: 1 });
        assert!(!f.records.get(day).has_hero("removed-hero"));
        assert!(f.records.get(day).is_done("hero-hikari", "quest-dishes"));
    }
}
