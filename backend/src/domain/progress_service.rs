//! Per-hero progress metrics: daily completion, streaks and monthly stars.
//!
//! Every metric is judged against the quest list passed in, which is the
//! *current* list. Days recorded under an older quest list are re-scored
//! against today's quests.

use chrono::{Duration, NaiveDate};
use log::debug;
use shared::{DailyCompletion, Quest};
use std::sync::Arc;

use super::dates::MonthKey;
use crate::storage::{DailyRecordRepository, KeyValueStore, SpentLedgerRepository, StorageKeys};

/// How many days back a streak is searched
pub const STREAK_WINDOW_DAYS: u32 = 90;

#[derive(Clone)]
pub struct ProgressService<S: KeyValueStore> {
    records: DailyRecordRepository<S>,
    ledgers: SpentLedgerRepository<S>,
}

impl<S: KeyValueStore> ProgressService<S> {
    pub fn new(store: Arc<S>, keys: StorageKeys) -> Self {
        Self {
            records: DailyRecordRepository::new(store.clone(), keys.clone()),
            ledgers: SpentLedgerRepository::new(store, keys),
        }
    }

    /// Done/total for one hero on one date. No quests gives `{0, 0}`.
    pub fn daily_completion(&self, hero_id: &str, date: NaiveDate, quests: &[Quest]) -> DailyCompletion {
        if quests.is_empty() {
            return DailyCompletion::default();
        }
        self.records.get(date).completion(hero_id, quests)
    }

    /// Consecutive fully-complete days ending at `today`
    pub fn calculate_streak_as_of(&self, hero_id: &str, quests: &[Quest], today: NaiveDate) -> u32 {
        let streak = streak_length(today, STREAK_WINDOW_DAYS, |date| {
            self.daily_completion(hero_id, date, quests)
        });
        debug!("Streak for {} as of {}: {}", hero_id, today, streak);
        streak
    }

    /// Stars earned in `month` minus stars already spent, never below zero
    pub fn calculate_monthly_stars(&self, hero_id: &str, quests: &[Quest], month: MonthKey) -> u32 {
        if quests.is_empty() {
            return 0;
        }

        let earned: u32 = self
            .records
            .list_in_month(month)
            .iter()
            .map(|(_, record)| record.count_done(hero_id, quests))
            .sum();
        let spent = self.ledgers.get(month).spent_for(hero_id);

        net_stars(earned, spent)
    }
}

/// Walk back from `today` over at most `window` days. Days with nothing to
/// evaluate are skipped; the first day that is not fully complete ends the
/// streak.
pub fn streak_length<F>(today: NaiveDate, window: u32, completion_for: F) -> u32
where
    F: Fn(NaiveDate) -> DailyCompletion,
{
    let mut streak = 0;

    for offset in 0..window {
        let date = match today.checked_sub_signed(Duration::days(offset as i64)) {
            Some(date) => date,
            None => break,
        };
        let completion = completion_for(date);

        if completion.is_empty() {
            continue;
        }
        if completion.is_complete() {
            streak += 1;
        } else {
            break;
        }
    }

    streak
}

pub fn net_stars(earned: u32, spent: u32) -> u32 {
    earned.saturating_sub(spent)
}
