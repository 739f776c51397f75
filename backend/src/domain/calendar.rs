//! Calendar decorations and month summaries.
//!
//! The aggregation itself is pure (`day_status`, `summarize_records`); the
//! service only fetches the records it needs from storage.

use chrono::NaiveDate;
use log::debug;
use shared::{
    percent_of, CalendarDayState, CalendarDot, CalendarStatus, DayStatus, DayTooltip, Hero,
    HeroDayProgress, HeroMonthSummary, Quest,
};
use std::collections::BTreeMap;
use std::sync::Arc;

use super::dates::MonthKey;
use super::models::DailyRecord;
use crate::storage::{DailyRecordRepository, KeyValueStore, StorageKeys};

/// Dot opacity for a hero who finished every quest
pub const COMPLETE_DOT_OPACITY: f64 = 0.95;

/// Calendar service that turns stored records into calendar data
#[derive(Clone)]
pub struct CalendarService<S: KeyValueStore> {
    records: DailyRecordRepository<S>,
}

impl<S: KeyValueStore> CalendarService<S> {
    pub fn new(store: Arc<S>, keys: StorageKeys) -> Self {
        Self {
            records: DailyRecordRepository::new(store, keys),
        }
    }

    /// Decorations for every stored day that has any progress
    pub fn compute_calendar_status(&self, heroes: &[Hero], quests: &[Quest]) -> CalendarStatus {
        if heroes.is_empty() || quests.is_empty() {
            return CalendarStatus::new();
        }

        let status: CalendarStatus = self
            .records
            .list_all()
            .into_iter()
            .filter_map(|(date, record)| {
                day_status(date, heroes, quests, &record).map(|status| (date, status))
            })
            .collect();

        debug!("Computed calendar status for {} decorated days", status.len());
        status
    }

    /// Per-hero totals over every day of `month`. `stars_for` supplies each
    /// hero's star balance.
    pub fn summarize_month<F>(
        &self,
        heroes: &[Hero],
        quests: &[Quest],
        month: MonthKey,
        stars_for: F,
    ) -> Vec<HeroMonthSummary>
    where
        F: Fn(&Hero) -> u32,
    {
        let records: BTreeMap<NaiveDate, DailyRecord> =
            self.records.list_in_month(month).into_iter().collect();
        summarize_records(heroes, quests, month, &records, stars_for)
    }
}

/// Decoration for one day, or None when nobody made any progress
pub fn day_status(
    date: NaiveDate,
    heroes: &[Hero],
    quests: &[Quest],
    record: &DailyRecord,
) -> Option<DayStatus> {
    if heroes.is_empty() || quests.is_empty() {
        return None;
    }

    let mut dots = Vec::new();
    let mut tooltip_heroes = Vec::with_capacity(heroes.len());
    let mut ratio_sum = 0.0;
    let mut complete_heroes = 0;
    let mut heroes_with_progress = 0;

    for hero in heroes {
        let completion = record.completion(&hero.id, quests);
        let ratio = completion.ratio();
        ratio_sum += ratio;

        tooltip_heroes.push(HeroDayProgress {
            hero_id: hero.id.clone(),
            name: hero.name.clone(),
            done: completion.done,
            total: completion.total,
        });

        if completion.is_complete() {
            complete_heroes += 1;
            heroes_with_progress += 1;
            dots.push(CalendarDot {
                hero_id: hero.id.clone(),
                color: hero.color.clone(),
                opacity: COMPLETE_DOT_OPACITY,
            });
        } else if completion.done > 0 {
            heroes_with_progress += 1;
            dots.push(CalendarDot {
                hero_id: hero.id.clone(),
                color: hero.color.clone(),
                opacity: 0.5 + ratio * 0.4,
            });
        }
    }

    let state = if complete_heroes == heroes.len() {
        CalendarDayState::Complete
    } else if heroes_with_progress > 0 {
        CalendarDayState::Partial
    } else {
        return None;
    };

    let avg_completion = (ratio_sum / heroes.len() as f64 * 100.0).round() as u32;

    Some(DayStatus {
        state,
        avg_completion,
        dots,
        tooltip: DayTooltip {
            date,
            heroes: tooltip_heroes,
            avg_completion,
        },
    })
}

/// Month totals from already-loaded records. Days without a record count as
/// zero done out of `quests.len()`.
pub fn summarize_records<F>(
    heroes: &[Hero],
    quests: &[Quest],
    month: MonthKey,
    records: &BTreeMap<NaiveDate, DailyRecord>,
    stars_for: F,
) -> Vec<HeroMonthSummary>
where
    F: Fn(&Hero) -> u32,
{
    let days = month.days();
    let quest_count = quests.len() as u32;

    heroes
        .iter()
        .map(|hero| {
            let done: u32 = days
                .iter()
                .filter_map(|day| records.get(day))
                .map(|record| record.count_done(&hero.id, quests))
                .sum();
            let total = days.len() as u32 * quest_count;

            HeroMonthSummary {
                hero_id: hero.id.clone(),
                name: hero.name.clone(),
                done,
                total,
                percent: percent_of(done, total),
                stars: stars_for(hero),
            }
        })
        .collect()
}
