//! Read models for the dashboard: hero cards and the daily banner.

use chrono::NaiveDate;
use shared::{percent_of, Champion, DailyOverview, HeroCard, ProgressHeadline, QuestStatus, Settings};
use std::sync::Arc;

use super::dates::MonthKey;
use super::progress_service::ProgressService;
use crate::storage::{DailyRecordRepository, KeyValueStore, StorageKeys};

#[derive(Clone)]
pub struct DashboardService<S: KeyValueStore> {
    progress: ProgressService<S>,
    records: DailyRecordRepository<S>,
}

impl<S: KeyValueStore> DashboardService<S> {
    pub fn new(store: Arc<S>, keys: StorageKeys) -> Self {
        Self {
            progress: ProgressService::new(store.clone(), keys.clone()),
            records: DailyRecordRepository::new(store, keys),
        }
    }

    /// One card per hero for the viewed `date`. Streaks always end at
    /// `today`; stars are for the month of `date`.
    pub fn hero_cards(&self, settings: &Settings, date: NaiveDate, today: NaiveDate) -> Vec<HeroCard> {
        let record = self.records.get(date);
        let month = MonthKey::from_date(date);

        settings
            .heroes
            .iter()
            .map(|hero| {
                let completion = record.completion(&hero.id, &settings.quests);
                let quests = settings
                    .quests
                    .iter()
                    .map(|quest| QuestStatus {
                        quest_id: quest.id.clone(),
                        name: quest.name.clone(),
                        icon: quest.icon.clone(),
                        done: record.is_done(&hero.id, &quest.id),
                    })
                    .collect();

                HeroCard {
                    hero: hero.clone(),
                    streak: self.progress.calculate_streak_as_of(&hero.id, &settings.quests, today),
                    stars: self.progress.calculate_monthly_stars(&hero.id, &settings.quests, month),
                    completion,
                    percent: completion.percent(),
                    headline: ProgressHeadline::from_completion(completion),
                    quests,
                }
            })
            .collect()
    }

    /// Totals across every hero for `date`, plus the current champion
    pub fn daily_overview(&self, settings: &Settings, date: NaiveDate, today: NaiveDate) -> DailyOverview {
        let record = self.records.get(date);
        let month = MonthKey::from_date(date);

        let mut done = 0;
        let mut total = 0;
        let mut champion: Option<Champion> = None;

        for hero in &settings.heroes {
            let completion = record.completion(&hero.id, &settings.quests);
            done += completion.done;
            total += completion.total;

            let streak = self.progress.calculate_streak_as_of(&hero.id, &settings.quests, today);
            let stars = self.progress.calculate_monthly_stars(&hero.id, &settings.quests, month);
            let leads = match &champion {
                None => true,
                Some(current) => {
                    streak > current.streak || (streak == current.streak && stars > current.stars)
                }
            };
            if leads {
                champion = Some(Champion {
                    hero_id: hero.id.clone(),
                    name: hero.name.clone(),
                    streak,
                    stars,
                });
            }
        }

        DailyOverview {
            date,
            hero_count: settings.heroes.len(),
            quest_count: settings.quests.len(),
            done,
            total,
            completion_rate: percent_of(done, total),
            champion,
        }
    }
}
