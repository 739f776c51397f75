//! # Quest Board
//!
//! Progress model for a household chore board: heroes complete daily quests,
//! earn stars and build streaks. `QuestBoard` owns the in-memory settings and
//! the selected date, and drives the domain services over a key-value store.
//!
//! Everything is synchronous. Mutations take `&mut self` and run
//! read-modify-write-persist in one go.

use anyhow::Result;
use chrono::NaiveDate;
use log::info;
use shared::{
    CalendarStatus, DailyCompletion, DailyOverview, Hero, HeroCard, HeroMonthSummary, MonthExport,
    Quest, Settings,
};
use std::path::Path;
use std::sync::Arc;

pub mod domain;
pub mod storage;

pub use domain::commands::export::ImportResult;
pub use domain::commands::records::{Confirmer, DestructiveAction, PruneResult, ResetOutcome};
pub use domain::commands::settings::{
    AddHeroCommand, AddQuestCommand, UpdateHeroCommand, UpdateQuestCommand,
};
pub use domain::dates::MonthKey;
pub use domain::ProgressError;
pub use storage::{BoardConfigRepository, FileStore, KeyValueStore, MemoryStore, StorageKeys};

use domain::{
    dates, integrity, CalendarService, DashboardService, ExportService, ProgressService,
    RecordService, SettingsService,
};

/// Main board struct that owns the state and orchestrates all services
pub struct QuestBoard<S: KeyValueStore> {
    settings_service: SettingsService<S>,
    progress_service: ProgressService<S>,
    calendar_service: CalendarService<S>,
    record_service: RecordService<S>,
    export_service: ExportService<S>,
    dashboard_service: DashboardService<S>,
    settings: Settings,
    selected_date: NaiveDate,
}

impl QuestBoard<FileStore> {
    /// Open the board in the default data directory (~/Documents/Quest Board,
    /// or wherever its redirect file points)
    pub fn open_default() -> Result<Self> {
        Self::open_store(FileStore::new_default()?)
    }

    /// Open the board in `directory`
    pub fn open<P: AsRef<Path>>(directory: P) -> Result<Self> {
        Self::open_store(FileStore::new(directory)?)
    }

    fn open_store(store: FileStore) -> Result<Self> {
        let config = BoardConfigRepository::new(store.clone()).get_board_config()?;
        info!(
            "Opening quest board in {} (namespace '{}')",
            store.base_directory().display(),
            config.namespace
        );
        Ok(Self::with_keys(Arc::new(store), config.storage_keys()))
    }
}

impl<S: KeyValueStore> QuestBoard<S> {
    /// Create a board over `store` using the default key namespace
    pub fn new(store: Arc<S>) -> Self {
        Self::with_keys(store, StorageKeys::default())
    }

    /// Create a board over `store`. Loads and repairs the settings, writes
    /// them back and prunes flags that point at unknown heroes or quests.
    pub fn with_keys(store: Arc<S>, keys: StorageKeys) -> Self {
        let settings_service = SettingsService::new(store.clone(), keys.clone());
        let record_service = RecordService::new(store.clone(), keys.clone());

        let settings = settings_service.load();
        record_service.prune_orphaned_records(&settings);

        info!(
            "Loaded {} heroes and {} quests",
            settings.heroes.len(),
            settings.quests.len()
        );

        Self {
            progress_service: ProgressService::new(store.clone(), keys.clone()),
            calendar_service: CalendarService::new(store.clone(), keys.clone()),
            export_service: ExportService::new(store.clone(), keys.clone()),
            dashboard_service: DashboardService::new(store, keys),
            settings_service,
            record_service,
            settings,
            selected_date: dates::today(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn heroes(&self) -> &[Hero] {
        &self.settings.heroes
    }

    pub fn quests(&self) -> &[Quest] {
        &self.settings.quests
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.selected_date
    }

    pub fn select_date(&mut self, date: NaiveDate) {
        self.selected_date = date;
    }

    /// Move the selection to the first day of the month `offset` months away
    pub fn shift_month(&mut self, offset: i32) -> NaiveDate {
        self.selected_date = dates::shift_month(self.selected_date, offset);
        self.selected_date
    }

    /// Re-run the integrity pass on the current settings, persist them and
    /// prune orphaned completion flags
    pub fn ensure_integrity(&mut self) -> PruneResult {
        self.settings_service.commit(&mut self.settings);
        self.record_service.prune_orphaned_records(&self.settings)
    }

    // ----- Metrics -----

    pub fn daily_completion(&self, hero_id: &str, date: NaiveDate) -> DailyCompletion {
        self.progress_service
            .daily_completion(hero_id, date, &self.settings.quests)
    }

    /// Current streak, ending today on the wall clock
    pub fn calculate_streak(&self, hero_id: &str) -> u32 {
        self.calculate_streak_as_of(hero_id, dates::today())
    }

    pub fn calculate_streak_as_of(&self, hero_id: &str, today: NaiveDate) -> u32 {
        self.progress_service
            .calculate_streak_as_of(hero_id, &self.settings.quests, today)
    }

    pub fn calculate_monthly_stars(&self, hero_id: &str, month: MonthKey) -> u32 {
        self.progress_service
            .calculate_monthly_stars(hero_id, &self.settings.quests, month)
    }

    pub fn compute_calendar_status(&self) -> CalendarStatus {
        self.calendar_service
            .compute_calendar_status(&self.settings.heroes, &self.settings.quests)
    }

    /// Totals for every hero over the month containing `month_date`
    pub fn summarize_month(&self, month_date: NaiveDate) -> Vec<HeroMonthSummary> {
        let month = MonthKey::from_date(month_date);
        self.calendar_service.summarize_month(
            &self.settings.heroes,
            &self.settings.quests,
            month,
            |hero| self.calculate_monthly_stars(&hero.id, month),
        )
    }

    pub fn hero_cards(&self, date: NaiveDate) -> Vec<HeroCard> {
        self.dashboard_service
            .hero_cards(&self.settings, date, dates::today())
    }

    pub fn daily_overview(&self, date: NaiveDate) -> DailyOverview {
        self.dashboard_service
            .daily_overview(&self.settings, date, dates::today())
    }

    // ----- Completion log -----

    /// Toggle a quest on the selected date; returns the new flag
    pub fn toggle_task(&mut self, hero_id: &str, quest_id: &str) -> Result<bool, ProgressError> {
        self.record_service
            .toggle_task(&self.settings, hero_id, quest_id, self.selected_date)
    }

    /// Clear one hero's flags on the selected date
    pub fn reset_hero_day<C: Confirmer + ?Sized>(
        &mut self,
        hero_id: &str,
        confirmer: &C,
    ) -> Result<ResetOutcome, ProgressError> {
        self.record_service
            .reset_hero_day(&self.settings, hero_id, self.selected_date, confirmer)
    }

    pub fn reset_day<C: Confirmer + ?Sized>(&mut self, date: NaiveDate, confirmer: &C) -> ResetOutcome {
        self.record_service.reset_day(date, confirmer)
    }

    pub fn reset_month<C: Confirmer + ?Sized>(&mut self, month: MonthKey, confirmer: &C) -> ResetOutcome {
        self.record_service.reset_month(month, confirmer)
    }

    // ----- Settings -----

    pub fn add_hero(&mut self, command: AddHeroCommand) -> Hero {
        self.settings_service.add_hero(&mut self.settings, command)
    }

    pub fn remove_hero(&mut self, hero_id: &str) -> Result<Hero, ProgressError> {
        let removed = self.settings_service.remove_hero(&mut self.settings, hero_id)?;
        self.record_service.prune_orphaned_records(&self.settings);
        Ok(removed)
    }

    pub fn update_hero(&mut self, command: UpdateHeroCommand) -> Result<Hero, ProgressError> {
        self.settings_service.update_hero(&mut self.settings, command)
    }

    pub fn add_quest(&mut self, command: AddQuestCommand) -> Quest {
        self.settings_service.add_quest(&mut self.settings, command)
    }

    pub fn remove_quest(&mut self, quest_id: &str) -> Result<Quest, ProgressError> {
        let removed = self.settings_service.remove_quest(&mut self.settings, quest_id)?;
        self.record_service.prune_orphaned_records(&self.settings);
        Ok(removed)
    }

    pub fn update_quest(&mut self, command: UpdateQuestCommand) -> Result<Quest, ProgressError> {
        self.settings_service.update_quest(&mut self.settings, command)
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) {
        self.settings_service.set_sound_enabled(&mut self.settings, enabled);
    }

    pub fn set_speech_enabled(&mut self, enabled: bool) {
        self.settings_service.set_speech_enabled(&mut self.settings, enabled);
    }

    pub fn set_speech_voice(&mut self, voice: &str) {
        self.settings_service.set_speech_voice(&mut self.settings, voice);
    }

    /// Returns the rate actually stored
    pub fn set_speech_rate(&mut self, rate: f64) -> f64 {
        self.settings_service.set_speech_rate(&mut self.settings, rate)
    }

    // ----- Export -----

    pub fn export_month(&self, month: MonthKey) -> MonthExport {
        self.export_service.export_month(&self.settings, month)
    }

    pub fn export_month_json(&self, month: MonthKey) -> Result<String> {
        self.export_service.export_month_json(&self.settings, month)
    }

    pub fn export_file_name(&self, month: MonthKey) -> String {
        self.export_service.export_file_name(month)
    }

    /// Replace the settings with the ones in an export document and write
    /// its month's entries
    pub fn import_month(&mut self, json: &str) -> Result<ImportResult, ProgressError> {
        let (settings, result) = self.export_service.import_month(json)?;
        self.settings = settings;
        self.settings_service.commit(&mut self.settings);
        self.record_service.prune_orphaned_records(&self.settings);
        Ok(result)
    }
}

/// Repair settings without touching any store
pub fn ensure_integrity(settings: Settings) -> Settings {
    integrity::ensure_integrity(settings)
}
