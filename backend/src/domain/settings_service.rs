//! Settings lifecycle: load with repair, persist, and the edits the settings
//! screen makes.
//!
//! Every edit runs the integrity pass on the result and persists it. A failed
//! write is logged and the in-memory settings keep the change.

use log::{info, warn};
use shared::{Hero, Quest, Settings};
use std::sync::Arc;

use super::commands::settings::{
    AddHeroCommand, AddQuestCommand, UpdateHeroCommand, UpdateQuestCommand,
};
use super::errors::ProgressError;
use super::integrity::{ensure_integrity, unique_suffix};
use super::models::settings::{
    default_settings, DEFAULT_HERO_EMOJI, DEFAULT_QUEST_ICON, DEFAULT_SPEECH_RATE, NEW_HERO_COLOR,
};
use crate::storage::{KeyValueStore, SettingsRepository, StorageKeys};

pub const NEW_HERO_NAME: &str = "New hero";
pub const NEW_QUEST_NAME: &str = "New quest";
pub const MIN_SPEECH_RATE: f64 = 0.5;
pub const MAX_SPEECH_RATE: f64 = 1.6;

#[derive(Clone)]
pub struct SettingsService<S: KeyValueStore> {
    repository: SettingsRepository<S>,
}

impl<S: KeyValueStore> SettingsService<S> {
    pub fn new(store: Arc<S>, keys: StorageKeys) -> Self {
        Self {
            repository: SettingsRepository::new(store, keys),
        }
    }

    /// Load, merge with defaults, repair and write back
    pub fn load(&self) -> Settings {
        let settings = match self.repository.load() {
            Some(stored) => stored.into_settings(),
            None => {
                info!("No stored settings, starting from defaults");
                default_settings()
            }
        };
        let settings = ensure_integrity(settings);
        self.persist(&settings);
        settings
    }

    /// Write settings, logging a failure instead of returning it
    pub fn persist(&self, settings: &Settings) -> bool {
        match self.repository.save(settings) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to save settings: {}", e);
                false
            }
        }
    }

    /// Replace `settings` with its repaired form and persist it
    pub fn commit(&self, settings: &mut Settings) {
        *settings = ensure_integrity(settings.clone());
        self.persist(settings);
    }

    pub fn add_hero(&self, settings: &mut Settings, command: AddHeroCommand) -> Hero {
        let hero = Hero {
            id: Hero::generate_id(settings.heroes.len(), &unique_suffix()),
            name: command.name.unwrap_or_else(|| NEW_HERO_NAME.to_string()),
            color: command.color.unwrap_or_else(|| NEW_HERO_COLOR.to_string()),
            emoji: Some(command.emoji.unwrap_or_else(|| DEFAULT_HERO_EMOJI.to_string())),
        };
        settings.heroes.push(hero.clone());
        self.commit(settings);

        info!("Added hero {}", hero.id);
        repaired_hero(settings, hero)
    }

    /// Remove a hero. Removing the last one brings back the default heroes.
    pub fn remove_hero(&self, settings: &mut Settings, hero_id: &str) -> Result<Hero, ProgressError> {
        let position = settings
            .heroes
            .iter()
            .position(|hero| hero.id == hero_id)
            .ok_or_else(|| ProgressError::UnknownHero(hero_id.to_string()))?;
        let removed = settings.heroes.remove(position);
        self.commit(settings);

        info!("Removed hero {}", hero_id);
        Ok(removed)
    }

    pub fn update_hero(&self, settings: &mut Settings, command: UpdateHeroCommand) -> Result<Hero, ProgressError> {
        let hero = settings
            .heroes
            .iter_mut()
            .find(|hero| hero.id == command.hero_id)
            .ok_or_else(|| ProgressError::UnknownHero(command.hero_id.clone()))?;

        if let Some(name) = command.name {
            hero.name = name;
        }
        if let Some(color) = command.color {
            hero.color = color;
        }
        if let Some(emoji) = command.emoji {
            hero.emoji = Some(emoji);
        }
        let edited = hero.clone();
        self.commit(settings);

        Ok(repaired_hero(settings, edited))
    }

    pub fn add_quest(&self, settings: &mut Settings, command: AddQuestCommand) -> Quest {
        let quest = Quest {
            id: Quest::generate_id(settings.quests.len(), &unique_suffix()),
            name: command.name.unwrap_or_else(|| NEW_QUEST_NAME.to_string()),
            icon: command.icon.unwrap_or_else(|| DEFAULT_QUEST_ICON.to_string()),
        };
        settings.quests.push(quest.clone());
        self.commit(settings);

        info!("Added quest {}", quest.id);
        repaired_quest(settings, quest)
    }

    /// Remove a quest. Removing the last one brings back the default quests.
    pub fn remove_quest(&self, settings: &mut Settings, quest_id: &str) -> Result<Quest, ProgressError> {
        let position = settings
            .quests
            .iter()
            .position(|quest| quest.id == quest_id)
            .ok_or_else(|| ProgressError::UnknownQuest(quest_id.to_string()))?;
        let removed = settings.quests.remove(position);
        self.commit(settings);

        info!("Removed quest {}", quest_id);
        Ok(removed)
    }

    pub fn update_quest(&self, settings: &mut Settings, command: UpdateQuestCommand) -> Result<Quest, ProgressError> {
        let quest = settings
            .quests
            .iter_mut()
            .find(|quest| quest.id == command.quest_id)
            .ok_or_else(|| ProgressError::UnknownQuest(command.quest_id.clone()))?;

        if let Some(name) = command.name {
            quest.name = name;
        }
        if let Some(icon) = command.icon {
            quest.icon = icon;
        }
        let edited = quest.clone();
        self.commit(settings);

        Ok(repaired_quest(settings, edited))
    }

    pub fn set_sound_enabled(&self, settings: &mut Settings, enabled: bool) {
        settings.sound_enabled = enabled;
        self.commit(settings);
    }

    pub fn set_speech_enabled(&self, settings: &mut Settings, enabled: bool) {
        settings.speech_enabled = enabled;
        self.commit(settings);
    }

    pub fn set_speech_voice(&self, settings: &mut Settings, voice: &str) {
        settings.speech_voice = voice.to_string();
        self.commit(settings);
    }

    /// Store a speech rate, clamped to the supported range. Zero or a
    /// non-finite value resets it to the default.
    pub fn set_speech_rate(&self, settings: &mut Settings, rate: f64) -> f64 {
        settings.speech_rate = normalize_speech_rate(rate);
        self.commit(settings);
        settings.speech_rate
    }
}

pub fn normalize_speech_rate(rate: f64) -> f64 {
    if !rate.is_finite() || rate == 0.0 {
        DEFAULT_SPEECH_RATE
    } else {
        rate.clamp(MIN_SPEECH_RATE, MAX_SPEECH_RATE)
    }
}

/// The stored form of `edited` after the integrity pass
fn repaired_hero(settings: &Settings, edited: Hero) -> Hero {
    settings.find_hero(&edited.id).cloned().unwrap_or(edited)
}

fn repaired_quest(settings: &Settings, edited: Quest) -> Quest {
    settings.find_quest(&edited.id).cloned().unwrap_or(edited)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::settings::default_heroes;
    use crate::storage::MemoryStore;

    fn setup() -> (Arc<MemoryStore>, SettingsService<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let service = SettingsService::new(store.clone(), StorageKeys::default());
        (store, service)
    }

    #[test]
    fn test_load_without_stored_settings_persists_defaults() {
        let (store, service) = setup();
        let settings = service.load();

        assert_eq!(settings, default_settings());
        assert!(store.get("aurora-settings-v2").unwrap().is_some());
    }

    #[test]
    fn test_load_repairs_stored_settings() {
        let (store, service) = setup();
        store
            .put(
                "aurora-settings-v2",
                r#"{"heroes": [], "quests": [{"name": ""}], "speechRate": "oops"}"#,
            )
            .unwrap();

        let settings = service.load();
        assert_eq!(settings.heroes, default_heroes());
        assert_eq!(settings.quests.len(), 1);
        assert_eq!(settings.quests[0].name, "Quest 1");
        assert!(!settings.quests[0].id.is_empty());
        assert_eq!(settings.speech_rate, 1.0);

        // The repaired form was written back and reloads unchanged
        assert_eq!(service.load(), settings);
    }

    #[test]
    fn test_load_with_corrupt_blob_falls_back_to_defaults() {
        let (store, service) = setup();
        store.put("aurora-settings-v2", "{{{").unwrap();
        assert_eq!(service.load(), default_settings());
    }

    #[test]
    fn test_add_and_update_hero() {
        let (_store, service) = setup();
        let mut settings = service.load();

        let hero = service.add_hero(&mut settings, AddHeroCommand::default());
        assert_eq!(hero.name, NEW_HERO_NAME);
        assert_eq!(hero.color, NEW_HERO_COLOR);
        assert!(hero.id.starts_with("hero-2-"));
        assert_eq!(settings.heroes.len(), 3);

        let updated = service
            .update_hero(
                &mut settings,
                UpdateHeroCommand {
                    hero_id: hero.id.clone(),
                    name: Some("Sora".to_string()),
                    color: Some("not a color".to_string()),
                    emoji: None,
                },
            )
            .unwrap();
        assert_eq!(updated.name, "Sora");
        // Invalid color replaced by the palette color for position 2
        assert_eq!(updated.color, "#a855f7");
        assert_eq!(service.load(), settings);
    }

    #[test]
    fn test_unknown_ids_are_rejected() {
        let (_store, service) = setup();
        let mut settings = service.load();

        assert_eq!(
            service.remove_hero(&mut settings, "nobody"),
            Err(ProgressError::UnknownHero("nobody".to_string()))
        );
        assert_eq!(
            service.update_quest(
                &mut settings,
                UpdateQuestCommand {
                    quest_id: "nothing".to_string(),
                    ..Default::default()
                }
            ),
            Err(ProgressError::UnknownQuest("nothing".to_string()))
        );
        assert_eq!(settings, default_settings());
    }

    #[test]
    fn test_removing_last_quest_restores_defaults() {
        let (_store, service) = setup();
        let mut settings = service.load();
        let ids: Vec<String> = settings.quests.iter().map(|q| q.id.clone()).collect();

        for id in &ids {
            service.remove_quest(&mut settings, id).unwrap();
        }
        assert_eq!(settings.quests, default_settings().quests);
    }

    #[test]
    fn test_add_and_update_quest() {
        let (_store, service) = setup();
        let mut settings = service.load();

        let quest = service.add_quest(
            &mut settings,
            AddQuestCommand {
                name: Some("Water the plants".to_string()),
                icon: None,
            },
        );
        assert_eq!(quest.icon, "⭐");

        let updated = service
            .update_quest(
                &mut settings,
                UpdateQuestCommand {
                    quest_id: quest.id.clone(),
                    name: Some(String::new()),
                    icon: Some("🪴".to_string()),
                },
            )
            .unwrap();
        assert_eq!(updated.name, "Quest 4");
        assert_eq!(updated.icon, "🪴");
    }

    #[test]
    fn test_toggles_and_speech_settings() {
        let (_store, service) = setup();
        let mut settings = service.load();

        service.set_sound_enabled(&mut settings, false);
        service.set_speech_enabled(&mut settings, true);
        service.set_speech_voice(&mut settings, "en-GB");
        assert_eq!(service.set_speech_rate(&mut settings, 3.0), MAX_SPEECH_RATE);

        let reloaded = service.load();
        assert!(!reloaded.sound_enabled);
        assert!(reloaded.speech_enabled);
        assert_eq!(reloaded.speech_voice, "en-GB");
        assert_eq!(reloaded.speech_rate, MAX_SPEECH_RATE);
    }

    #[test]
    fn test_normalize_speech_rate() {
        assert_eq!(normalize_speech_rate(f64::NAN), 1.0);
        assert_eq!(normalize_speech_rate(0.0), 1.0);
        assert_eq!(normalize_speech_rate(0.1), MIN_SPEECH_RATE);
        assert_eq!(normalize_speech_rate(1.2), 1.2);
    }

    #[test]
    fn test_failed_write_keeps_in_memory_change() {
        let (store, service) = setup();
        let mut settings = service.load();
        store.set_reject_writes(true);

        service.set_sound_enabled(&mut settings, false);
        assert!(!settings.sound_enabled);

        store.set_reject_writes(false);
        assert!(service.load().sound_enabled);
    }
}
