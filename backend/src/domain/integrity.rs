//! Settings normalization and repair.
//!
//! `ensure_integrity` is pure: it takes settings by value and hands back the
//! repaired copy. Persisting the result is the caller's job.

use shared::{is_hex_color, Hero, Quest, Reward, Settings};
use std::collections::HashSet;
use uuid::Uuid;

use super::models::settings::{
    default_heroes, default_quests, default_rewards, DEFAULT_HERO_EMOJI, DEFAULT_QUEST_ICON,
    DEFAULT_SPEECH_RATE,
};
use super::models::DailyRecord;

pub const MAX_HERO_NAME_CHARS: usize = 20;
pub const MAX_QUEST_NAME_CHARS: usize = 40;
pub const MAX_REWARD_NAME_CHARS: usize = 40;

/// Repair settings so every invariant holds:
///
/// - hero, quest and reward lists are never empty
/// - every entry has a non-empty id unique within its list
/// - every entry has a non-empty, length-limited name
/// - heroes carry a valid hex color and an emoji
/// - reward prices are at least one star
/// - the speech rate is finite
///
/// Running it twice gives the same result as running it once.
pub fn ensure_integrity(settings: Settings) -> Settings {
    let heroes = if settings.heroes.is_empty() {
        default_heroes()
    } else {
        settings.heroes
    };
    let quests = if settings.quests.is_empty() {
        default_quests()
    } else {
        settings.quests
    };
    let rewards = if settings.rewards.is_empty() {
        default_rewards()
    } else {
        settings.rewards
    };

    Settings {
        heroes: repair_heroes(heroes),
        quests: repair_quests(quests),
        rewards: repair_rewards(rewards),
        sound_enabled: settings.sound_enabled,
        speech_enabled: settings.speech_enabled,
        speech_voice: settings.speech_voice,
        speech_rate: if settings.speech_rate.is_finite() {
            settings.speech_rate
        } else {
            DEFAULT_SPEECH_RATE
        },
    }
}

/// Drop hero and quest entries that no longer exist in `settings`
pub fn prune_record(mut record: DailyRecord, settings: &Settings) -> DailyRecord {
    record.retain_known(settings);
    record
}

/// Random suffix for generated ids
pub fn unique_suffix() -> String {
    Uuid::new_v4().simple().to_string()
}

fn repair_heroes(heroes: Vec<Hero>) -> Vec<Hero> {
    let palette = default_heroes();
    let mut seen = HashSet::new();

    heroes
        .into_iter()
        .enumerate()
        .map(|(index, hero)| {
            let id = unique_id(hero.id, &mut seen, || Hero::generate_id(index, &unique_suffix()));
            let color = if is_hex_color(&hero.color) {
                hero.color
            } else {
                palette[index % palette.len()].color.clone()
            };
            Hero {
                id,
                name: fill_name(hero.name, "Hero", index, MAX_HERO_NAME_CHARS),
                color,
                emoji: Some(hero.emoji.unwrap_or_else(|| DEFAULT_HERO_EMOJI.to_string())),
            }
        })
        .collect()
}

fn repair_quests(quests: Vec<Quest>) -> Vec<Quest> {
    let mut seen = HashSet::new();

    quests
        .into_iter()
        .enumerate()
        .map(|(index, quest)| Quest {
            id: unique_id(quest.id, &mut seen, || Quest::generate_id(index, &unique_suffix())),
            name: fill_name(quest.name, "Quest", index, MAX_QUEST_NAME_CHARS),
            icon: if quest.icon.trim().is_empty() {
                DEFAULT_QUEST_ICON.to_string()
            } else {
                quest.icon
            },
        })
        .collect()
}

fn repair_rewards(rewards: Vec<Reward>) -> Vec<Reward> {
    let mut seen = HashSet::new();

    rewards
        .into_iter()
        .enumerate()
        .map(|(index, reward)| Reward {
            id: unique_id(reward.id, &mut seen, || Reward::generate_id(index, &unique_suffix())),
            name: fill_name(reward.name, "Reward", index, MAX_REWARD_NAME_CHARS),
            stars: reward.stars.max(1),
        })
        .collect()
}

/// Keep `id` if it is non-empty and not yet taken, otherwise generate one
fn unique_id(id: String, seen: &mut HashSet<String>, generate: impl Fn() -> String) -> String {
    let id = if id.trim().is_empty() || seen.contains(&id) {
        let mut fresh = generate();
        while seen.contains(&fresh) {
            fresh = generate();
        }
        fresh
    } else {
        id
    };
    seen.insert(id.clone());
    id
}

fn fill_name(name: String, label: &str, index: usize, max_chars: usize) -> String {
    let name = if name.chars().count() > max_chars {
        name.chars().take(max_chars).collect()
    } else {
        name
    };
    if name.trim().is_empty() {
        format!("{} {}", label, index + 1)
    } else {
        name
    }
}
