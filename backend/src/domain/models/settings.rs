//! Settings as read back from storage, before the integrity pass.
//!
//! Every field is optional so that partially written or older blobs still
//! load; missing fields are merged from the defaults. Older exports used
//! `kids`/`tasks`/`sound`/`tts`/`ttsVoice`/`ttsRate`, which are accepted as
//! aliases.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::{Hero, Quest, Reward, Settings};

use super::number_from_value;

pub const DEFAULT_HERO_EMOJI: &str = "🧒";
pub const DEFAULT_QUEST_ICON: &str = "⭐";
pub const DEFAULT_SPEECH_RATE: f64 = 1.0;
/// Accent color given to heroes added from the settings screen
pub const NEW_HERO_COLOR: &str = "#f472b6";

/// Intermediate struct for lenient settings deserialization
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSettings {
    #[serde(default, alias = "kids")]
    pub heroes: Option<Vec<StoredHero>>,
    #[serde(default, alias = "tasks")]
    pub quests: Option<Vec<StoredQuest>>,
    #[serde(default)]
    pub rewards: Option<Vec<StoredReward>>,
    #[serde(default, alias = "sound")]
    pub sound_enabled: Option<bool>,
    #[serde(default, alias = "tts")]
    pub speech_enabled: Option<bool>,
    #[serde(default, alias = "ttsVoice")]
    pub speech_voice: Option<String>,
    /// Kept raw: older blobs hold strings or nulls here
    #[serde(default, alias = "ttsRate")]
    pub speech_rate: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredHero {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub emoji: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredQuest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredReward {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub stars: Option<Value>,
}

impl StoredSettings {
    /// Merge with the defaults. Blank fields are left blank here; the
    /// integrity pass fills them in.
    pub fn into_settings(self) -> Settings {
        let defaults = default_settings();

        Settings {
            heroes: match self.heroes {
                Some(heroes) => heroes.into_iter().map(StoredHero::into_hero).collect(),
                None => defaults.heroes,
            },
            quests: match self.quests {
                Some(quests) => quests.into_iter().map(StoredQuest::into_quest).collect(),
                None => defaults.quests,
            },
            rewards: match self.rewards {
                Some(rewards) => rewards.into_iter().map(StoredReward::into_reward).collect(),
                None => defaults.rewards,
            },
            sound_enabled: self.sound_enabled.unwrap_or(defaults.sound_enabled),
            speech_enabled: self.speech_enabled.unwrap_or(defaults.speech_enabled),
            speech_voice: self.speech_voice.unwrap_or(defaults.speech_voice),
            speech_rate: match self.speech_rate {
                Some(raw) => number_from_value(&raw).unwrap_or(f64::NAN),
                None => defaults.speech_rate,
            },
        }
    }
}

impl StoredHero {
    fn into_hero(self) -> Hero {
        Hero {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            color: self.color.unwrap_or_default(),
            emoji: self.emoji,
        }
    }
}

impl StoredQuest {
    fn into_quest(self) -> Quest {
        Quest {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            icon: self.icon.unwrap_or_default(),
        }
    }
}

impl StoredReward {
    fn into_reward(self) -> Reward {
        let stars = self
            .stars
            .as_ref()
            .and_then(number_from_value)
            .filter(|stars| *stars >= 1.0)
            .map(|stars| stars.min(u32::MAX as f64) as u32)
            .unwrap_or(0);

        Reward {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            stars,
        }
    }
}

/// Built-in hero seed. Returns fresh values on every call.
pub fn default_heroes() -> Vec<Hero> {
    vec![
        Hero {
            id: "hero-hikari".to_string(),
            name: "Hikari".to_string(),
            color: "#a855f7".to_string(),
            emoji: Some("🌟".to_string()),
        },
        Hero {
            id: "hero-mirai".to_string(),
            name: "Mirai".to_string(),
            color: "#22d3ee".to_string(),
            emoji: Some("🚀".to_string()),
        },
    ]
}

/// Built-in quest seed
pub fn default_quests() -> Vec<Quest> {
    vec![
        Quest {
            id: "quest-dishes".to_string(),
            name: "Wash the dishes".to_string(),
            icon: "🍽️".to_string(),
        },
        Quest {
            id: "quest-laundry".to_string(),
            name: "Fold the laundry".to_string(),
            icon: "🧺".to_string(),
        },
        Quest {
            id: "quest-tidy".to_string(),
            name: "Tidy your room".to_string(),
            icon: "🧹".to_string(),
        },
    ]
}

/// Built-in reward seed
pub fn default_rewards() -> Vec<Reward> {
    vec![
        Reward {
            id: "reward-snack".to_string(),
            name: "Special snack".to_string(),
            stars: 4,
        },
        Reward {
            id: "reward-games".to_string(),
            name: "15 minutes of games".to_string(),
            stars: 6,
        },
    ]
}

pub fn default_settings() -> Settings {
    Settings {
        heroes: default_heroes(),
        quests: default_quests(),
        rewards: default_rewards(),
        sound_enabled: true,
        speech_enabled: false,
        speech_voice: String::new(),
        speech_rate: DEFAULT_SPEECH_RATE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_are_merged_from_defaults() {
        let stored: StoredSettings = serde_json::from_str(r#"{"soundEnabled": false}"#).unwrap();
        let settings = stored.into_settings();

        assert!(!settings.sound_enabled);
        assert_eq!(settings.heroes, default_heroes());
        assert_eq!(settings.quests, default_quests());
        assert_eq!(settings.rewards, default_rewards());
        assert_eq!(settings.speech_rate, 1.0);
    }

    #[test]
    fn test_legacy_field_names_are_accepted() {
        let json = r##"{
            "kids": [{"id": "kid-a", "name": "A", "color": "#123456", "emoji": "🐱"}],
            "tasks": [{"id": "task-a", "name": "Feed the cat", "icon": "🐟"}],
            "sound": false,
            "tts": true,
            "ttsVoice": "voice-1",
            "ttsRate": 1.2
        }"##;
        let settings = serde_json::from_str::<StoredSettings>(json).unwrap().into_settings();

        assert_eq!(settings.heroes.len(), 1);
        assert_eq!(settings.heroes[0].id, "kid-a");
        assert_eq!(settings.quests[0].name, "Feed the cat");
        assert!(!settings.sound_enabled);
        assert!(settings.speech_enabled);
        assert_eq!(settings.speech_voice, "voice-1");
        assert_eq!(settings.speech_rate, 1.2);
    }

    #[test]
    fn test_unreadable_speech_rate_becomes_nan() {
        let stored: StoredSettings = serde_json::from_str(r#"{"speechRate": "fast"}"#).unwrap();
        assert!(stored.into_settings().speech_rate.is_nan());

        let stored: StoredSettings = serde_json::from_str(r#"{"speechRate": "0.8"}"#).unwrap();
        assert_eq!(stored.into_settings().speech_rate, 0.8);
    }

    #[test]
    fn test_partial_hero_records_keep_blank_fields() {
        let stored: StoredSettings = serde_json::from_str(r#"{"heroes": [{"name": "Solo"}]}"#).unwrap();
        let settings = stored.into_settings();

        assert_eq!(settings.heroes[0].id, "");
        assert_eq!(settings.heroes[0].name, "Solo");
        assert_eq!(settings.heroes[0].color, "");
        assert_eq!(settings.heroes[0].emoji, None);
    }

    #[test]
    fn test_reward_stars_are_read_leniently() {
        let json = r#"{"rewards": [
            {"id": "a", "name": "A", "stars": 3},
            {"id": "b", "name": "B", "stars": -2},
            {"id": "c", "name": "C", "stars": "5"}
        ]}"#;
        let settings = serde_json::from_str::<StoredSettings>(json).unwrap().into_settings();
        let stars: Vec<u32> = settings.rewards.iter().map(|r| r.stars).collect();

        assert_eq!(stars, vec![3, 0, 5]);
    }

    #[test]
    fn test_default_seed_is_not_shared() {
        let mut first = default_heroes();
        first[0].name = "Changed".to_string();
        assert_eq!(default_heroes()[0].name, "Hikari");
    }
}
