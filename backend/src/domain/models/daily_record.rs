//! Domain model for one day's completion flags.
//!
//! Stored shape: `{ "<hero id>": { "<quest id>": true } }`. Older data used
//! the strings `"done"` / `"todo"` instead of booleans; both are accepted on
//! read and only booleans are written back.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use shared::{DailyCompletion, Quest, Settings};
use std::collections::{BTreeMap, HashSet};

/// Completion flags for a single date: hero id → quest id → done
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DailyRecord {
    heroes: BTreeMap<String, BTreeMap<String, bool>>,
}

/// Any JSON value that might appear as a flag
#[derive(Deserialize)]
#[serde(untagged)]
enum RawFlag {
    Bool(bool),
    Text(String),
    Other(IgnoredAny),
}

impl RawFlag {
    fn is_done(&self) -> bool {
        match self {
            RawFlag::Bool(done) => *done,
            RawFlag::Text(text) => text == "done",
            RawFlag::Other(_) => false,
        }
    }
}

impl<'de> Deserialize<'de> for DailyRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // A hero entry of `null` reads as "nothing recorded"
        let raw = BTreeMap::<String, Option<BTreeMap<String, RawFlag>>>::deserialize(deserializer)?;

        let heroes = raw
            .into_iter()
            .filter_map(|(hero_id, quests)| {
                let quests = quests?
                    .into_iter()
                    .map(|(quest_id, flag)| (quest_id, flag.is_done()))
                    .collect();
                Some((hero_id, quests))
            })
            .collect();

        Ok(DailyRecord { heroes })
    }
}

impl DailyRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.heroes.is_empty()
    }

    pub fn has_hero(&self, hero_id: &str) -> bool {
        self.heroes.contains_key(hero_id)
    }

    pub fn is_done(&self, hero_id: &str, quest_id: &str) -> bool {
        self.heroes
            .get(hero_id)
            .and_then(|quests| quests.get(quest_id))
            .copied()
            .unwrap_or(false)
    }

    pub fn set(&mut self, hero_id: &str, quest_id: &str, done: bool) {
        self.heroes
            .entry(hero_id.to_string())
            .or_default()
            .insert(quest_id.to_string(), done);
    }

    /// Flip a flag and return its new value
    pub fn toggle(&mut self, hero_id: &str, quest_id: &str) -> bool {
        let done = !self.is_done(hero_id, quest_id);
        self.set(hero_id, quest_id, done);
        done
    }

    /// Drop everything recorded for a hero.
    /// Returns true if the hero had an entry.
    pub fn remove_hero(&mut self, hero_id: &str) -> bool {
        self.heroes.remove(hero_id).is_some()
    }

    /// Number of `quests` the hero has done. Flags for quests outside the
    /// list are ignored.
    pub fn count_done(&self, hero_id: &str, quests: &[Quest]) -> u32 {
        match self.heroes.get(hero_id) {
            Some(flags) => quests
                .iter()
                .filter(|quest| flags.get(&quest.id).copied().unwrap_or(false))
                .count() as u32,
            None => 0,
        }
    }

    /// Done/total against the given quest list
    pub fn completion(&self, hero_id: &str, quests: &[Quest]) -> DailyCompletion {
        DailyCompletion {
            done: self.count_done(hero_id, quests),
            total: quests.len() as u32,
        }
    }

    /// Keep only heroes and quests that exist in `settings`.
    /// Returns true if anything was removed.
    pub fn retain_known(&mut self, settings: &Settings) -> bool {
        let hero_ids: HashSet<&str> = settings.heroes.iter().map(|h| h.id.as_str()).collect();
        let quest_ids: HashSet<&str> = settings.quests.iter().map(|q| q.id.as_str()).collect();

        let before = self.flag_count();
        let heroes_before = self.heroes.len();

        self.heroes.retain(|hero_id, _| hero_ids.contains(hero_id.as_str()));
        for flags in self.heroes.values_mut() {
            flags.retain(|quest_id, _| quest_ids.contains(quest_id.as_str()));
        }

        self.heroes.len() != heroes_before || self.flag_count() != before
    }

    pub fn into_entries(self) -> BTreeMap<String, BTreeMap<String, bool>> {
        self.heroes
    }

    fn flag_count(&self) -> usize {
        self.heroes.values().map(|flags| flags.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::settings::default_settings;

    fn quest(id: &str) -> Quest {
        Quest {
            id: id.to_string(),
            name: id.to_string(),
            icon: "⭐".to_string(),
        }
    }

    #[test]
    fn test_reads_boolean_and_legacy_string_flags() {
        let json = r#"{
            "hero-a": {"q1": true, "q2": false, "q3": "done", "q4": "todo", "q5": 1},
            "hero-b": null
        }"#;
        let record: DailyRecord = serde_json::from_str(json).unwrap();

        assert!(record.is_done("hero-a", "q1"));
        assert!(!record.is_done("hero-a", "q2"));
        assert!(record.is_done("hero-a", "q3"));
        assert!(!record.is_done("hero-a", "q4"));
        assert!(!record.is_done("hero-a", "q5"));
        assert!(!record.has_hero("hero-b"));
    }

    #[test]
    fn test_writes_booleans_only() {
        let record: DailyRecord = serde_json::from_str(r#"{"hero-a": {"q1": "done"}}"#).unwrap();
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"hero-a":{"q1":true}}"#);
    }

    #[test]
    fn test_toggle_flips_state() {
        let mut record = DailyRecord::new();
        assert!(record.toggle("hero-a", "q1"));
        assert!(record.is_done("hero-a", "q1"));
        assert!(!record.toggle("hero-a", "q1"));
        assert!(!record.is_done("hero-a", "q1"));
    }

    #[test]
    fn test_count_done_ignores_unknown_quests() {
        let mut record = DailyRecord::new();
        record.set("hero-a", "q1", true);
        record.set("hero-a", "retired", true);

        let quests = vec![quest("q1"), quest("q2")];
        assert_eq!(record.count_done("hero-a", &quests), 1);
        assert_eq!(record.completion("hero-a", &quests), DailyCompletion { done: 1, total: 2 });
        assert_eq!(record.completion("nobody", &quests), DailyCompletion { done: 0, total: 2 });
    }

    #[test]
    fn test_retain_known_prunes_orphans() {
        let settings = default_settings();
        let known_hero = settings.heroes[0].id.clone();
        let known_quest = settings.quests[0].id.clone();

        let mut record = DailyRecord::new();
        record.set(&known_hero, &known_quest, true);
        record.set(&known_hero, "deleted-quest", true);
        record.set("deleted-hero", &known_quest, true);

        assert!(record.retain_known(&settings));
        assert!(record.is_done(&known_hero, &known_quest));
        assert!(!record.is_done(&known_hero, "deleted-quest"));
        assert!(!record.has_hero("deleted-hero"));

        // Nothing left to prune
        assert!(!record.retain_known(&settings));
    }
}
