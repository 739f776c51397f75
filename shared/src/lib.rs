use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A tracked child profile.
///
/// Hero ID format: "hero-<index>-<suffix>" for generated ids. Seeded and
/// imported ids are kept as-is once assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hero {
    pub id: String,
    /// Display name (max 20 characters)
    pub name: String,
    /// Accent color in `#rgb` or `#rrggbb` form
    pub color: String,
    /// Avatar glyph shown next to the name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
}

/// A recurring task definition assigned to every hero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quest {
    pub id: String,
    /// Display name (max 40 characters)
    pub name: String,
    pub icon: String,
}

/// A redeemable item priced in stars. Not wired into any redemption flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reward {
    pub id: String,
    pub name: String,
    pub stars: u32,
}

/// Process-wide settings blob, persisted as a single JSON value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub heroes: Vec<Hero>,
    pub quests: Vec<Quest>,
    pub rewards: Vec<Reward>,
    pub sound_enabled: bool,
    pub speech_enabled: bool,
    pub speech_voice: String,
    pub speech_rate: f64,
}

impl Settings {
    pub fn find_hero(&self, hero_id: &str) -> Option<&Hero> {
        self.heroes.iter().find(|hero| hero.id == hero_id)
    }

    pub fn find_quest(&self, quest_id: &str) -> Option<&Quest> {
        self.quests.iter().find(|quest| quest.id == quest_id)
    }
}

/// Done/total quest counts for one hero on one day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DailyCompletion {
    pub done: u32,
    pub total: u32,
}

impl DailyCompletion {
    /// True when there is nothing to evaluate (no quests configured)
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// True when every quest is done and there was at least one quest
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.done == self.total
    }

    /// Completion ratio in `0.0..=1.0`, 0 when there are no quests
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.done as f64 / self.total as f64
        }
    }

    /// Rounded percentage, 0 when there are no quests
    pub fn percent(&self) -> u32 {
        percent_of(self.done, self.total)
    }
}

/// Rounded `done / total * 100`, defined as 0 for an empty total
pub fn percent_of(done: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (done as f64 / total as f64 * 100.0).round() as u32
}

/// Day-level decoration state on the calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarDayState {
    /// Every hero finished every quest
    Complete,
    /// At least one hero made progress, but not everyone is done
    Partial,
    /// Nobody made progress; such days are left undecorated
    None,
}

/// A colored marker for one hero with progress on a day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDot {
    pub hero_id: String,
    pub color: String,
    pub opacity: f64,
}

/// One hero's line in a day tooltip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroDayProgress {
    pub hero_id: String,
    pub name: String,
    pub done: u32,
    pub total: u32,
}

/// Structured tooltip content; formatting is left to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayTooltip {
    pub date: NaiveDate,
    pub heroes: Vec<HeroDayProgress>,
    pub avg_completion: u32,
}

/// Calendar decoration for a single decorated day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayStatus {
    pub state: CalendarDayState,
    /// Rounded mean of every hero's completion ratio, in percent
    pub avg_completion: u32,
    pub dots: Vec<CalendarDot>,
    pub tooltip: DayTooltip,
}

/// Decorated days keyed by date; undecorated days are absent
pub type CalendarStatus = BTreeMap<NaiveDate, DayStatus>;

/// Month-range totals for one hero
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroMonthSummary {
    pub hero_id: String,
    pub name: String,
    pub done: u32,
    /// Always `days_in_month * quest_count`
    pub total: u32,
    pub percent: u32,
    /// Net star balance for the month
    pub stars: u32,
}

/// Headline shown above a hero's quest list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "remaining", rename_all = "camelCase")]
pub enum ProgressHeadline {
    NoQuests,
    AllClear,
    NotStarted,
    Remaining(u32),
}

impl ProgressHeadline {
    pub fn from_completion(completion: DailyCompletion) -> Self {
        if completion.total == 0 {
            ProgressHeadline::NoQuests
        } else if completion.done >= completion.total {
            ProgressHeadline::AllClear
        } else if completion.done == 0 {
            ProgressHeadline::NotStarted
        } else {
            ProgressHeadline::Remaining(completion.total - completion.done)
        }
    }
}

/// Whether a quest is done for a hero on the viewed day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestStatus {
    pub quest_id: String,
    pub name: String,
    pub icon: String,
    pub done: bool,
}

/// Everything a hero card on the dashboard needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroCard {
    pub hero: Hero,
    pub streak: u32,
    pub stars: u32,
    pub completion: DailyCompletion,
    pub percent: u32,
    pub headline: ProgressHeadline,
    pub quests: Vec<QuestStatus>,
}

/// Hero with the longest running streak (ties broken by monthly stars)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Champion {
    pub hero_id: String,
    pub name: String,
    pub streak: u32,
    pub stars: u32,
}

/// Banner-level totals for the viewed day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyOverview {
    pub date: NaiveDate,
    pub hero_count: usize,
    pub quest_count: usize,
    pub done: u32,
    pub total: u32,
    pub completion_rate: u32,
    pub champion: Option<Champion>,
}

/// Portable month backup. Field names are part of the on-disk format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthExport {
    pub generated_at: DateTime<Utc>,
    pub settings: Settings,
    /// Month key, `YYYY-MM`
    pub month: String,
    /// Date key → hero id → quest id → done
    pub entries: BTreeMap<String, BTreeMap<String, BTreeMap<String, bool>>>,
}

impl Hero {
    /// Generate a hero id from its list position and a unique suffix
    pub fn generate_id(index: usize, suffix: &str) -> String {
        format!("hero-{}-{}", index, suffix)
    }
}

impl Quest {
    /// Generate a quest id from its list position and a unique suffix
    pub fn generate_id(index: usize, suffix: &str) -> String {
        format!("quest-{}-{}", index, suffix)
    }
}

impl Reward {
    pub fn generate_id(index: usize, suffix: &str) -> String {
        format!("reward-{}-{}", index, suffix)
    }
}

/// Validate a `#rgb` / `#rrggbb` color string
pub fn is_hex_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(digits) => {
            (digits.len() == 3 || digits.len() == 6)
                && digits.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    }
}
