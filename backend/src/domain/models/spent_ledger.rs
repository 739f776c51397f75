//! Stars already redeemed per hero for one month.
//!
//! Nothing in the board writes this ledger yet; it is read when computing
//! star balances and cleared by a month reset.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::number_from_value;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SpentLedger {
    spent: BTreeMap<String, u32>,
}

impl<'de> Deserialize<'de> for SpentLedger {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
        let spent = raw
            .into_iter()
            .map(|(hero_id, value)| {
                let stars = number_from_value(&value)
                    .filter(|stars| *stars > 0.0)
                    .map(|stars| stars.min(u32::MAX as f64) as u32)
                    .unwrap_or(0);
                (hero_id, stars)
            })
            .collect();
        Ok(SpentLedger { spent })
    }
}

impl SpentLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stars redeemed by a hero, 0 when nothing is recorded
    pub fn spent_for(&self, hero_id: &str) -> u32 {
        self.spent.get(hero_id).copied().unwrap_or(0)
    }

    pub fn set(&mut self, hero_id: &str, stars: u32) {
        self.spent.insert(hero_id.to_string(), stars);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lenient_values_read_as_zero() {
        let json = r#"{"a": 4, "b": -3, "c": "2", "d": null, "e": "lots"}"#;
        let ledger: SpentLedger = serde_json::from_str(json).unwrap();

        assert_eq!(ledger.spent_for("a"), 4);
        assert_eq!(ledger.spent_for("b"), 0);
        assert_eq!(ledger.spent_for("c"), 2);
        assert_eq!(ledger.spent_for("d"), 0);
        assert_eq!(ledger.spent_for("e"), 0);
        assert_eq!(ledger.spent_for("missing"), 0);
    }
}
