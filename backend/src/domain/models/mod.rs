//! Stored shapes of the values kept in the key-value store.

pub mod daily_record;
pub mod export;
pub mod settings;
pub mod spent_ledger;

pub use daily_record::DailyRecord;
pub use export::StoredMonthExport;
pub use settings::{default_settings, StoredSettings};
pub use spent_ledger::SpentLedger;

use serde_json::Value;

/// Read a number out of a loosely typed JSON value. Numeric strings are
/// accepted; anything else (including non-finite results) yields None.
pub(crate) fn number_from_value(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_number_from_value() {
        assert_eq!(number_from_value(&json!(3)), Some(3.0));
        assert_eq!(number_from_value(&json!(1.5)), Some(1.5));
        assert_eq!(number_from_value(&json!(" 2 ")), Some(2.0));
        assert_eq!(number_from_value(&json!("NaN")), None);
        assert_eq!(number_from_value(&json!("abc")), None);
        assert_eq!(number_from_value(&json!(null)), None);
        assert_eq!(number_from_value(&json!(true)), None);
    }
}
