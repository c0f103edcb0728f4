//! Type-aware comparison of resolved cell values.
//!
//! Every comparison is total. Absent values sort first, numbers that do not
//! parse count as zero, and dates that do not parse are grouped after all
//! valid dates. Strings go through a Unicode collator so that accents and
//! case only break ties between otherwise equal words.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use icu_collator::{Collator, CollatorOptions};
use serde_json::Value;

use crate::column::ValueType;

thread_local! {
    // Root locale. Falls back to code point order if the data cannot load.
    static COLLATOR: Option<Collator> =
        Collator::try_new(&Default::default(), CollatorOptions::new()).ok();
}

const NAIVE_DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];
// Slash dates are month first, as browsers read them.
const NAIVE_DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%B %d, %Y"];

/// Compare two resolved values under `value_type`.
///
/// `None` is an absent value: two absent values are equal and an absent value
/// sorts before any present one, whatever the type.
pub fn compare(a: Option<&Value>, b: Option<&Value>, value_type: ValueType) -> Ordering {
    let (a, b) = match (a, b) {
        (None, None) => return Ordering::Equal,
        (None, Some(_)) => return Ordering::Less,
        (Some(_), None) => return Ordering::Greater,
        (Some(a), Some(b)) => (a, b),
    };

    match value_type {
        ValueType::Number | ValueType::Cash => compare_numbers(to_number(a), to_number(b)),
        ValueType::Date => compare_timestamps(to_timestamp(a), to_timestamp(b)),
        ValueType::String => collate(&to_text(a), &to_text(b)),
    }
}

/// Coerce a value to a number the way a loosely typed client would:
/// numeric strings parse, booleans are 1 and 0, everything else is 0.
pub fn to_number(value: &Value) -> f64 {
    let n = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => parse_number(s.trim()),
        Value::Bool(true) => 1.0,
        _ => 0.0,
    };
    if n.is_nan() {
        0.0
    } else {
        n
    }
}

// Decimal literals, `0x`/`0o`/`0b` integers and the spelled-out infinities.
// Anything else, including `inf` and `nan`, is 0.
fn parse_number(s: &str) -> f64 {
    match s {
        "" => return 0.0,
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => (),
    }

    let radix = match s.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return u128::from_str_radix(&s[2..], radix).map_or(0.0, |n| n as f64);
    }

    if s.bytes().any(|b| b.is_ascii_alphabetic() && b != b'e' && b != b'E') {
        return 0.0;
    }
    s.parse::<f64>().unwrap_or(0.0)
}

/// Milliseconds since the Unix epoch, or `None` for an invalid date.
///
/// JSON numbers are taken as epoch milliseconds. Strings may be RFC 3339 or
/// one of a few naive formats, which are read as UTC.
pub fn to_timestamp(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(ms) => Some(ms),
            None => n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64),
        },
        Value::String(s) => parse_date(s.trim()),
        _ => None,
    }
}

fn parse_date(s: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    let date = NAIVE_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
        // year and month only, as "2010-05"
        .or_else(|| NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d").ok())?;
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp_millis())
}

/// Strings are used as is; other values by their display form.
pub fn to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

// Inputs are never NaN here, so partial_cmp always answers. -0.0 == 0.0.
fn compare_numbers(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

// Invalid dates are equal to each other and sort after every valid date.
fn compare_timestamps(a: Option<i64>, b: Option<i64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn collate(a: &str, b: &str) -> Ordering {
    COLLATOR.with(|collator| match collator {
        Some(collator) => collator.compare(a, b),
        None => a.cmp(b),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_sorts_first_for_every_type() {
        let five = json!(5);
        for value_type in [ValueType::String, ValueType::Number, ValueType::Date, ValueType::Cash] {
            assert_eq!(compare(None, Some(&five), value_type), Ordering::Less);
            assert_eq!(compare(Some(&five), None, value_type), Ordering::Greater);
            assert_eq!(compare(None, None, value_type), Ordering::Equal);
        }
    }

    #[test]
    fn test_unparseable_number_is_zero() {
        let abc = json!("abc");
        let five = json!("5");
        assert_eq!(compare(Some(&abc), Some(&five), ValueType::Number), Ordering::Less);
        assert_eq!(compare(Some(&abc), Some(&json!(0)), ValueType::Number), Ordering::Equal);
        assert_eq!(compare(Some(&json!({"x": 1})), Some(&json!(-1)), ValueType::Cash), Ordering::Greater);
    }

    #[test]
    fn test_numbers_compare_by_value_not_text() {
        let nine = json!(9);
        let ten = json!("10");
        assert_eq!(compare(Some(&nine), Some(&ten), ValueType::Number), Ordering::Less);
        assert_eq!(compare(Some(&nine), Some(&ten), ValueType::String), Ordering::Greater);
    }

    #[test]
    fn test_to_number_coercions() {
        assert_eq!(to_number(&json!(" 12.5 ")), 12.5);
        assert_eq!(to_number(&json!("")), 0.0);
        assert_eq!(to_number(&json!(true)), 1.0);
        assert_eq!(to_number(&json!(false)), 0.0);
        assert_eq!(to_number(&json!("NaN")), 0.0);
        assert_eq!(to_number(&json!([1, 2])), 0.0);
        assert_eq!(to_number(&json!("inf")), 0.0);
        assert_eq!(to_number(&json!("infinity")), 0.0);
        assert_eq!(to_number(&json!("-inf")), 0.0);
        assert_eq!(to_number(&json!("1.5x")), 0.0);
        assert_eq!(to_number(&json!("Infinity")), f64::INFINITY);
        assert_eq!(to_number(&json!("-Infinity")), f64::NEG_INFINITY);
        assert_eq!(to_number(&json!("2.5e3")), 2500.0);
        assert_eq!(to_number(&json!("0x10")), 16.0);
        assert_eq!(to_number(&json!("0b101")), 5.0);
        assert_eq!(to_number(&json!("0xZZ")), 0.0);
    }

    #[test]
    fn test_spelled_infinity_is_not_a_number() {
        let inf = json!("inf");
        let five = json!(5);
        assert_eq!(compare(Some(&inf), Some(&five), ValueType::Number), Ordering::Less);
        assert_eq!(compare(Some(&inf), Some(&json!(0)), ValueType::Number), Ordering::Equal);
    }

    #[test]
    fn test_dates_compare_chronologically() {
        let older = json!("2005-11-20");
        let newer = json!("2018-03-01T09:30:00Z");
        assert_eq!(compare(Some(&older), Some(&newer), ValueType::Date), Ordering::Less);

        let same_day = json!("2005-11-20 00:00:00");
        assert_eq!(compare(Some(&older), Some(&same_day), ValueType::Date), Ordering::Equal);
    }

    #[test]
    fn test_date_formats() {
        let expected = Some(1_273_881_600_000);
        assert_eq!(to_timestamp(&json!("2010-05-15")), expected);
        assert_eq!(to_timestamp(&json!("2010/05/15")), expected);
        assert_eq!(to_timestamp(&json!("05/15/2010")), expected);
        assert_eq!(to_timestamp(&json!("May 15, 2010")), expected);
        assert_eq!(to_timestamp(&json!("2010-05")), Some(1_272_672_000_000));
        assert_eq!(to_timestamp(&json!("15/05/2010")), None);
        assert_eq!(to_timestamp(&json!("2010-05-15T00:00:00+00:00")), expected);
        assert_eq!(to_timestamp(&json!(1_273_881_600_000_i64)), expected);
        assert_eq!(to_timestamp(&json!("soon")), None);
        assert_eq!(to_timestamp(&json!(true)), None);
    }

    #[test]
    fn test_slash_dates_are_month_first() {
        // 6 May 2010, not 5 June
        assert_eq!(to_timestamp(&json!("05/06/2010")), Some(1_273_104_000_000));
        let may = json!("05/06/2010");
        let june = json!("2010-06-01");
        assert_eq!(compare(Some(&may), Some(&june), ValueType::Date), Ordering::Less);
    }

    #[test]
    fn test_invalid_dates_group_after_valid_ones() {
        let valid = json!("2020-01-01");
        let bad = json!("not a date");
        let worse = json!("31/31/2031");
        assert_eq!(compare(Some(&valid), Some(&bad), ValueType::Date), Ordering::Less);
        assert_eq!(compare(Some(&bad), Some(&valid), ValueType::Date), Ordering::Greater);
        assert_eq!(compare(Some(&bad), Some(&worse), ValueType::Date), Ordering::Equal);
        // absence still wins over an invalid date
        assert_eq!(compare(None, Some(&bad), ValueType::Date), Ordering::Less);
    }

    #[test]
    fn test_strings_collate_naturally() {
        let apple = json!("apple");
        let banana = json!("Banana");
        let cherry = json!("cherry");
        assert_eq!(compare(Some(&apple), Some(&banana), ValueType::String), Ordering::Less);
        assert_eq!(compare(Some(&banana), Some(&cherry), ValueType::String), Ordering::Less);

        let eagle = json!("eagle");
        let emile = json!("Émile");
        let fox = json!("fox");
        assert_eq!(compare(Some(&eagle), Some(&emile), ValueType::String), Ordering::Less);
        assert_eq!(compare(Some(&emile), Some(&fox), ValueType::String), Ordering::Less);
    }

    #[test]
    fn test_comparison_is_antisymmetric() {
        let values = [json!("2"), json!(1.5), json!("x"), json!(null), json!("2024-02-29")];
        for value_type in [ValueType::String, ValueType::Number, ValueType::Date] {
            for a in &values {
                for b in &values {
                    assert_eq!(
                        compare(Some(a), Some(b), value_type),
                        compare(Some(b), Some(a), value_type).reverse()
                    );
                }
            }
        }
    }
}
