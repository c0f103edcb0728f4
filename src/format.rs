use chrono::DateTime;
use serde_json::Value;

use crate::column::Format;
use crate::compare::{to_number, to_text, to_timestamp};

/// Render a resolved value. Absent values render as an empty cell.
pub fn format_value(value: Option<&Value>, format: Format, currency: Option<&str>) -> String {
    let Some(value) = value else {
        return String::new();
    };
    match format {
        Format::Text => to_text(value),
        Format::Cash => {
            let amount = to_number(value);
            match currency {
                Some(currency) => format_currency(amount, currency),
                None => format!("{amount:.2}"),
            }
        }
        Format::Date => format_date(value),
        Format::Compact => format_compact(to_number(value)),
    }
}

fn format_date(value: &Value) -> String {
    to_timestamp(value)
        .and_then(DateTime::from_timestamp_millis)
        .map(|dt| dt.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// `1234567.0` becomes `"1.2M"`; values under a thousand are printed as is.
pub fn format_compact(value: f64) -> String {
    const SUFFIXES: [(f64, &str); 3] = [(1e3, "K"), (1e6, "M"), (1e9, "B")];

    if value == 0.0 {
        return "0".to_string();
    }
    let sign = if value < 0.0 { "-" } else { "" };
    let abs = value.abs();
    let Some(mut i) = SUFFIXES.iter().rposition(|&(threshold, _)| abs >= threshold) else {
        return format!("{value}");
    };

    let mut scaled = round_tenths(abs / SUFFIXES[i].0);
    // 999_950 rounds to 1000K, which reads as 1M
    if scaled >= 1000.0 && i + 1 < SUFFIXES.len() {
        i += 1;
        scaled = round_tenths(abs / SUFFIXES[i].0);
    }
    format!("{sign}{scaled}{}", SUFFIXES[i].1)
}

fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn format_currency(value: f64, currency: &str) -> String {
    let number = match currency {
        "JPY" => group_thousands(&format!("{:.0}", value)),
        _ => group_thousands(&format!("{value:.2}")),
    };

    match currency {
        "USD" | "CAD" | "AUD" | "HKD" | "SGD" => format!("${number}"),
        "EUR" => format!("{number} €"),
        "GBP" => format!("£{number}"),
        "JPY" => format!("¥{number}"),
        _ => format!("{number} {currency}"),
    }
}

// "-1234567.50" -> "-1,234,567.50"
fn group_thousands(formatted: &str) -> String {
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match fraction {
        Some(fraction) => format!("{sign}{grouped}.{fraction}"),
        None => format!("{sign}{grouped}"),
    }
}
