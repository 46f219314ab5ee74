//! Locale-aware number formatting for the metrics panel.
//!
//! Covers the few locales the panel uses. Integer digits are grouped by
//! thousands with the locale separator, and at most `max_fraction_digits`
//! decimals are kept with trailing zeros trimmed.

use serde::{Deserialize, Serialize};

/// Supported display locales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Locale {
    /// `15,234.5`
    #[default]
    #[serde(rename = "en-US")]
    EnUs,
    /// `15 234,5` with a no-break space (U+00A0)
    #[serde(rename = "ru-RU")]
    RuRu,
    /// `15.234,5`
    #[serde(rename = "de-DE")]
    DeDe,
}

impl Locale {
    /// BCP 47 tag.
    pub fn tag(&self) -> &'static str {
        match self {
            Locale::EnUs => "en-US",
            Locale::RuRu => "ru-RU",
            Locale::DeDe => "de-DE",
        }
    }

    pub fn all() -> &'static [Locale] {
        &[Locale::EnUs, Locale::RuRu, Locale::DeDe]
    }

    fn group_separator(&self) -> char {
        match self {
            Locale::EnUs => ',',
            Locale::RuRu => '\u{a0}',
            Locale::DeDe => '.',
        }
    }

    fn decimal_separator(&self) -> char {
        match self {
            Locale::EnUs => '.',
            Locale::RuRu | Locale::DeDe => ',',
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Largest fraction digit count honoured.
const MAX_FRACTION_DIGITS: u32 = 15;

/// Scaled magnitudes below 2^53 are integers that `f64` holds exactly.
const EXACT_INTEGER_LIMIT: f64 = 9_007_199_254_740_992.0;

/// Format `value` with thousands grouping and at most `max_fraction_digits`
/// decimals. Rounds half away from zero.
///
/// Digits come from the shortest decimal form of the value, so large
/// magnitudes are printed in full rather than saturated.
pub fn format_number(value: f64, max_fraction_digits: u32, locale: Locale) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value < 0.0 { "-∞" } else { "∞" }.to_string();
    }

    let digits = max_fraction_digits.min(MAX_FRACTION_DIGITS);
    let scale = 10f64.powi(digits as i32);
    let scaled = value.abs() * scale;
    // Past the exact range the value has no digits beyond the limit to round.
    let magnitude = if scaled < EXACT_INTEGER_LIMIT {
        scaled.round() / scale
    } else {
        value.abs()
    };

    // `Display` for f64 never uses exponent notation.
    let repr = magnitude.to_string();
    let (integer, fraction) = repr.split_once('.').unwrap_or((repr.as_str(), ""));
    let fraction = fraction[..fraction.len().min(digits as usize)].trim_end_matches('0');
    let is_zero = fraction.is_empty() && integer.bytes().all(|b| b == b'0');

    let mut out = String::new();
    if value < 0.0 && !is_zero {
        out.push('-');
    }
    out.push_str(&group_digits(integer, locale.group_separator()));
    if !fraction.is_empty() {
        out.push(locale.decimal_separator());
        out.push_str(fraction);
    }
    out
}

fn group_digits(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3 * separator.len_utf8());
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}
