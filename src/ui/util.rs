use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::NumberLocale;

/// Shown in place of a percentage when the salary is not positive.
pub(crate) const PERCENT_PLACEHOLDER: &str = "-";

/// Round to cents, half away from zero.
pub(crate) fn round_cents(val: Decimal) -> Decimal {
    val.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Format a decimal amount with thousand separators and 2 decimal places.
/// e.g. `1234567.89` → `"1,234,567.89"` (en) or `"1.234.567,89"` (pt-BR)
pub(crate) fn format_amount(val: Decimal, locale: NumberLocale) -> String {
    let rounded = round_cents(val);
    let abs = rounded.abs();
    let formatted = format!("{abs:.2}");
    let mut parts = formatted.split('.');
    let int_part = parts.next().unwrap_or("0");
    let dec_part = parts.next().unwrap_or("00");

    let grouped: String = int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(&locale.thousands_separator().to_string());

    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    format!("{sign}{grouped}{}{dec_part}", locale.decimal_separator())
}

/// Text to seed an input with: two decimals, the locale's decimal
/// separator, no grouping. Reads back through `parse_decimal`.
pub(crate) fn editable_amount(val: Decimal, locale: NumberLocale) -> String {
    localize_point(format!("{:.2}", round_cents(val)), locale)
}

/// Like [`editable_amount`] without padding, e.g. `250,5` in pt-BR.
pub(crate) fn editable_number(val: Decimal, locale: NumberLocale) -> String {
    localize_point(val.normalize().to_string(), locale)
}

fn localize_point(text: String, locale: NumberLocale) -> String {
    match locale.decimal_separator() {
        '.' => text,
        sep => text.replace('.', &sep.to_string()),
    }
}

/// Share of `salary` that `value` represents: `"10%"` when whole, `"33.33%"`
/// otherwise, and the placeholder when there is no positive salary.
pub(crate) fn format_percent(value: Decimal, salary: Decimal) -> String {
    if salary <= Decimal::ZERO {
        return PERCENT_PLACEHOLDER.to_string();
    }
    let Some(pct) = value
        .checked_div(salary)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
    else {
        return PERCENT_PLACEHOLDER.to_string();
    };

    if pct.fract().is_zero() {
        format!("{}%", pct.trunc().normalize())
    } else {
        format!("{:.2}%", round_cents(pct))
    }
}

/// Truncate a string to `max` visible characters, appending "…" if truncated.
/// The result is guaranteed to be at most `max` characters (counting "…" as one).
/// Safe for multi-byte UTF-8 characters.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let char_count = s.chars().count();
    if char_count <= max {
        return s.to_string();
    }
    let truncated: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{truncated}…")
}

/// Keep `index` inside a list of `len` rows.
pub(crate) fn clamp_index(index: usize, len: usize) -> usize {
    index.min(len.saturating_sub(1))
}

/// First row to draw so that `index` stays visible in a window of `page` rows.
pub(crate) fn scroll_offset(index: usize, page: usize) -> usize {
    index.saturating_sub(page.saturating_sub(1))
}
