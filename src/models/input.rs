use rust_decimal::Decimal;
use std::str::FromStr;

use crate::config::NumberLocale;

/// Field-level validation failure. The message is shown beside the field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required.")]
    Required(&'static str),
    #[error("{0} must be a number.")]
    NotANumber(&'static str),
    #[error("{0} cannot be less than 0.")]
    Negative(&'static str),
}

/// Parse a user-typed decimal written with `locale`'s separators, e.g.
/// `1,234.56` (en) or `1.234,56` (pt-BR). Grouping is optional.
pub fn parse_decimal(input: &str, locale: NumberLocale) -> Option<Decimal> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    let normalized: String = trimmed
        .chars()
        .filter(|c| *c != locale.thousands_separator())
        .map(|c| if c == locale.decimal_separator() { '.' } else { c })
        .collect();
    Decimal::from_str(&normalized).ok()
}

/// Validate a required, non-negative amount typed into `field`.
pub fn parse_non_negative(
    input: &str,
    field: &'static str,
    locale: NumberLocale,
) -> Result<Decimal, ValidationError> {
    if input.trim().is_empty() {
        return Err(ValidationError::Required(field));
    }
    let val = parse_decimal(input, locale).ok_or(ValidationError::NotANumber(field))?;
    if val < Decimal::ZERO {
        return Err(ValidationError::Negative(field));
    }
    Ok(val)
}

pub fn validate_description(input: &str) -> Result<String, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required("Description"));
    }
    Ok(trimmed.to_string())
}

pub fn validate_label(input: &str) -> Result<String, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required("Label"));
    }
    Ok(trimmed.to_string())
}

/// The salary used for derivation: whatever the live field holds, or zero
/// when it is blank, unparseable or negative.
pub fn salary_from_input(input: &str, locale: NumberLocale) -> Decimal {
    parse_decimal(input, locale)
        .filter(|v| *v >= Decimal::ZERO)
        .unwrap_or(Decimal::ZERO)
}
