use rust_decimal::Decimal;
use tracing::warn;

use crate::models::parse_decimal;

pub(crate) const RESERVE_RATIO_VAR: &str = "BUDGETCALC_RESERVE_RATIO";
pub(crate) const LOCALE_VAR: &str = "BUDGETCALC_LOCALE";

/// Separators used when printing amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum NumberLocale {
    /// `1,234.56`
    #[default]
    En,
    /// `1.234,56`
    PtBr,
}

impl NumberLocale {
    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "en" | "en-us" | "en-gb" | "c" | "posix" => Some(Self::En),
            "pt" | "pt-br" | "pt-pt" => Some(Self::PtBr),
            _ => None,
        }
    }

    pub(crate) fn thousands_separator(self) -> char {
        match self {
            Self::En => ',',
            Self::PtBr => '.',
        }
    }

    pub(crate) fn decimal_separator(self) -> char {
        match self {
            Self::En => '.',
            Self::PtBr => ',',
        }
    }
}

impl std::fmt::Display for NumberLocale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::En => write!(f, "en"),
            Self::PtBr => write!(f, "pt-BR"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Config {
    /// Share of the salary set aside as the tithe row.
    pub(crate) tithe_ratio: Decimal,
    /// Share of the salary used as the reserve when no override is set.
    pub(crate) reserve_ratio: Decimal,
    pub(crate) locale: NumberLocale,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tithe_ratio: Decimal::new(10, 2),
            reserve_ratio: Decimal::new(50, 2),
            locale: NumberLocale::En,
        }
    }
}

impl Config {
    pub(crate) fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from a variable lookup. Bad values are logged and
    /// replaced by the defaults.
    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup(LOCALE_VAR) {
            match NumberLocale::parse(&raw) {
                Some(locale) => config.locale = locale,
                None => warn!(value = %raw, "Unknown {LOCALE_VAR}, using {}", config.locale),
            }
        }

        if let Some(raw) = lookup(RESERVE_RATIO_VAR) {
            let ratio = parse_decimal(&raw, config.locale)
                .filter(|r| *r >= Decimal::ZERO && *r <= Decimal::ONE);
            match ratio {
                Some(ratio) => config.reserve_ratio = ratio,
                None => warn!(
                    value = %raw,
                    "{RESERVE_RATIO_VAR} must be a decimal between 0 and 1, using {}",
                    config.reserve_ratio
                ),
            }
        }

        config
    }
}
