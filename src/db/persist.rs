//! Mirrors [`BudgetState`] into a [`KeyValueStore`] and back.
//!
//! Every key is optional on read: a missing or malformed value falls back to
//! the default for that field and is only reported in the log.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::{debug, warn};

use super::KeyValueStore;
use crate::models::{BudgetState, Expense, DEFAULT_REMAINDER_LABEL, DEFAULT_RESERVE_LABEL};

pub(crate) const SALARY_KEY: &str = "salary";
pub(crate) const EXPENSES_KEY: &str = "expenses";
pub(crate) const RESERVE_OVERRIDE_KEY: &str = "reserve_override";
pub(crate) const RESERVE_LABEL_KEY: &str = "reserve_label";
pub(crate) const REMAINDER_LABEL_KEY: &str = "remainder_label";

pub(crate) fn load_state(store: &impl KeyValueStore) -> Result<BudgetState> {
    let defaults = BudgetState::default();

    let salary = store
        .get_value(SALARY_KEY)?
        .and_then(|raw| parse_stored_amount(SALARY_KEY, &raw))
        .unwrap_or(defaults.salary);

    let expenses = store
        .get_value(EXPENSES_KEY)?
        .map(|raw| parse_expenses(&raw))
        .unwrap_or_default();

    let reserve_override = store
        .get_value(RESERVE_OVERRIDE_KEY)?
        .and_then(|raw| parse_stored_amount(RESERVE_OVERRIDE_KEY, &raw));

    let reserve_label = load_label(store, RESERVE_LABEL_KEY, DEFAULT_RESERVE_LABEL)?;
    let remainder_label = load_label(store, REMAINDER_LABEL_KEY, DEFAULT_REMAINDER_LABEL)?;

    debug!(
        %salary,
        expenses = expenses.len(),
        has_reserve_override = reserve_override.is_some(),
        "Loaded budget state"
    );

    Ok(BudgetState {
        salary,
        expenses,
        reserve_override,
        reserve_label,
        remainder_label,
    })
}

pub(crate) fn save_state(store: &impl KeyValueStore, state: &BudgetState) -> Result<()> {
    let expenses =
        serde_json::to_string(&state.expenses).context("Failed to serialize expenses")?;

    store.write_batch(&[
        (SALARY_KEY, Some(state.salary.to_string())),
        (EXPENSES_KEY, Some(expenses)),
        (
            RESERVE_OVERRIDE_KEY,
            state.reserve_override.map(|r| r.to_string()),
        ),
        (RESERVE_LABEL_KEY, Some(state.reserve_label.clone())),
        (REMAINDER_LABEL_KEY, Some(state.remainder_label.clone())),
    ])
}

fn parse_stored_amount(key: &str, raw: &str) -> Option<Decimal> {
    match Decimal::from_str(raw.trim()) {
        Ok(val) if val >= Decimal::ZERO => Some(val),
        _ => {
            warn!(key, value = raw, "Ignoring malformed stored amount");
            None
        }
    }
}

fn parse_expenses(raw: &str) -> Vec<Expense> {
    let entries: Vec<serde_json::Value> = match serde_json::from_str(raw) {
        Ok(list) => list,
        Err(e) => {
            warn!(error = %e, "Ignoring malformed stored expense list");
            return Vec::new();
        }
    };

    let total = entries.len();
    let valid: Vec<Expense> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(i, entry)| match serde_json::from_value::<Expense>(entry) {
            Ok(expense) if expense.is_valid() => Some(expense),
            Ok(_) => {
                warn!(entry = i, "Dropping blank or negative stored expense");
                None
            }
            Err(e) => {
                warn!(entry = i, error = %e, "Dropping unreadable stored expense");
                None
            }
        })
        .collect();
    if valid.len() < total {
        warn!(
            dropped = total - valid.len(),
            kept = valid.len(),
            "Dropped invalid stored expense entries"
        );
    }
    valid
}

fn load_label(store: &impl KeyValueStore, key: &str, default: &str) -> Result<String> {
    Ok(store
        .get_value(key)?
        .map(|raw| raw.trim().to_string())
        .filter(|label| !label.is_empty())
        .unwrap_or_else(|| default.to_string()))
}
