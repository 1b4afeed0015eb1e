use rust_decimal::Decimal;

use super::Expense;

pub const DEFAULT_RESERVE_LABEL: &str = "Reserve";
pub const DEFAULT_REMAINDER_LABEL: &str = "Remainder";

/// Everything the user owns. The tithe is derived from `salary` at render
/// time and never lives in `expenses`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetState {
    pub salary: Decimal,
    pub expenses: Vec<Expense>,
    /// `None` means the reserve follows the configured ratio of the salary.
    pub reserve_override: Option<Decimal>,
    pub reserve_label: String,
    pub remainder_label: String,
}

impl BudgetState {
    pub fn expenses_total(&self) -> Decimal {
        self.expenses
            .iter()
            .fold(Decimal::ZERO, |acc, e| acc.saturating_add(e.amount))
    }
}

impl Default for BudgetState {
    fn default() -> Self {
        Self {
            salary: Decimal::ZERO,
            expenses: Vec::new(),
            reserve_override: None,
            reserve_label: DEFAULT_RESERVE_LABEL.to_string(),
            remainder_label: DEFAULT_REMAINDER_LABEL.to_string(),
        }
    }
}
