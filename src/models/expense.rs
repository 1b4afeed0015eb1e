use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub description: String,
    pub amount: Decimal,
}

impl Expense {
    pub fn new(description: impl Into<String>, amount: Decimal) -> Self {
        Self {
            description: description.into(),
            amount,
        }
    }

    /// Persisted entries that fail this are dropped on load.
    pub fn is_valid(&self) -> bool {
        !self.description.trim().is_empty() && self.amount >= Decimal::ZERO
    }
}
