mod budget;
mod expense;
mod input;

pub use budget::{BudgetState, DEFAULT_REMAINDER_LABEL, DEFAULT_RESERVE_LABEL};
pub use expense::Expense;
pub use input::{
    parse_decimal, parse_non_negative, salary_from_input, validate_description, validate_label,
    ValidationError,
};
