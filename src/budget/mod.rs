//! Pure derivation of everything shown on screen from a [`BudgetState`].
//!
//! The tithe is computed here and prepended to the expense rows; it never
//! exists in the state itself, so it cannot be duplicated, edited or lost.

use rust_decimal::Decimal;

use crate::config::Config;
use crate::models::BudgetState;
use crate::ui::util::{format_amount, format_percent};

pub(crate) const TITHE_LABEL: &str = "Tithe";
pub(crate) const SALARY_LABEL: &str = "Total Salary";
pub(crate) const TOTAL_EXPENSES_LABEL: &str = "Total Expenses";

/// Row position of the tithe in the rendered expense list.
pub(crate) const TITHE_POSITION: usize = 0;

/// Map a rendered expense row to an index into `BudgetState::expenses`.
/// The tithe row has no backing entry.
pub(crate) fn expense_index(row: usize) -> Option<usize> {
    row.checked_sub(TITHE_POSITION + 1)
}

/// Inverse of [`expense_index`].
pub(crate) fn expense_row(index: usize) -> usize {
    index + TITHE_POSITION + 1
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Totals {
    pub(crate) salary: Decimal,
    pub(crate) tithe: Decimal,
    /// Tithe plus every user expense.
    pub(crate) total: Decimal,
    pub(crate) reserve: Decimal,
    pub(crate) remainder: Decimal,
}

impl Totals {
    pub(crate) fn compute(state: &BudgetState, config: &Config) -> Self {
        let salary = state.salary;
        let tithe = salary.saturating_mul(config.tithe_ratio);
        let total = tithe.saturating_add(state.expenses_total());
        let reserve = state
            .reserve_override
            .unwrap_or_else(|| salary.saturating_mul(config.reserve_ratio));
        let remainder = salary.saturating_sub(total).saturating_sub(reserve);

        Self {
            salary,
            tithe,
            total,
            reserve,
            remainder,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ExpenseRow {
    /// 1-based, as displayed.
    pub(crate) position: usize,
    pub(crate) description: String,
    pub(crate) amount: Decimal,
    pub(crate) amount_text: String,
    pub(crate) percent_text: String,
    /// Edit/delete controls exist only for user-owned rows.
    pub(crate) has_controls: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SummaryKind {
    Salary,
    TotalExpenses,
    Reserve,
    Remainder,
}

impl SummaryKind {
    pub(crate) fn all() -> &'static [SummaryKind] {
        &[
            Self::Salary,
            Self::TotalExpenses,
            Self::Reserve,
            Self::Remainder,
        ]
    }

    pub(crate) fn label_editable(self) -> bool {
        matches!(self, Self::Reserve | Self::Remainder)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Sign {
    NonNegative,
    Negative,
}

impl Sign {
    pub(crate) fn of(val: Decimal) -> Self {
        if val < Decimal::ZERO {
            Self::Negative
        } else {
            Self::NonNegative
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SummaryRow {
    pub(crate) kind: SummaryKind,
    pub(crate) label: String,
    pub(crate) value: Decimal,
    pub(crate) amount_text: String,
    pub(crate) percent_text: String,
    /// Only the remainder row is classed by sign.
    pub(crate) sign: Option<Sign>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BudgetView {
    pub(crate) totals: Totals,
    pub(crate) expenses: Vec<ExpenseRow>,
    pub(crate) summary: Vec<SummaryRow>,
}

impl BudgetView {
    pub(crate) fn summary_row(&self, kind: SummaryKind) -> Option<&SummaryRow> {
        self.summary.iter().find(|r| r.kind == kind)
    }
}

pub(crate) fn derive(state: &BudgetState, config: &Config) -> BudgetView {
    let totals = Totals::compute(state, config);
    let locale = config.locale;
    let salary = totals.salary;

    let tithe_row = ExpenseRow {
        position: TITHE_POSITION + 1,
        description: TITHE_LABEL.to_string(),
        amount: totals.tithe,
        amount_text: format_amount(totals.tithe, locale),
        percent_text: format_percent(totals.tithe, salary),
        has_controls: false,
    };

    let user_rows = state.expenses.iter().enumerate().map(|(i, e)| ExpenseRow {
        position: expense_row(i) + 1,
        description: e.description.clone(),
        amount: e.amount,
        amount_text: format_amount(e.amount, locale),
        percent_text: format_percent(e.amount, salary),
        has_controls: true,
    });

    let expenses = std::iter::once(tithe_row).chain(user_rows).collect();

    let summary = SummaryKind::all()
        .iter()
        .map(|&kind| {
            let (label, value) = match kind {
                SummaryKind::Salary => (SALARY_LABEL.to_string(), totals.salary),
                SummaryKind::TotalExpenses => (TOTAL_EXPENSES_LABEL.to_string(), totals.total),
                SummaryKind::Reserve => (state.reserve_label.clone(), totals.reserve),
                SummaryKind::Remainder => (state.remainder_label.clone(), totals.remainder),
            };
            SummaryRow {
                kind,
                label,
                value,
                amount_text: format_amount(value, locale),
                percent_text: format_percent(value, salary),
                sign: (kind == SummaryKind::Remainder).then(|| Sign::of(value)),
            }
        })
        .collect();

    BudgetView {
        totals,
        expenses,
        summary,
    }
}
