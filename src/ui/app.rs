use anyhow::Result;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::budget::{self, BudgetView, SummaryKind};
use crate::config::Config;
use crate::db::{persist, Database};
use crate::models::*;
use crate::ui::util::{clamp_index, editable_amount, editable_number};

pub(crate) const ADD_LABEL: &str = "Add Expense";
pub(crate) const UPDATE_LABEL: &str = "Update Expense";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Focus {
    Salary,
    Description,
    Amount,
    Expenses,
    Summary,
}

impl Focus {
    pub(crate) fn all() -> &'static [Focus] {
        &[
            Self::Salary,
            Self::Description,
            Self::Amount,
            Self::Expenses,
            Self::Summary,
        ]
    }

    pub(crate) fn is_input(self) -> bool {
        matches!(self, Self::Salary | Self::Description | Self::Amount)
    }
}

impl std::fmt::Display for Focus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Salary => write!(f, "Salary"),
            Self::Description => write!(f, "Description"),
            Self::Amount => write!(f, "Amount"),
            Self::Expenses => write!(f, "Expenses"),
            Self::Summary => write!(f, "Summary"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
        }
    }
}

/// Inline editor state of the reserve amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ReserveMode {
    Display,
    Editing { input: String },
}

/// Summary rows whose label the user may rename.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LabelTarget {
    Reserve,
    Remainder,
}

impl LabelTarget {
    pub(crate) fn from_kind(kind: SummaryKind) -> Option<Self> {
        match kind {
            SummaryKind::Reserve => Some(Self::Reserve),
            SummaryKind::Remainder => Some(Self::Remainder),
            _ => None,
        }
    }

    pub(crate) fn kind(self) -> SummaryKind {
        match self {
            Self::Reserve => SummaryKind::Reserve,
            Self::Remainder => SummaryKind::Remainder,
        }
    }

    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "reserve" => Some(Self::Reserve),
            "remainder" => Some(Self::Remainder),
            _ => None,
        }
    }
}

/// Inline editor state of a summary row label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LabelMode {
    Display,
    Editing { target: LabelTarget, input: String },
}

/// Rejected edit/delete target.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum ActionError {
    #[error("The tithe row is calculated and cannot be changed")]
    TitheRow,
    #[error("There is no expense at position {0}")]
    NoSuchRow(usize),
}

/// Inline messages shown beside their field until the next validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct FieldErrors {
    pub(crate) salary: Option<ValidationError>,
    pub(crate) description: Option<ValidationError>,
    pub(crate) amount: Option<ValidationError>,
    pub(crate) reserve: Option<ValidationError>,
    pub(crate) label: Option<ValidationError>,
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,

    pub(crate) config: Config,
    pub(crate) state: BudgetState,
    /// Derived from `state` by the last `refresh`.
    pub(crate) view: BudgetView,

    // Form
    pub(crate) focus: Focus,
    pub(crate) salary_input: String,
    pub(crate) description_input: String,
    pub(crate) amount_input: String,
    /// Rendered row currently open for editing.
    pub(crate) edit_cursor: Option<usize>,
    pub(crate) errors: FieldErrors,

    // Tables
    pub(crate) expense_index: usize,
    pub(crate) summary_index: usize,
    pub(crate) reserve_mode: ReserveMode,
    pub(crate) label_mode: LabelMode,
}

impl App {
    pub(crate) fn new(config: Config, state: BudgetState) -> Self {
        let view = budget::derive(&state, &config);
        Self {
            running: true,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            status_message: String::new(),
            show_help: false,

            salary_input: editable_amount(state.salary, config.locale),
            config,
            state,
            view,

            focus: Focus::Salary,
            description_input: String::new(),
            amount_input: String::new(),
            edit_cursor: None,
            errors: FieldErrors::default(),

            expense_index: 0,
            summary_index: 0,
            reserve_mode: ReserveMode::Display,
            label_mode: LabelMode::Display,
        }
    }

    /// Hydrate from the store and draw the first frame's view.
    pub(crate) fn load(db: &Database, config: Config) -> Result<Self> {
        let state = persist::load_state(db)?;
        let mut app = Self::new(config, state);
        app.refresh(db)?;
        Ok(app)
    }

    /// Read the live salary field, persist, and re-derive the view.
    ///
    /// Every mutation ends here. Inline summary editors close because the
    /// view they were opened on is replaced.
    pub(crate) fn refresh(&mut self, db: &Database) -> Result<()> {
        self.state.salary = salary_from_input(&self.salary_input, self.config.locale);
        persist::save_state(db, &self.state)?;
        self.view = budget::derive(&self.state, &self.config);
        self.reserve_mode = ReserveMode::Display;
        self.label_mode = LabelMode::Display;
        self.expense_index = clamp_index(self.expense_index, self.view.expenses.len());
        self.summary_index = clamp_index(self.summary_index, self.view.summary.len());
        debug!(
            salary = %self.view.totals.salary,
            total = %self.view.totals.total,
            remainder = %self.view.totals.remainder,
            "Refreshed budget view"
        );
        Ok(())
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    pub(crate) fn submit_label(&self) -> &'static str {
        if self.edit_cursor.is_some() {
            UPDATE_LABEL
        } else {
            ADD_LABEL
        }
    }

    // ── Focus ────────────────────────────────────────────────

    pub(crate) fn focus_next(&mut self) {
        let all = Focus::all();
        let idx = all.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.move_focus(all[(idx + 1) % all.len()]);
    }

    pub(crate) fn focus_prev(&mut self) {
        let all = Focus::all();
        let idx = all.iter().position(|f| *f == self.focus).unwrap_or(0);
        let prev = if idx == 0 { all.len() - 1 } else { idx - 1 };
        self.move_focus(all[prev]);
    }

    pub(crate) fn move_focus(&mut self, focus: Focus) {
        if self.focus == Focus::Salary && focus != Focus::Salary {
            self.salary_blur();
        }
        self.focus = focus;
    }

    // ── Salary ───────────────────────────────────────────────

    pub(crate) fn salary_changed(&mut self, db: &Database) -> Result<()> {
        self.refresh(db)
    }

    /// Validation on leaving the salary field. Never blocks the live value.
    pub(crate) fn salary_blur(&mut self) {
        self.errors.salary =
            parse_non_negative(&self.salary_input, "Salary", self.config.locale).err();
    }

    pub(crate) fn set_salary(&mut self, db: &Database, input: &str) -> Result<()> {
        self.salary_input = input.trim().to_string();
        self.salary_blur();
        self.refresh(db)
    }

    // ── Expenses ─────────────────────────────────────────────

    /// Add a new expense, or commit the one open for editing.
    pub(crate) fn submit_expense(&mut self, db: &Database) -> Result<()> {
        let description = validate_description(&self.description_input);
        let amount = parse_non_negative(&self.amount_input, "Amount", self.config.locale);
        self.errors.description = description.as_ref().err().cloned();
        self.errors.amount = amount.as_ref().err().cloned();

        let (Ok(description), Ok(amount)) = (description, amount) else {
            return Ok(());
        };
        let expense = Expense::new(description, amount);

        let open = match self.edit_cursor {
            Some(row) => match self.target_index(row) {
                Ok(index) => Some(index),
                Err(e) => {
                    self.set_status(e.to_string());
                    return Ok(());
                }
            },
            None => None,
        };
        self.edit_cursor = None;
        let message = match open {
            Some(index) => {
                info!(description = %expense.description, amount = %expense.amount, "Updated expense");
                let message = format!("Updated: {}", expense.description);
                self.state.expenses[index] = expense;
                message
            }
            None => {
                info!(description = %expense.description, amount = %expense.amount, "Added expense");
                let message = format!("Added: {}", expense.description);
                self.state.expenses.push(expense);
                self.expense_index = budget::expense_row(self.state.expenses.len() - 1);
                message
            }
        };
        self.set_status(message);

        self.description_input.clear();
        self.amount_input.clear();
        self.refresh(db)
    }

    /// Resolve a rendered row to an index into the user's expenses.
    pub(crate) fn target_index(&self, row: usize) -> Result<usize, ActionError> {
        let index = budget::expense_index(row).ok_or(ActionError::TitheRow)?;
        if index < self.state.expenses.len() {
            Ok(index)
        } else {
            Err(ActionError::NoSuchRow(row + 1))
        }
    }

    pub(crate) fn begin_edit(&mut self, row: usize) -> Result<(), ActionError> {
        let index = self.target_index(row)?;
        let expense = self.state.expenses[index].clone();
        self.amount_input = editable_number(expense.amount, self.config.locale);
        self.set_status(format!("Editing: {}", expense.description));
        self.description_input = expense.description;
        self.edit_cursor = Some(row);
        self.errors.description = None;
        self.errors.amount = None;
        self.focus = Focus::Description;
        Ok(())
    }

    pub(crate) fn cancel_edit(&mut self) {
        if self.edit_cursor.take().is_some() {
            self.description_input.clear();
            self.amount_input.clear();
            self.errors.description = None;
            self.errors.amount = None;
            self.set_status("Edit cancelled");
        }
    }

    /// Remove the expense at `row`. No confirmation; the tithe row and
    /// out-of-range rows are refused with a status message.
    pub(crate) fn delete_expense(&mut self, db: &Database, row: usize) -> Result<()> {
        let index = match self.target_index(row) {
            Ok(i) => i,
            Err(e) => {
                self.set_status(e.to_string());
                return Ok(());
            }
        };

        let open = self.edit_cursor;
        match open {
            Some(open) if open == row => self.cancel_edit(),
            Some(open) if open > row => self.edit_cursor = Some(open - 1),
            _ => {}
        }

        let removed = self.state.expenses.remove(index);
        info!(description = %removed.description, "Deleted expense");
        self.set_status(format!("Deleted: {}", removed.description));
        self.refresh(db)
    }

    // ── Reserve ──────────────────────────────────────────────

    pub(crate) fn begin_reserve_edit(&mut self) {
        self.label_mode = LabelMode::Display;
        self.errors.reserve = None;
        self.reserve_mode = ReserveMode::Editing {
            input: editable_amount(self.view.totals.reserve, self.config.locale),
        };
    }

    /// Commit the reserve editor. Invalid input keeps the editor open.
    pub(crate) fn commit_reserve(&mut self, db: &Database) -> Result<()> {
        let ReserveMode::Editing { input } = &self.reserve_mode else {
            return Ok(());
        };
        match parse_non_negative(input, "Reserve", self.config.locale) {
            Ok(val) => {
                self.errors.reserve = None;
                self.apply_reserve_override(db, Some(val))
            }
            Err(e) => {
                self.errors.reserve = Some(e);
                Ok(())
            }
        }
    }

    pub(crate) fn cancel_reserve_edit(&mut self) {
        self.reserve_mode = ReserveMode::Display;
        self.errors.reserve = None;
    }

    pub(crate) fn apply_reserve_override(
        &mut self,
        db: &Database,
        value: Option<Decimal>,
    ) -> Result<()> {
        self.state.reserve_override = value;
        match value {
            Some(v) => {
                info!(reserve = %v, "Set reserve override");
                self.set_status("Reserve updated");
            }
            None => {
                info!("Cleared reserve override");
                self.set_status("Reserve follows the salary again");
            }
        }
        self.refresh(db)
    }

    pub(crate) fn reserve_input_mut(&mut self) -> Option<&mut String> {
        match &mut self.reserve_mode {
            ReserveMode::Editing { input } => Some(input),
            ReserveMode::Display => None,
        }
    }

    // ── Labels ───────────────────────────────────────────────

    pub(crate) fn begin_label_edit(&mut self, target: LabelTarget) {
        self.reserve_mode = ReserveMode::Display;
        self.errors.label = None;
        let current = match target {
            LabelTarget::Reserve => &self.state.reserve_label,
            LabelTarget::Remainder => &self.state.remainder_label,
        };
        self.label_mode = LabelMode::Editing {
            target,
            input: current.clone(),
        };
    }

    pub(crate) fn commit_label(&mut self, db: &Database) -> Result<()> {
        let LabelMode::Editing { target, input } = &self.label_mode else {
            return Ok(());
        };
        let target = *target;
        match validate_label(input) {
            Ok(label) => {
                self.errors.label = None;
                self.set_label(db, target, label)
            }
            Err(e) => {
                self.errors.label = Some(e);
                Ok(())
            }
        }
    }

    pub(crate) fn cancel_label_edit(&mut self) {
        self.label_mode = LabelMode::Display;
        self.errors.label = None;
    }

    pub(crate) fn set_label(&mut self, db: &Database, target: LabelTarget, label: String) -> Result<()> {
        info!(?target, %label, "Renamed summary row");
        self.set_status(format!("Renamed to: {label}"));
        match target {
            LabelTarget::Reserve => self.state.reserve_label = label,
            LabelTarget::Remainder => self.state.remainder_label = label,
        }
        self.refresh(db)
    }

    pub(crate) fn label_input_mut(&mut self) -> Option<&mut String> {
        match &mut self.label_mode {
            LabelMode::Editing { input, .. } => Some(input),
            LabelMode::Display => None,
        }
    }

    pub(crate) fn select_summary(&mut self, kind: SummaryKind) {
        if let Some(i) = self.view.summary.iter().position(|r| r.kind == kind) {
            self.summary_index = i;
        }
    }

    pub(crate) fn selected_summary_kind(&self) -> Option<SummaryKind> {
        self.view.summary.get(self.summary_index).map(|r| r.kind)
    }

    pub(crate) fn is_editing_summary(&self) -> bool {
        self.reserve_mode != ReserveMode::Display || self.label_mode != LabelMode::Display
    }
}
