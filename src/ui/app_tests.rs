#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::app::*;
use crate::budget::{Sign, SummaryKind, TITHE_LABEL, TITHE_POSITION};
use crate::config::{Config, NumberLocale};
use crate::db::{persist, Database};
use crate::models::{Expense, ValidationError};

fn setup() -> (App, Database) {
    let db = Database::open_in_memory().unwrap();
    let app = App::load(&db, Config::default()).unwrap();
    (app, db)
}

fn add(app: &mut App, db: &Database, description: &str, amount: &str) {
    app.description_input = description.to_string();
    app.amount_input = amount.to_string();
    app.submit_expense(db).unwrap();
}

// ── Startup ──────────────────────────────────────────────────

#[test]
fn test_fresh_app_shows_only_the_tithe() {
    let (app, _db) = setup();
    assert_eq!(app.salary_input, "0.00");
    assert_eq!(app.view.expenses.len(), 1);
    assert_eq!(app.view.expenses[0].description, TITHE_LABEL);
    assert!(!app.view.expenses[0].has_controls);
    assert_eq!(app.submit_label(), ADD_LABEL);
    assert_eq!(app.reserve_mode, ReserveMode::Display);
}

#[test]
fn test_reload_restores_state_and_seeds_salary() {
    let (mut app, db) = setup();
    app.set_salary(&db, "3000").unwrap();
    add(&mut app, &db, "Rent", "1200");
    app.apply_reserve_override(&db, Some(dec!(400))).unwrap();

    let reloaded = App::load(&db, Config::default()).unwrap();
    assert_eq!(reloaded.salary_input, "3000.00");
    assert_eq!(reloaded.state.expenses, vec![Expense::new("Rent", dec!(1200))]);
    assert_eq!(reloaded.state.reserve_override, Some(dec!(400)));
    assert_eq!(reloaded.view, app.view);
}

// ── Expenses ─────────────────────────────────────────────────

#[test]
fn test_add_expense_scenario() {
    let (mut app, db) = setup();
    app.set_salary(&db, "3000").unwrap();
    add(&mut app, &db, "Rent", "1200");

    assert_eq!(app.state.expenses.len(), 1);
    assert_eq!(app.view.expenses.len(), 2);
    assert_eq!(app.view.expenses[1].description, "Rent");
    assert!(app.view.expenses[1].has_controls);
    assert_eq!(app.view.totals.tithe, dec!(300));
    assert_eq!(app.view.totals.total, dec!(1500));
    assert_eq!(app.view.totals.reserve, dec!(1500));
    assert_eq!(app.view.totals.remainder, dec!(0));
    assert_eq!(app.expense_index, 1);
    assert!(app.description_input.is_empty());
    assert!(app.amount_input.is_empty());
    assert_eq!(app.status_message, "Added: Rent");
}

#[test]
fn test_invalid_expense_is_rejected_with_both_errors() {
    let (mut app, db) = setup();
    add(&mut app, &db, "   ", "abc");

    assert!(app.state.expenses.is_empty());
    assert_eq!(
        app.errors.description,
        Some(ValidationError::Required("Description"))
    );
    assert_eq!(app.errors.amount, Some(ValidationError::NotANumber("Amount")));
    assert_eq!(app.description_input, "   ");
    assert_eq!(app.amount_input, "abc");
}

#[test]
fn test_negative_amount_is_rejected() {
    let (mut app, db) = setup();
    add(&mut app, &db, "Gym", "-5");
    assert!(app.state.expenses.is_empty());
    assert_eq!(app.errors.description, None);
    assert_eq!(app.errors.amount, Some(ValidationError::Negative("Amount")));
}

#[test]
fn test_valid_submit_clears_previous_errors() {
    let (mut app, db) = setup();
    add(&mut app, &db, "", "");
    assert!(app.errors.description.is_some());
    add(&mut app, &db, "Food", "250.50");
    assert_eq!(app.errors.description, None);
    assert_eq!(app.errors.amount, None);
    assert_eq!(app.state.expenses[0].amount, dec!(250.50));
}

#[test]
fn test_edit_then_commit_replaces_in_place() {
    let (mut app, db) = setup();
    add(&mut app, &db, "Rent", "1200");
    add(&mut app, &db, "Food", "300");

    app.begin_edit(1).unwrap();
    assert_eq!(app.edit_cursor, Some(1));
    assert_eq!(app.description_input, "Rent");
    assert_eq!(app.amount_input, "1200");
    assert_eq!(app.focus, Focus::Description);
    assert_eq!(app.submit_label(), UPDATE_LABEL);

    app.description_input = "Mortgage".into();
    app.amount_input = "1100".into();
    app.submit_expense(&db).unwrap();

    assert_eq!(app.edit_cursor, None);
    assert_eq!(app.submit_label(), ADD_LABEL);
    assert_eq!(
        app.state.expenses,
        vec![
            Expense::new("Mortgage", dec!(1100)),
            Expense::new("Food", dec!(300)),
        ]
    );
}

#[test]
fn test_invalid_update_keeps_edit_open() {
    let (mut app, db) = setup();
    add(&mut app, &db, "Rent", "1200");
    app.begin_edit(1).unwrap();
    app.amount_input = "lots".into();
    app.submit_expense(&db).unwrap();

    assert_eq!(app.edit_cursor, Some(1));
    assert_eq!(app.state.expenses[0].amount, dec!(1200));
    assert!(app.errors.amount.is_some());
}

#[test]
fn test_cancel_edit_clears_form() {
    let (mut app, db) = setup();
    add(&mut app, &db, "Rent", "1200");
    app.begin_edit(1).unwrap();
    app.cancel_edit();

    assert_eq!(app.edit_cursor, None);
    assert!(app.description_input.is_empty());
    assert_eq!(app.state.expenses.len(), 1);
}

#[test]
fn test_tithe_row_cannot_be_edited_or_deleted() {
    let (mut app, db) = setup();
    app.set_salary(&db, "1000").unwrap();

    assert_eq!(app.begin_edit(TITHE_POSITION), Err(ActionError::TitheRow));
    assert_eq!(app.edit_cursor, None);

    app.delete_expense(&db, TITHE_POSITION).unwrap();
    assert_eq!(app.view.expenses.len(), 1);
    assert_eq!(app.view.totals.tithe, dec!(100));
}

#[test]
fn test_out_of_range_row_is_refused() {
    let (mut app, db) = setup();
    assert_eq!(app.begin_edit(3), Err(ActionError::NoSuchRow(4)));
    app.delete_expense(&db, 3).unwrap();
    assert_eq!(app.status_message, "There is no expense at position 4");
}

#[test]
fn test_delete_only_expense_leaves_tithe() {
    let (mut app, db) = setup();
    app.set_salary(&db, "3000").unwrap();
    add(&mut app, &db, "Rent", "1200");

    app.delete_expense(&db, 1).unwrap();
    assert!(app.state.expenses.is_empty());
    assert_eq!(app.view.expenses.len(), 1);
    assert_eq!(app.view.totals.total, dec!(300));
    assert_eq!(app.expense_index, 0);
    assert!(persist::load_state(&db).unwrap().expenses.is_empty());
}

#[test]
fn test_delete_shifts_or_closes_open_edit() {
    let (mut app, db) = setup();
    add(&mut app, &db, "Rent", "1200");
    add(&mut app, &db, "Food", "300");

    app.begin_edit(2).unwrap();
    app.delete_expense(&db, 1).unwrap();
    assert_eq!(app.edit_cursor, Some(1));
    assert_eq!(app.description_input, "Food");

    app.delete_expense(&db, 1).unwrap();
    assert_eq!(app.edit_cursor, None);
    assert!(app.description_input.is_empty());
}

#[test]
fn test_update_with_stale_cursor_is_refused() {
    let (mut app, db) = setup();
    add(&mut app, &db, "Rent", "1200");
    app.begin_edit(1).unwrap();
    app.edit_cursor = Some(4);
    app.description_input = "Mortgage".into();
    app.amount_input = "1100".into();
    app.submit_expense(&db).unwrap();

    assert_eq!(app.state.expenses, vec![Expense::new("Rent", dec!(1200))]);
    assert_eq!(app.status_message, "There is no expense at position 5");
    assert_eq!(app.edit_cursor, Some(4));
}

// ── Salary ───────────────────────────────────────────────────

#[test]
fn test_live_salary_recomputes_without_blur() {
    let (mut app, db) = setup();
    app.salary_input = "2000".into();
    app.salary_changed(&db).unwrap();
    assert_eq!(app.view.totals.tithe, dec!(200));
    assert_eq!(app.errors.salary, None);

    app.salary_input = "20x".into();
    app.salary_changed(&db).unwrap();
    assert_eq!(app.view.totals.salary, dec!(0));
    assert_eq!(app.errors.salary, None);
}

#[test]
fn test_salary_blur_validates() {
    let (mut app, db) = setup();
    app.salary_input.clear();
    app.salary_changed(&db).unwrap();
    app.focus_next();
    assert_eq!(app.focus, Focus::Description);
    assert_eq!(app.errors.salary, Some(ValidationError::Required("Salary")));

    app.set_salary(&db, "-10").unwrap();
    assert_eq!(app.errors.salary, Some(ValidationError::Negative("Salary")));
    assert_eq!(app.view.totals.salary, dec!(0));

    app.set_salary(&db, "10").unwrap();
    assert_eq!(app.errors.salary, None);
}

#[test]
fn test_grouped_salary_follows_locale() {
    let (mut app, db) = setup();
    app.set_salary(&db, "3,500").unwrap();
    assert_eq!(app.view.totals.salary, dec!(3500));
    assert_eq!(app.errors.salary, None);
    add(&mut app, &db, "Car", "1,250.75");
    assert_eq!(app.state.expenses[0].amount, dec!(1250.75));
}

#[test]
fn test_pt_br_inputs_round_trip() {
    let db = Database::open_in_memory().unwrap();
    let config = Config {
        locale: NumberLocale::PtBr,
        ..Config::default()
    };
    let mut app = App::load(&db, config.clone()).unwrap();
    app.set_salary(&db, "3.500").unwrap();
    assert_eq!(app.view.totals.salary, dec!(3500));

    add(&mut app, &db, "Aluguel", "1.200,50");
    app.begin_edit(1).unwrap();
    assert_eq!(app.amount_input, "1200,5");

    app.begin_reserve_edit();
    assert_eq!(
        app.reserve_mode,
        ReserveMode::Editing {
            input: "1750,00".into()
        }
    );
    app.commit_reserve(&db).unwrap();
    assert_eq!(app.state.reserve_override, Some(dec!(1750)));

    let reloaded = App::load(&db, config).unwrap();
    assert_eq!(reloaded.salary_input, "3500,00");
    assert_eq!(reloaded.view.totals.salary, dec!(3500));
}

#[test]
fn test_focus_ring_wraps() {
    let (mut app, _db) = setup();
    for _ in 0..Focus::all().len() {
        app.focus_next();
    }
    assert_eq!(app.focus, Focus::Salary);
    app.focus_prev();
    assert_eq!(app.focus, Focus::Summary);
}

#[test]
fn test_refresh_is_idempotent() {
    let (mut app, db) = setup();
    app.set_salary(&db, "4200").unwrap();
    add(&mut app, &db, "Car", "350.25");
    let before = app.view.clone();
    app.refresh(&db).unwrap();
    app.refresh(&db).unwrap();
    assert_eq!(app.view, before);
    assert_eq!(app.view.expenses.len(), 2);
}

// ── Reserve ──────────────────────────────────────────────────

#[test]
fn test_reserve_override_survives_salary_change() {
    let (mut app, db) = setup();
    app.set_salary(&db, "3000").unwrap();
    app.begin_reserve_edit();
    assert_eq!(
        app.reserve_mode,
        ReserveMode::Editing {
            input: "1500.00".into()
        }
    );

    *app.reserve_input_mut().unwrap() = "200".into();
    app.commit_reserve(&db).unwrap();
    assert_eq!(app.reserve_mode, ReserveMode::Display);
    assert_eq!(app.view.totals.reserve, dec!(200));

    app.set_salary(&db, "5000").unwrap();
    assert_eq!(app.view.totals.reserve, dec!(200));
    assert_eq!(app.view.totals.remainder, dec!(4300));
}

#[test]
fn test_invalid_reserve_keeps_editor_open() {
    let (mut app, db) = setup();
    app.set_salary(&db, "3000").unwrap();
    app.begin_reserve_edit();
    *app.reserve_input_mut().unwrap() = "-1".into();
    app.commit_reserve(&db).unwrap();

    assert!(matches!(app.reserve_mode, ReserveMode::Editing { .. }));
    assert_eq!(app.errors.reserve, Some(ValidationError::Negative("Reserve")));
    assert_eq!(app.state.reserve_override, None);

    app.cancel_reserve_edit();
    assert_eq!(app.reserve_mode, ReserveMode::Display);
    assert_eq!(app.errors.reserve, None);
}

#[test]
fn test_clearing_override_follows_salary() {
    let (mut app, db) = setup();
    app.set_salary(&db, "1000").unwrap();
    app.apply_reserve_override(&db, Some(dec!(10))).unwrap();
    app.apply_reserve_override(&db, None).unwrap();
    assert_eq!(app.view.totals.reserve, dec!(500));
}

#[test]
fn test_negative_remainder_is_flagged() {
    let (mut app, db) = setup();
    app.set_salary(&db, "1000").unwrap();
    add(&mut app, &db, "Rent", "900");
    let row = app.view.summary_row(SummaryKind::Remainder).unwrap();
    assert_eq!(row.value, dec!(-500));
    assert_eq!(row.sign, Some(Sign::Negative));
}

// ── Labels ───────────────────────────────────────────────────

#[test]
fn test_label_edit_renames_and_persists() {
    let (mut app, db) = setup();
    app.begin_label_edit(LabelTarget::Remainder);
    *app.label_input_mut().unwrap() = "  Leftover ".into();
    app.commit_label(&db).unwrap();

    assert_eq!(app.label_mode, LabelMode::Display);
    assert_eq!(app.state.remainder_label, "Leftover");
    assert_eq!(
        app.view.summary_row(SummaryKind::Remainder).unwrap().label,
        "Leftover"
    );
    assert_eq!(persist::load_state(&db).unwrap().remainder_label, "Leftover");
}

#[test]
fn test_blank_label_is_rejected() {
    let (mut app, db) = setup();
    app.begin_label_edit(LabelTarget::Reserve);
    *app.label_input_mut().unwrap() = " ".into();
    app.commit_label(&db).unwrap();

    assert!(matches!(app.label_mode, LabelMode::Editing { .. }));
    assert_eq!(app.errors.label, Some(ValidationError::Required("Label")));
    assert_eq!(app.state.reserve_label, "Reserve");
}

#[test]
fn test_label_and_reserve_editors_are_exclusive() {
    let (mut app, _db) = setup();
    app.begin_reserve_edit();
    app.begin_label_edit(LabelTarget::Reserve);
    assert_eq!(app.reserve_mode, ReserveMode::Display);
    app.begin_reserve_edit();
    assert_eq!(app.label_mode, LabelMode::Display);
    assert!(app.is_editing_summary());
}

#[test]
fn test_select_summary_row() {
    let (mut app, _db) = setup();
    app.select_summary(SummaryKind::Reserve);
    assert_eq!(app.selected_summary_kind(), Some(SummaryKind::Reserve));
    assert_eq!(
        LabelTarget::from_kind(SummaryKind::Salary),
        None
    );
    assert_eq!(LabelTarget::parse("Remainder"), Some(LabelTarget::Remainder));
}
