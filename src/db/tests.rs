#![allow(clippy::unwrap_used)]

use super::persist::*;
use super::*;
use crate::models::{BudgetState, Expense};
use rust_decimal_macros::dec;

// ── Schema ────────────────────────────────────────────────────

#[test]
fn test_fresh_database_is_versioned() {
    let db = Database::open_in_memory().unwrap();
    assert_eq!(db.schema_version().unwrap(), schema::CURRENT_VERSION);
}

#[test]
fn test_reopen_keeps_values_and_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("budget.db");
    {
        let db = Database::open(&path).unwrap();
        db.put_value("salary", "1000.00").unwrap();
    }
    let db = Database::open(&path).unwrap();
    assert_eq!(db.schema_version().unwrap(), schema::CURRENT_VERSION);
    assert_eq!(db.get_value("salary").unwrap().as_deref(), Some("1000.00"));
}

// ── Key-value CRUD ────────────────────────────────────────────

#[test]
fn test_put_and_get_value() {
    let db = Database::open_in_memory().unwrap();
    db.put_value("reserve_label", "Savings").unwrap();
    assert_eq!(
        db.get_value("reserve_label").unwrap(),
        Some("Savings".to_string())
    );
}

#[test]
fn test_get_missing_value() {
    let db = Database::open_in_memory().unwrap();
    assert!(db.get_value("nope").unwrap().is_none());
}

#[test]
fn test_put_replaces_value() {
    let db = Database::open_in_memory().unwrap();
    db.put_value("salary", "1").unwrap();
    db.put_value("salary", "2").unwrap();
    assert_eq!(db.get_value("salary").unwrap().as_deref(), Some("2"));
    assert_eq!(db.list_keys().unwrap(), vec!["salary".to_string()]);
}

#[test]
fn test_delete_value() {
    let db = Database::open_in_memory().unwrap();
    db.put_value("salary", "1").unwrap();
    assert!(db.delete_value("salary").unwrap());
    assert!(!db.delete_value("salary").unwrap());
    assert!(db.get_value("salary").unwrap().is_none());
}

#[test]
fn test_write_batch_puts_and_deletes() {
    let db = Database::open_in_memory().unwrap();
    db.put_value("b", "old").unwrap();
    db.write_batch(&[("a", Some("1".to_string())), ("b", None)])
        .unwrap();
    assert_eq!(db.list_keys().unwrap(), vec!["a".to_string()]);
}

// ── Persistence bridge ────────────────────────────────────────

fn sample_state() -> BudgetState {
    BudgetState {
        salary: dec!(2500.00),
        expenses: vec![
            Expense::new("Rent", dec!(900.00)),
            Expense::new("Internet", dec!(59.90)),
        ],
        reserve_override: Some(dec!(300)),
        reserve_label: "Savings".into(),
        remainder_label: "Free money".into(),
    }
}

#[test]
fn test_empty_store_loads_defaults() {
    let db = Database::open_in_memory().unwrap();
    assert_eq!(load_state(&db).unwrap(), BudgetState::default());
}

#[test]
fn test_save_then_load() {
    let db = Database::open_in_memory().unwrap();
    let state = sample_state();
    save_state(&db, &state).unwrap();
    assert_eq!(load_state(&db).unwrap(), state);
}

#[test]
fn test_clearing_override_removes_key() {
    let db = Database::open_in_memory().unwrap();
    let mut state = sample_state();
    save_state(&db, &state).unwrap();
    assert!(db.get_value(RESERVE_OVERRIDE_KEY).unwrap().is_some());

    state.reserve_override = None;
    save_state(&db, &state).unwrap();
    assert!(db.get_value(RESERVE_OVERRIDE_KEY).unwrap().is_none());
    assert!(load_state(&db).unwrap().reserve_override.is_none());
}

#[test]
fn test_tithe_is_never_persisted() {
    let db = Database::open_in_memory().unwrap();
    save_state(&db, &sample_state()).unwrap();
    let raw = db.get_value(EXPENSES_KEY).unwrap().unwrap();
    assert!(!raw.contains("Tithe"));
}

#[test]
fn test_malformed_values_fall_back_to_defaults() {
    let db = Database::open_in_memory().unwrap();
    db.put_value(SALARY_KEY, "lots").unwrap();
    db.put_value(EXPENSES_KEY, "{not json").unwrap();
    db.put_value(RESERVE_OVERRIDE_KEY, "-5").unwrap();
    db.put_value(RESERVE_LABEL_KEY, "   ").unwrap();

    let state = load_state(&db).unwrap();
    assert_eq!(state, BudgetState::default());
}

#[test]
fn test_invalid_expense_entries_are_dropped() {
    let db = Database::open_in_memory().unwrap();
    db.put_value(
        EXPENSES_KEY,
        r#"[{"description":"Rent","amount":"900"},{"description":"","amount":"1"},{"description":"Refund","amount":-3}]"#,
    )
    .unwrap();
    let state = load_state(&db).unwrap();
    assert_eq!(state.expenses, vec![Expense::new("Rent", dec!(900))]);
}

#[test]
fn test_unreadable_expense_entry_keeps_the_rest() {
    let db = Database::open_in_memory().unwrap();
    db.put_value(
        EXPENSES_KEY,
        r#"[{"description":"Rent","amount":"300"},{"description":"Gas","amount":"abc"},{"amount":"5"},"junk",{"description":"Food","amount":"120.50"}]"#,
    )
    .unwrap();
    let state = load_state(&db).unwrap();
    assert_eq!(
        state.expenses,
        vec![
            Expense::new("Rent", dec!(300)),
            Expense::new("Food", dec!(120.50)),
        ]
    );
}

#[test]
fn test_numeric_json_amounts_are_accepted() {
    let db = Database::open_in_memory().unwrap();
    db.put_value(EXPENSES_KEY, r#"[{"description":"Gas","amount":42.5}]"#)
        .unwrap();
    let state = load_state(&db).unwrap();
    assert_eq!(state.expenses[0].amount, dec!(42.5));
}
