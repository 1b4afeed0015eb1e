use std::collections::HashMap;
use std::sync::LazyLock;

use super::app::{App, Focus, LabelTarget};
use super::util::format_amount;
use crate::budget::SummaryKind;
use crate::db::Database;
use crate::models::{parse_non_negative, validate_label};

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &mut Database) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit BudgeCalc", cmd_quit, r);
    register_command!("quit", "Quit BudgeCalc", cmd_quit, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!("salary", "Set salary (e.g. :salary 3500)", cmd_salary, r);
    register_command!("s", "Set salary (e.g. :s 3500)", cmd_salary, r);
    register_command!(
        "add",
        "Add expense (e.g. :add Rent 1200.00)",
        cmd_add,
        r
    );
    register_command!("a", "Add expense (e.g. :a Rent 1200.00)", cmd_add, r);
    register_command!("edit", "Edit expense at position (e.g. :edit 2)", cmd_edit, r);
    register_command!("e", "Edit expense at position (e.g. :e 2)", cmd_edit, r);
    register_command!(
        "delete",
        "Delete expense at position (e.g. :delete 2)",
        cmd_delete,
        r
    );
    register_command!(
        "del",
        "Delete expense at position (e.g. :delete 2)",
        cmd_delete,
        r
    );
    register_command!(
        "reserve",
        "Set reserve (e.g. :reserve 200, :reserve auto)",
        cmd_reserve,
        r
    );
    register_command!(
        "r",
        "Set reserve (e.g. :r 200, :r auto)",
        cmd_reserve,
        r
    );
    register_command!(
        "label",
        "Rename summary row (e.g. :label reserve Savings)",
        cmd_label,
        r
    );
    register_command!(
        "l",
        "Rename summary row (e.g. :l remainder Leftover)",
        cmd_label,
        r
    );

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, app, db)?;
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| (levenshtein(input, k), **k))
        .unwrap_or(&"help")
        .to_string()
}

pub(crate) fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Split `<description> <amount>`: the amount is the last word.
pub(crate) fn split_description_amount(args: &str) -> Option<(&str, &str)> {
    let (description, amount) = args.trim().rsplit_once(' ')?;
    let description = description.trim();
    if description.is_empty() {
        return None;
    }
    Some((description, amount))
}

/// Parse a displayed 1-based position into a rendered row.
fn parse_position(args: &str) -> Option<usize> {
    args.trim().parse::<usize>().ok()?.checked_sub(1)
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_salary(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :salary <amount>");
        return Ok(());
    }
    app.set_salary(db, args)?;
    let msg = match &app.errors.salary {
        Some(e) => e.to_string(),
        None => format!(
            "Salary set to {}",
            format_amount(app.view.totals.salary, app.config.locale)
        ),
    };
    app.set_status(msg);
    Ok(())
}

fn cmd_add(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if app.edit_cursor.is_some() {
        app.set_status("Finish or cancel (Esc) the current edit first");
        return Ok(());
    }
    let Some((description, amount)) = split_description_amount(args) else {
        app.set_status("Usage: :add <description> <amount>");
        return Ok(());
    };
    app.description_input = description.to_string();
    app.amount_input = amount.to_string();
    app.submit_expense(db)?;

    if let Some(e) = app.errors.description.as_ref().or(app.errors.amount.as_ref()) {
        let msg = e.to_string();
        app.set_status(msg);
    }
    Ok(())
}

fn cmd_edit(args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    let Some(row) = parse_position(args) else {
        app.set_status("Usage: :edit <position>");
        return Ok(());
    };
    if let Err(e) = app.begin_edit(row) {
        app.set_status(e.to_string());
    }
    Ok(())
}

fn cmd_delete(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let Some(row) = parse_position(args) else {
        app.set_status("Usage: :delete <position>");
        return Ok(());
    };
    app.delete_expense(db, row)
}

fn cmd_reserve(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.move_focus(Focus::Summary);
        app.select_summary(SummaryKind::Reserve);
        app.begin_reserve_edit();
        return Ok(());
    }
    if args.eq_ignore_ascii_case("auto") {
        return app.apply_reserve_override(db, None);
    }
    match parse_non_negative(args, "Reserve", app.config.locale) {
        Ok(val) => app.apply_reserve_override(db, Some(val)),
        Err(e) => {
            app.set_status(e.to_string());
            Ok(())
        }
    }
}

fn cmd_label(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let mut parts = args.splitn(2, ' ');
    let Some(target) = parts.next().and_then(LabelTarget::parse) else {
        app.set_status("Usage: :label reserve|remainder <text>");
        return Ok(());
    };
    match validate_label(parts.next().unwrap_or("")) {
        Ok(label) => app.set_label(db, target, label),
        Err(e) => {
            app.set_status(e.to_string());
            Ok(())
        }
    }
}
