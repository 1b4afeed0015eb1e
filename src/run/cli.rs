use anyhow::Result;

use crate::budget;
use crate::config::Config;
use crate::db::{persist, Database};
use crate::ui::util::truncate;

pub(crate) fn as_cli(args: &[String], db: &mut Database, config: Config) -> Result<()> {
    match args[1].as_str() {
        "summary" | "s" => cli_summary(db, &config),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("budgetcalc {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("BudgeCalc: salary, tithe, reserve and remainder at a glance");
    println!();
    println!("Usage: budgetcalc [command]");
    println!();
    println!("Commands:");
    println!("  (none)                        Launch interactive TUI");
    println!("  summary                       Print expenses and summary");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
    println!();
    println!("Environment:");
    println!("  BUDGETCALC_DB                 Database path");
    println!("  BUDGETCALC_RESERVE_RATIO      Default reserve share of salary (0 to 1)");
    println!("  BUDGETCALC_LOCALE             Number format: en | pt-BR");
    println!("  BUDGETCALC_LOG                Log level (default info)");
}

fn cli_summary(db: &Database, config: &Config) -> Result<()> {
    let state = persist::load_state(db)?;
    let view = budget::derive(&state, config);

    println!("BudgeCalc");
    println!("{}", "─".repeat(52));
    println!("{:<4} {:<24} {:>14} {:>8}", "#", "Description", "Amount", "%");
    for row in &view.expenses {
        println!(
            "{:<4} {:<24} {:>14} {:>8}",
            row.position,
            truncate(&row.description, 24),
            row.amount_text,
            row.percent_text,
        );
    }

    println!();
    for row in &view.summary {
        println!(
            "  {:<26} {:>14} {:>8}",
            truncate(&row.label, 26),
            row.amount_text,
            row.percent_text,
        );
    }

    Ok(())
}
