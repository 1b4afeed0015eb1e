use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tracing::{error, info};

use crate::budget::SummaryKind;
use crate::config::Config;
use crate::db::Database;
use crate::ui::app::{App, Focus, InputMode, LabelTarget};
use crate::ui::commands;

pub(crate) fn as_tui(db: &mut Database, config: Config) -> Result<()> {
    let mut app = App::load(db, config)?;
    info!(
        expenses = app.state.expenses.len(),
        "Starting interactive session"
    );

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, db);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        error!("Session ended with error: {e:?}");
        eprintln!("Error: {e:?}");
    }

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    db: &mut Database,
) -> Result<()> {
    while app.running {
        terminal.draw(|f| crate::ui::render::render(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            handle_key(key, app, db)?;
        }
    }
    info!("Session closed");
    Ok(())
}

/// Route one key press. Overlays and open editors take precedence over the
/// focused panel.
fn handle_key(key: KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    if app.show_help {
        app.show_help = false;
        return Ok(());
    }
    if is_quit(&key) {
        app.running = false;
        return Ok(());
    }
    if app.input_mode == InputMode::Command {
        return handle_command_input(key, app, db);
    }
    if app.reserve_input_mut().is_some() {
        return handle_reserve_input(key, app, db);
    }
    if app.label_input_mut().is_some() {
        return handle_label_input(key, app, db);
    }

    match key.code {
        KeyCode::Tab => app.focus_next(),
        KeyCode::BackTab => app.focus_prev(),
        KeyCode::Esc => app.cancel_edit(),
        _ if app.focus.is_input() => handle_form_input(key, app, db)?,
        _ => handle_table_input(key, app, db)?,
    }
    Ok(())
}

fn is_quit(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('q') | KeyCode::Char('c'))
}

// ── Input handlers ───────────────────────────────────────────

fn focused_input(app: &mut App) -> Option<&mut String> {
    match app.focus {
        Focus::Salary => Some(&mut app.salary_input),
        Focus::Description => Some(&mut app.description_input),
        Focus::Amount => Some(&mut app.amount_input),
        Focus::Expenses | Focus::Summary => None,
    }
}

fn handle_form_input(key: KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Enter => match app.focus {
            Focus::Salary => {
                app.salary_blur();
                app.focus_next();
            }
            _ => app.submit_expense(db)?,
        },
        KeyCode::Backspace => {
            if let Some(input) = focused_input(app) {
                input.pop();
            }
            if app.focus == Focus::Salary {
                app.salary_changed(db)?;
            }
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            if let Some(input) = focused_input(app) {
                input.push(c);
            }
            if app.focus == Focus::Salary {
                app.salary_changed(db)?;
            }
        }
        _ => {}
    }
    Ok(())
}

fn handle_table_input(key: KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Command;
            app.command_input.clear();
        }
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Char('j') | KeyCode::Down => move_selection(app, 1),
        KeyCode::Char('k') | KeyCode::Up => move_selection(app, -1),
        KeyCode::Char('g') | KeyCode::Home => jump_selection(app, false),
        KeyCode::Char('G') | KeyCode::End => jump_selection(app, true),
        KeyCode::Char('e') | KeyCode::Enter => match app.focus {
            Focus::Expenses => {
                if let Err(e) = app.begin_edit(app.expense_index) {
                    app.set_status(e.to_string());
                }
            }
            Focus::Summary => {
                if app.selected_summary_kind() == Some(SummaryKind::Reserve) {
                    app.begin_reserve_edit();
                }
            }
            _ => {}
        },
        KeyCode::Char('d') | KeyCode::Delete if app.focus == Focus::Expenses => {
            let row = app.expense_index;
            app.delete_expense(db, row)?;
        }
        KeyCode::Char('r') if app.focus == Focus::Summary => {
            if let Some(target) = app.selected_summary_kind().and_then(LabelTarget::from_kind) {
                app.begin_label_edit(target);
            }
        }
        _ => {}
    }
    Ok(())
}

fn move_selection(app: &mut App, delta: isize) {
    let (index, len) = match app.focus {
        Focus::Expenses => (&mut app.expense_index, app.view.expenses.len()),
        Focus::Summary => (&mut app.summary_index, app.view.summary.len()),
        _ => return,
    };
    if len == 0 {
        return;
    }
    *index = index.saturating_add_signed(delta).min(len - 1);
}

fn jump_selection(app: &mut App, bottom: bool) {
    let (index, len) = match app.focus {
        Focus::Expenses => (&mut app.expense_index, app.view.expenses.len()),
        Focus::Summary => (&mut app.summary_index, app.view.summary.len()),
        _ => return,
    };
    *index = if bottom { len.saturating_sub(1) } else { 0 };
}

fn handle_reserve_input(key: KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Enter => app.commit_reserve(db)?,
        KeyCode::Esc => app.cancel_reserve_edit(),
        KeyCode::Backspace => {
            if let Some(input) = app.reserve_input_mut() {
                input.pop();
            }
        }
        KeyCode::Char(c) => {
            if let Some(input) = app.reserve_input_mut() {
                input.push(c);
            }
        }
        _ => {}
    }
    Ok(())
}

fn handle_label_input(key: KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Enter => app.commit_label(db)?,
        KeyCode::Esc => app.cancel_label_edit(),
        KeyCode::Backspace => {
            if let Some(input) = app.label_input_mut() {
                input.pop();
            }
        }
        KeyCode::Char(c) => {
            if let Some(input) = app.label_input_mut() {
                input.push(c);
            }
        }
        _ => {}
    }
    Ok(())
}

fn handle_command_input(key: KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let input = app.command_input.clone();
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
            commands::handle_command(&input, app, db)?;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
        }
        KeyCode::Backspace => {
            app.command_input.pop();
            if app.command_input.is_empty() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.command_input.clear();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let trimmed = app.command_input.trim_end();
            if let Some(pos) = trimmed.rfind(' ') {
                app.command_input.truncate(pos + 1);
            } else {
                app.command_input.clear();
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
#[path = "tui_tests.rs"]
mod tests;
