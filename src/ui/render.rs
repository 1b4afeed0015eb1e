use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::app::{App, Focus, InputMode};
use super::commands;
use super::screens;
use super::theme;
use super::util::format_amount;
use crate::budget::{Sign, SummaryKind};

pub(crate) fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title bar
            Constraint::Length(6), // Form
            Constraint::Min(5),    // Expenses
            Constraint::Length(7), // Summary
            Constraint::Length(1), // Status bar
            Constraint::Length(1), // Command bar
        ])
        .split(f.area());

    render_title_bar(f, chunks[0], app);
    screens::form::render(f, chunks[1], app);
    screens::expenses::render(f, chunks[2], app);
    screens::summary::render(f, chunks[3], app);
    render_status_bar(f, chunks[4], app);
    render_command_bar(f, chunks[5], app);

    if app.show_help {
        render_help_overlay(f, f.area());
    }
}

fn render_title_bar(f: &mut Frame, area: Rect, app: &App) {
    let title = Span::styled(
        " BudgeCalc ",
        Style::default()
            .fg(theme::ACCENT)
            .add_modifier(Modifier::BOLD),
    );
    let salary = Span::styled(
        format!(
            " Salary {} ",
            format_amount(app.view.totals.salary, app.config.locale)
        ),
        theme::dim_style(),
    );
    let mut spans = vec![title, salary];
    if let Some(row) = app.view.summary_row(SummaryKind::Remainder) {
        let style = match row.sign {
            Some(Sign::Negative) => theme::negative_style(),
            _ => theme::positive_style(),
        };
        spans.push(Span::styled(
            format!(" {} {} ", row.label, row.amount_text),
            style,
        ));
    }
    let bar = Paragraph::new(Line::from(spans))
        .style(Style::default().bg(theme::HEADER_BG));
    f.render_widget(bar, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let editing = app.is_editing_summary() || app.edit_cursor.is_some();
    let mode_label = if editing && app.input_mode == InputMode::Normal {
        " EDIT ".to_string()
    } else {
        format!(" {} ", app.input_mode)
    };
    let mode_bg = match app.input_mode {
        InputMode::Command => theme::GREEN,
        InputMode::Normal if editing => theme::YELLOW,
        InputMode::Normal => theme::ACCENT,
    };
    let mode_style = Style::default()
        .fg(theme::HEADER_BG)
        .bg(mode_bg)
        .add_modifier(Modifier::BOLD);

    let info = format!(
        " {} | {} expenses | {}",
        app.focus,
        app.state.expenses.len(),
        app.config.locale
    );

    let right = if app.is_editing_summary() {
        " Enter save | Esc cancel "
    } else {
        match app.focus {
            Focus::Salary | Focus::Description | Focus::Amount => {
                " Tab next | Enter submit | Esc cancel edit "
            }
            Focus::Expenses => " j/k move | e edit | d delete | : cmd | ? help ",
            Focus::Summary => " j/k move | e reserve | r rename | : cmd | ? help ",
        }
    };

    let available = area.width as usize;
    let used = mode_label.len() + info.len() + right.len();
    let pad = available.saturating_sub(used);

    let bar = Paragraph::new(Line::from(vec![
        Span::styled(&mode_label, mode_style),
        Span::styled(&info, theme::status_bar_style()),
        Span::styled(" ".repeat(pad), theme::status_bar_style()),
        Span::styled(right, theme::status_bar_style()),
    ]));
    f.render_widget(bar, area);
}

fn render_command_bar(f: &mut Frame, area: Rect, app: &App) {
    let (content, cursor_offset) = match app.input_mode {
        InputMode::Command => (
            Line::from(vec![
                Span::styled(":", Style::default().fg(theme::ACCENT)),
                Span::styled(&app.command_input, theme::command_bar_style()),
            ]),
            Some(1 + app.command_input.chars().count() as u16),
        ),
        InputMode::Normal => (
            if app.status_message.is_empty() {
                Line::from(Span::styled(
                    " Tab to move between panels, : for commands, ? for help",
                    theme::dim_style(),
                ))
            } else {
                Line::from(Span::styled(
                    &app.status_message,
                    theme::command_bar_style(),
                ))
            },
            None,
        ),
    };

    let bar = Paragraph::new(content).style(Style::default().bg(theme::COMMAND_BG));
    f.render_widget(bar, area);

    if let Some(offset) = cursor_offset {
        f.set_cursor_position((area.x + offset, area.y));
    }
}

fn section(title: &str) -> Line<'_> {
    Line::from(Span::styled(
        title,
        Style::default()
            .fg(theme::YELLOW)
            .add_modifier(Modifier::BOLD),
    ))
}

fn render_help_overlay(f: &mut Frame, area: Rect) {
    let mut help_text = vec![
        Line::from(Span::styled(
            " BudgeCalc Help ",
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        section(" Navigation"),
        Line::from(Span::styled(
            "  Tab/Shift-Tab    Next/Prev panel       j/k        Move cursor",
            theme::normal_style(),
        )),
        Line::from(Span::styled(
            "  g/G              Top/Bottom            Ctrl-q     Quit",
            theme::normal_style(),
        )),
        Line::from(""),
        section(" Actions"),
        Line::from(Span::styled(
            "  Enter (form)     Add/Update expense    Esc        Cancel edit",
            theme::normal_style(),
        )),
        Line::from(Span::styled(
            "  e (Expenses)     Edit expense          d          Delete expense",
            theme::normal_style(),
        )),
        Line::from(Span::styled(
            "  e (Summary)      Edit reserve          r          Rename row",
            theme::normal_style(),
        )),
        Line::from(Span::styled(
            "  :                Command mode          ?          This help",
            theme::normal_style(),
        )),
        Line::from(""),
        section(" Commands"),
    ];

    // Longest alias wins so each command is listed once under its full name
    let mut entries: Vec<(&str, &str)> = commands::COMMANDS
        .iter()
        .filter(|(name, _)| name.len() > 1)
        .map(|(&name, cmd)| (name, cmd.description))
        .collect();
    entries.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then(a.0.cmp(b.0)));
    let mut seen = std::collections::HashSet::new();
    entries.retain(|(_, desc)| seen.insert(*desc));
    entries.sort_by_key(|(name, _)| *name);

    for (name, desc) in &entries {
        help_text.push(Line::from(Span::styled(
            format!("  :{name:<10} {desc}"),
            theme::normal_style(),
        )));
    }

    help_text.push(Line::from(""));
    help_text.push(Line::from(Span::styled(
        " Press any key to close ",
        Style::default().fg(theme::TEXT_DIM),
    )));

    // Center the popup, clamped to terminal height
    let popup_height = (help_text.len() as u16 + 2).min(area.height.saturating_sub(2));
    let popup_width = 72.min(area.width.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(popup_width)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(x, y, popup_width, popup_height);

    f.render_widget(Clear, popup_area);
    let help = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT))
            .style(Style::default().bg(theme::HEADER_BG)),
    );
    f.render_widget(help, popup_area);
}
