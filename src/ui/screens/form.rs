use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::models::ValidationError;
use crate::ui::app::{App, Focus, InputMode};
use crate::ui::theme;

const LABEL_WIDTH: u16 = 14;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus.is_input();
    let fields = [
        (Focus::Salary, "Salary", &app.salary_input, &app.errors.salary),
        (
            Focus::Description,
            "Description",
            &app.description_input,
            &app.errors.description,
        ),
        (Focus::Amount, "Amount", &app.amount_input, &app.errors.amount),
    ];

    let mut lines: Vec<Line> = fields
        .iter()
        .map(|(focus, label, input, error)| field_line(*focus == app.focus, label, input, error))
        .collect();

    let button_style = if app.edit_cursor.is_some() {
        theme::editing_style().add_modifier(Modifier::BOLD)
    } else {
        theme::selected_style().add_modifier(Modifier::BOLD)
    };
    let mut button = vec![
        Span::raw(" ".repeat(LABEL_WIDTH as usize)),
        Span::styled(format!(" {} ", app.submit_label()), button_style),
    ];
    if app.edit_cursor.is_some() {
        button.push(Span::styled("  Esc cancels the edit", theme::dim_style()));
    }
    lines.push(Line::from(button));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::border_style(focused))
        .title(Span::styled(" Budget ", theme::title_style(focused)));
    let inner = block.inner(area);
    f.render_widget(Paragraph::new(lines).block(block), area);

    if focused && app.input_mode == InputMode::Normal && !app.is_editing_summary() {
        if let Some(row) = fields.iter().position(|(focus, ..)| *focus == app.focus) {
            let typed = fields[row].2.chars().count() as u16;
            let x = (inner.x + LABEL_WIDTH + typed).min(inner.right().saturating_sub(1));
            f.set_cursor_position((x, inner.y + row as u16));
        }
    }
}

fn field_line<'a>(
    focused: bool,
    label: &'a str,
    input: &'a str,
    error: &Option<ValidationError>,
) -> Line<'a> {
    let label_style = if focused {
        Style::default()
            .fg(theme::ACCENT)
            .add_modifier(Modifier::BOLD)
    } else {
        theme::dim_style()
    };

    let mut spans = vec![
        Span::styled(
            format!("{label:<width$}", width = LABEL_WIDTH as usize),
            label_style,
        ),
        Span::styled(input, theme::normal_style()),
    ];
    if let Some(e) = error {
        spans.push(Span::styled(format!("  {e}"), theme::error_style()));
    }
    Line::from(spans)
}
