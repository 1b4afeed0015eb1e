use ratatui::{
    layout::{Constraint, Rect},
    text::Span,
    widgets::{Block, Borders, Cell, Row, Table},
    Frame,
};

use crate::ui::app::{App, Focus};
use crate::ui::theme;
use crate::ui::util::{scroll_offset, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == Focus::Expenses;

    let header_cells = ["#", "Description", "Amount", "%", "Actions"]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let page = area.height.saturating_sub(3) as usize;
    let offset = if focused {
        scroll_offset(app.expense_index, page)
    } else {
        0
    };

    let rows: Vec<Row> = app
        .view
        .expenses
        .iter()
        .enumerate()
        .skip(offset)
        .take(page)
        .map(|(i, row)| {
            let style = if focused && i == app.expense_index {
                theme::selected_style()
            } else if app.edit_cursor == Some(i) {
                theme::editing_style()
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };

            let actions = if row.has_controls {
                Span::styled("e edit  d delete", theme::dim_style())
            } else {
                Span::raw("")
            };

            Row::new(vec![
                Cell::from(row.position.to_string()),
                Cell::from(truncate(&row.description, 40)),
                Cell::from(row.amount_text.clone()),
                Cell::from(row.percent_text.clone()),
                Cell::from(actions),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Min(20),
        Constraint::Length(16),
        Constraint::Length(9),
        Constraint::Length(17),
    ];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border_style(focused))
            .title(Span::styled(
                format!(" Expenses ({}) ", app.view.expenses.len()),
                theme::title_style(focused),
            )),
    );

    f.render_widget(table, area);
}
