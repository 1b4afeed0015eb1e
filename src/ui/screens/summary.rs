use ratatui::{
    layout::{Constraint, Rect},
    text::Span,
    widgets::{Block, Borders, Cell, Row, Table},
    Frame,
};

use crate::budget::{Sign, SummaryKind, SummaryRow};
use crate::ui::app::{App, Focus, LabelMode, ReserveMode};
use crate::ui::theme;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == Focus::Summary;

    let rows: Vec<Row> = app
        .view
        .summary
        .iter()
        .enumerate()
        .map(|(i, row)| summary_row(app, focused && i == app.summary_index, row))
        .collect();

    let widths = [
        Constraint::Length(2),
        Constraint::Min(18),
        Constraint::Length(16),
        Constraint::Length(9),
        Constraint::Min(24),
    ];

    let header_cells = ["", "Item", "Amount", "%", ""]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border_style(focused))
            .title(Span::styled(" Summary ", theme::title_style(focused))),
    );

    f.render_widget(table, area);
}

fn summary_row<'a>(app: &'a App, selected: bool, row: &'a SummaryRow) -> Row<'a> {
    let editing_label = match &app.label_mode {
        LabelMode::Editing { target, input } if target.kind() == row.kind => Some(input),
        _ => None,
    };
    let editing_reserve = match &app.reserve_mode {
        ReserveMode::Editing { input } if row.kind == SummaryKind::Reserve => Some(input),
        _ => None,
    };

    let label = match editing_label {
        Some(input) => Cell::from(format!("{input}_")).style(theme::editing_style()),
        None => Cell::from(row.label.as_str()),
    };
    let amount = match editing_reserve {
        Some(input) => Cell::from(format!("{input}_")).style(theme::editing_style()),
        None => Cell::from(row.amount_text.as_str()),
    };

    let actions = if editing_reserve.is_some() {
        match &app.errors.reserve {
            Some(e) => Span::styled(e.to_string(), theme::error_style()),
            None => Span::styled("Enter save  Esc cancel", theme::dim_style()),
        }
    } else if editing_label.is_some() {
        match &app.errors.label {
            Some(e) => Span::styled(e.to_string(), theme::error_style()),
            None => Span::styled("Enter save  Esc cancel", theme::dim_style()),
        }
    } else if selected {
        Span::styled(hint(row.kind), theme::dim_style())
    } else {
        Span::raw("")
    };

    let marker = if row.kind == SummaryKind::Reserve && app.state.reserve_override.is_some() {
        "*"
    } else {
        ""
    };

    let style = if selected && editing_label.is_none() && editing_reserve.is_none() {
        theme::selected_style()
    } else {
        match row.sign {
            Some(Sign::NonNegative) => theme::positive_style(),
            Some(Sign::Negative) => theme::negative_style(),
            None => theme::normal_style(),
        }
    };

    Row::new(vec![
        Cell::from(marker),
        label,
        amount,
        Cell::from(row.percent_text.as_str()),
        Cell::from(actions),
    ])
    .style(style)
}

fn hint(kind: SummaryKind) -> &'static str {
    match kind {
        SummaryKind::Reserve => "e edit  r rename",
        _ if kind.label_editable() => "r rename",
        _ => "",
    }
}
