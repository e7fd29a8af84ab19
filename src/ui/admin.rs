use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Padding, Paragraph},
};

use crate::app::{AdminPane, App};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let rows = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    let header = Paragraph::new("ADMIN PANEL")
        .fg(Color::Cyan)
        .bold();
    frame.render_widget(header, rows[0]);

    let columns =
        Layout::horizontal([Constraint::Percentage(30), Constraint::Percentage(70)]).split(rows[1]);

    let categories: Vec<ListItem> = app
        .controller()
        .categories()
        .into_iter()
        .map(ListItem::new)
        .collect();
    render_list(
        frame,
        columns[0],
        " Categories ",
        categories,
        app.admin.category_cursor,
        app.admin.pane == AdminPane::Categories,
    );

    let questions: Vec<ListItem> = app
        .admin_questions()
        .iter()
        .enumerate()
        .map(|(i, q)| ListItem::new(format!("{}. {}", i + 1, q.summary())))
        .collect();
    render_list(
        frame,
        columns[1],
        " Questions ",
        questions,
        app.admin.question_cursor,
        app.admin.pane == AdminPane::Questions,
    );

    frame.render_widget(
        super::controls(
            "tab pane  ·  c add category  ·  a add question  ·  d delete  ·  i import  ·  r results  ·  m menu  ·  l logout",
        ),
        rows[2],
    );
}

fn render_list(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    items: Vec<ListItem>,
    cursor: usize,
    focused: bool,
) {
    let border = if focused { Color::Cyan } else { Color::DarkGray };
    let empty = items.is_empty();

    let list = List::new(items)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(border)
                .padding(Padding::horizontal(1)),
        )
        .highlight_style(Style::default().fg(Color::Cyan).bold())
        .highlight_symbol("> ");

    let selected = (!empty).then_some(cursor);
    let mut state = ListState::default().with_selected(selected);
    frame.render_stateful_widget(list, area, &mut state);
}
