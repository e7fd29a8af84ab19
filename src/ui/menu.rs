use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Padding, Paragraph},
};

use crate::app::App;
use crate::data::ADMIN_USERNAME;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    let user = app.controller().current_user().unwrap_or_default();
    let header = Paragraph::new(format!("Logged in as {}", user))
        .alignment(Alignment::Right)
        .fg(Color::DarkGray);
    frame.render_widget(header, chunks[0]);

    let items: Vec<ListItem> = app
        .controller()
        .categories()
        .into_iter()
        .map(ListItem::new)
        .collect();
    let list = List::new(items)
        .block(
            Block::default()
                .title(" Select Category ")
                .title_style(Style::default().fg(Color::Cyan).bold())
                .borders(Borders::ALL)
                .border_style(Color::DarkGray)
                .padding(Padding::horizontal(1)),
        )
        .highlight_style(Style::default().fg(Color::Cyan).bold())
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected(Some(app.menu_cursor));
    frame.render_stateful_widget(list, chunks[1], &mut state);

    let hint = if user == ADMIN_USERNAME {
        "j/k navigate  ·  enter start quiz  ·  a admin panel  ·  l logout"
    } else {
        "j/k navigate  ·  enter start quiz  ·  l logout"
    };
    frame.render_widget(super::controls(hint), chunks[2]);
}
