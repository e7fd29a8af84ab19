use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::app::{App, LoginField};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(11),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .split(area);

    let form = &app.login;
    let masked = "*".repeat(form.password.chars().count());

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "QUIZ SYSTEM",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        field_line("Username", &form.username, form.focus == LoginField::Username),
        Line::from(""),
        field_line("Password", &masked, form.focus == LoginField::Password),
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            "ENTER",
            Style::default().fg(Color::Green).bold(),
        )),
        Line::from("to log in".fg(Color::DarkGray)),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, chunks[1]);
    frame.render_widget(
        super::controls("tab switch field  ·  enter login  ·  F2 register  ·  esc quit"),
        chunks[3],
    );
}

fn field_line<'a>(label: &'a str, value: &'a str, focused: bool) -> Line<'a> {
    let label_style = if focused {
        Style::default().fg(Color::Cyan).bold()
    } else {
        Style::default().fg(Color::Gray)
    };
    let cursor = if focused { "_" } else { " " };

    Line::from(vec![
        Span::styled(format!("{:>9}: ", label), label_style),
        Span::styled(value, Style::default().fg(Color::Yellow)),
        Span::styled(cursor, Style::default().fg(Color::Yellow)),
    ])
}
