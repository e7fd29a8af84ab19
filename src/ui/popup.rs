//! Modal overlays drawn on top of the active screen.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap},
};

use crate::app::{MessageKind, Popup, QUESTION_FORM_FIELDS, QuestionForm};

pub fn render(frame: &mut Frame, area: Rect, popup: &Popup) {
    match popup {
        Popup::Message { kind, title, lines } => {
            let color = match kind {
                MessageKind::Info => Color::Cyan,
                MessageKind::Error => Color::Red,
            };
            let mut content: Vec<Line> = lines.iter().map(|l| Line::from(l.as_str())).collect();
            content.push(Line::from(""));
            content.push(hint("enter close"));
            draw_box(frame, area, title, color, content, 60);
        }
        Popup::Confirm { prompt, .. } => {
            let content = vec![
                Line::from(prompt.as_str()),
                Line::from(""),
                hint("y confirm  ·  n cancel"),
            ];
            draw_box(frame, area, "Confirm", Color::Yellow, content, 60);
        }
        Popup::Input { title, value, .. } => {
            let content = vec![
                Line::from(vec![
                    Span::styled(value.as_str(), Style::default().fg(Color::Yellow)),
                    Span::styled("_", Style::default().fg(Color::Yellow)),
                ]),
                Line::from(""),
                hint("enter ok  ·  esc cancel"),
            ];
            draw_box(frame, area, title, Color::Cyan, content, 70);
        }
        Popup::QuestionForm(form) => render_question_form(frame, area, form),
        Popup::Results { lines, scroll } => {
            let rect = centered(area, 90, area.height.saturating_sub(4));
            frame.render_widget(Clear, rect);
            let widget = Paragraph::new(lines.iter().map(|l| Line::from(l.as_str())).collect::<Vec<_>>())
                .scroll((*scroll as u16, 0))
                .block(
                    Block::default()
                        .title(" Results  (j/k scroll · esc close) ")
                        .borders(Borders::ALL)
                        .border_style(Color::Cyan)
                        .padding(Padding::horizontal(1)),
                );
            frame.render_widget(widget, rect);
        }
    }
}

fn render_question_form(frame: &mut Frame, area: Rect, form: &QuestionForm) {
    let mut content = Vec::new();
    for (i, label) in QUESTION_FORM_FIELDS.iter().enumerate() {
        let focused = i == form.focus;
        let label_style = if focused {
            Style::default().fg(Color::Cyan).bold()
        } else {
            Style::default().fg(Color::Gray)
        };
        content.push(Line::from(Span::styled(*label, label_style)));
        content.push(Line::from(vec![
            Span::styled(
                format!("  {}", form.fields[i]),
                Style::default().fg(Color::Yellow),
            ),
            Span::styled(if focused { "_" } else { "" }, Style::default().fg(Color::Yellow)),
        ]));
    }
    content.push(Line::from(""));
    if let Some(err) = &form.error {
        content.push(Line::from(Span::styled(
            err.as_str(),
            Style::default().fg(Color::Red),
        )));
    }
    content.push(hint("tab next field  ·  enter on last field adds  ·  esc cancel"));

    let title = format!("Add Question to {}", form.category);
    draw_box(frame, area, &title, Color::Cyan, content, 80);
}

fn draw_box(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    color: Color,
    content: Vec<Line>,
    width_percent: u16,
) {
    let height = (content.len() as u16 + 4).min(area.height);
    let rect = centered(area, width_percent, height);
    frame.render_widget(Clear, rect);

    let widget = Paragraph::new(content).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(format!(" {} ", title))
            .title_style(Style::default().fg(color).bold())
            .borders(Borders::ALL)
            .border_style(color)
            .padding(Padding::uniform(1)),
    );
    frame.render_widget(widget, rect);
}

fn hint(text: &str) -> Line<'_> {
    Line::from(Span::styled(text, Style::default().fg(Color::DarkGray)))
}

fn centered(area: Rect, width_percent: u16, height: u16) -> Rect {
    let width = (u32::from(area.width) * u32::from(width_percent) / 100) as u16;
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}
