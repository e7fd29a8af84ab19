mod admin;
mod login;
mod menu;
mod popup;
mod quiz;

use ratatui::{prelude::*, widgets::Block};

use crate::app::App;
use crate::models::Screen;

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    match app.screen() {
        Screen::Login => login::render(frame, area, app),
        Screen::Menu => menu::render(frame, area, app),
        Screen::Quiz => quiz::render(frame, area, app),
        Screen::Admin => admin::render(frame, area, app),
    }

    if let Some(popup) = &app.popup {
        popup::render(frame, area, popup);
    }
}

/// Dim hint line shown at the bottom of every screen.
fn controls(text: &str) -> ratatui::widgets::Paragraph<'_> {
    ratatui::widgets::Paragraph::new(text)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray)
}
