use ratatui::{
    prelude::*,
    widgets::{Gauge, Paragraph, Wrap},
};

use crate::app::App;
use crate::session::QuizSession;

const OPTION_LABELS: [char; 4] = ['1', '2', '3', '4'];

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Some(session) = app.controller().session() else {
        return;
    };
    let Some(question) = session.current_question() else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(2)
    .split(area);

    render_progress(frame, chunks[0], session);
    render_timer(frame, chunks[1], session);
    render_question_text(
        frame,
        chunks[2],
        &format!("Q{}. {}", session.current_index() + 1, question.text()),
    );
    render_options(
        frame,
        chunks[3],
        question.options(),
        app.quiz_cursor,
        session.selected_option(),
    );
    frame.render_widget(
        super::controls("j/k or 1-4 select  ·  enter submit  ·  n skip  ·  q quit"),
        chunks[4],
    );
}

fn render_progress(frame: &mut Frame, area: Rect, session: &QuizSession) {
    let progress = format!(
        "{}  ·  {}/{}  ·  score {}",
        session.category(),
        session.current_index() + 1,
        session.total(),
        session.score()
    );
    let widget = Paragraph::new(progress)
        .alignment(Alignment::Right)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}

fn render_timer(frame: &mut Frame, area: Rect, session: &QuizSession) {
    let remaining = session.remaining_seconds();
    let limit = session.time_limit().max(1);
    let color = timer_color(remaining, limit);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(color))
        .ratio(f64::from(remaining) / f64::from(limit))
        .label(format!("Time left: {}s", remaining));
    frame.render_widget(gauge, area);
}

fn timer_color(remaining: u32, limit: u32) -> Color {
    match u64::from(remaining) * 100 / u64::from(limit.max(1)) {
        50.. => Color::Green,
        25..=49 => Color::Yellow,
        _ => Color::Red,
    }
}

fn render_question_text(frame: &mut Frame, area: Rect, text: &str) {
    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .fg(Color::White)
        .bold();
    frame.render_widget(widget, area);
}

fn render_options(
    frame: &mut Frame,
    area: Rect,
    options: &[String; 4],
    cursor: usize,
    selected: Option<usize>,
) {
    let mut lines: Vec<Line> = Vec::with_capacity(options.len() * 2);

    for (index, option) in options.iter().enumerate() {
        let is_selected = selected == Some(index);
        let style = if is_selected {
            Style::default().fg(Color::Cyan).bold()
        } else if index == cursor && selected.is_none() {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::Gray)
        };
        let marker = if is_selected { "(*)" } else { "( )" };

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(format!("{}. ", OPTION_LABELS[index]), style),
            Span::styled(option.as_str(), style),
        ]));
        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::models::Question;

    #[test]
    fn test_timer_color_thresholds() {
        assert_eq!(timer_color(20, 20), Color::Green);
        assert_eq!(timer_color(10, 20), Color::Green);
        assert_eq!(timer_color(9, 20), Color::Yellow);
        assert_eq!(timer_color(4, 20), Color::Red);
        assert_eq!(timer_color(u32::MAX, u32::MAX), Color::Green);
    }

    #[test]
    fn test_render_timer_with_huge_limit() {
        let question = Question::new("2+2?", ["3", "4", "5", "6"], 1).unwrap();
        let mut session = QuizSession::new(50_000_000);
        session
            .start_with_rng("Math", &[question], &mut StdRng::seed_from_u64(1))
            .unwrap();

        let mut terminal = Terminal::new(TestBackend::new(40, 1)).unwrap();
        terminal
            .draw(|frame| render_timer(frame, frame.area(), &session))
            .unwrap();
    }
}
