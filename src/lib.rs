//! # quizdesk
//!
//! Timed multiple-choice quizzes in the terminal. Users log in, pick a
//! category and answer its questions in random order, each under a
//! countdown. Scores are appended to a result log. The `admin` account
//! maintains the question bank and reviews results.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use quizdesk::{Config, QuizDesk, QuizError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), QuizError> {
//!     let desk = QuizDesk::open(Config::new("./quiz-data"))?;
//!     desk.run().await
//! }
//! ```
//!
//! The engine can also be driven without a terminal through [`Controller`]:
//!
//! ```rust,no_run
//! use quizdesk::{Config, Controller};
//!
//! # fn main() -> quizdesk::Result<()> {
//! let mut controller = Controller::open(&Config::new("./quiz-data"))?;
//! controller.login("admin", "admin")?;
//! controller.add_category("Math")?;
//! # Ok(())
//! # }
//! ```

mod app;
mod config;
mod controller;
mod data;
mod error;
mod input;
mod models;
mod session;
pub mod terminal;
mod timer;
mod ui;

use crossterm::event::{Event, EventStream, KeyEventKind};
use futures_util::StreamExt;
use tracing::info;

pub use app::App;
pub use config::Config;
pub use controller::{Command, Controller, Notice};
pub use data::{
    ADMIN_USERNAME, ContentStore, CredentialStore, ImportReport, ResultLog, SkippedEntry,
};
pub use error::{ErrorKind, QuizError, Result};
pub use models::{AttemptRecord, NUM_OPTIONS, NavState, Question, Screen};
pub use session::{
    AnswerOutcome, DEFAULT_TIME_LIMIT, Progress, QuizSession, SessionStatus, TickOutcome,
    TickToken,
};
pub use timer::{Countdown, TICK_PERIOD};

/// A quiz application bound to a data directory, ready to run in the
/// terminal.
pub struct QuizDesk {
    app: App,
}

impl QuizDesk {
    /// Open the stores in `config.data_dir`, creating them on first run.
    pub fn open(config: Config) -> Result<Self> {
        let controller = Controller::open(&config)?;
        Ok(Self {
            app: App::new(controller),
        })
    }

    /// Take over the terminal until the user quits from the login screen.
    pub async fn run(mut self) -> Result<()> {
        let mut guard = terminal::TerminalGuard::enter().map_err(QuizError::Terminal)?;
        info!("ui started");
        let result = run_event_loop(guard.terminal(), &mut self.app).await;
        info!("ui stopped");
        result
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }
}

async fn run_event_loop(terminal: &mut terminal::AppTerminal, app: &mut App) -> Result<()> {
    let mut events = EventStream::new();
    let (mut countdown, mut ticks) = Countdown::new(TICK_PERIOD);

    loop {
        countdown.sync(app.countdown_token());
        terminal
            .draw(|frame| ui::render(frame, app))
            .map_err(QuizError::Terminal)?;

        if app.should_quit {
            break;
        }

        tokio::select! {
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    input::handle_key(app, key);
                }
                Some(Ok(_)) => {}
                Some(Err(err)) => return Err(QuizError::Terminal(err)),
                None => break,
            },
            Some(token) = ticks.recv() => app.on_tick(token),
        }
    }

    countdown.cancel();
    Ok(())
}
