//! Navigation between the Login, Menu, Quiz and Admin screens.
//!
//! The controller owns the stores and the active quiz session. Each command
//! checks the screen it is allowed on before touching anything, so a user
//! who never logged in cannot reach Menu, Quiz or Admin.

use std::fs;
use std::path::PathBuf;

use tracing::{error, info, warn};

use crate::config::Config;
use crate::data::{ADMIN_USERNAME, ContentStore, CredentialStore, ImportReport, ResultLog};
use crate::error::{QuizError, Result};
use crate::models::{AttemptRecord, NavState, Question, Screen};
use crate::session::{Progress, QuizSession, TickOutcome, TickToken};

/// Commands accepted from the presentation layer.
#[derive(Debug, Clone)]
pub enum Command {
    Login { username: String, password: String },
    Register { username: String, password: String },
    Logout,
    OpenAdmin,
    OpenMenu,
    SelectCategory(String),
    StartQuiz,
    SelectOption(usize),
    SubmitAnswer,
    Skip,
    AbortQuiz,
    Tick(TickToken),
    AddCategory(String),
    DeleteCategory(String),
    AddQuestion { category: String, question: Question },
    DeleteQuestion { category: String, index: usize },
    ImportFile(PathBuf),
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Login { .. } => "login",
            Command::Register { .. } => "register",
            Command::Logout => "logout",
            Command::OpenAdmin => "openAdmin",
            Command::OpenMenu => "openMenu",
            Command::SelectCategory(_) => "selectCategory",
            Command::StartQuiz => "startQuiz",
            Command::SelectOption(_) => "selectOption",
            Command::SubmitAnswer => "submitAnswer",
            Command::Skip => "skip",
            Command::AbortQuiz => "abortQuiz",
            Command::Tick(_) => "tick",
            Command::AddCategory(_) => "addCategory",
            Command::DeleteCategory(_) => "deleteCategory",
            Command::AddQuestion { .. } => "addQuestion",
            Command::DeleteQuestion { .. } => "deleteQuestion",
            Command::ImportFile(_) => "importFile",
        }
    }
}

/// What happened as a result of a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    LoggedIn { username: String, screen: Screen },
    Registered { username: String },
    LoggedOut,
    Navigated(Screen),
    CategorySelected(String),
    QuizStarted { category: String, total: usize },
    OptionSelected(usize),
    Answered {
        correct: bool,
        correct_option: Option<String>,
        progress: Progress,
    },
    Skipped(Progress),
    TimeExpired(Progress),
    Counting { remaining: u32 },
    /// A tick for a countdown step that is no longer current.
    StaleTick,
    QuizAborted,
    CategoryAdded(String),
    CategoryDeleted(String),
    QuestionAdded { category: String },
    QuestionDeleted { category: String, index: usize },
    Imported(ImportReport),
}

pub struct Controller {
    content: ContentStore,
    credentials: CredentialStore,
    results: ResultLog,
    nav: NavState,
    session: Option<QuizSession>,
    selected_category: Option<String>,
    time_limit: u32,
}

impl Controller {
    /// Open (and bootstrap if needed) the stores described by `config`.
    pub fn open(config: &Config) -> Result<Self> {
        fs::create_dir_all(&config.data_dir).map_err(|err| QuizError::io(&config.data_dir, err))?;
        let content = ContentStore::open(config.questions_path())?;
        let credentials = CredentialStore::open(config.users_path())?;
        let results = ResultLog::new(config.results_path());
        Ok(Self::new(content, credentials, results, config.time_limit))
    }

    pub fn new(
        content: ContentStore,
        credentials: CredentialStore,
        results: ResultLog,
        time_limit: u32,
    ) -> Self {
        Self {
            content,
            credentials,
            results,
            nav: NavState::default(),
            session: None,
            selected_category: None,
            time_limit,
        }
    }

    /// Run a command and report what happened.
    pub fn dispatch(&mut self, command: Command) -> Result<Notice> {
        let command_name = command.name();
        let result = match command {
            Command::Login { username, password } => self.login(&username, &password),
            Command::Register { username, password } => self.register(&username, &password),
            Command::Logout => self.logout(),
            Command::OpenAdmin => self.open_admin(),
            Command::OpenMenu => self.open_menu(),
            Command::SelectCategory(name) => self.select_category(&name),
            Command::StartQuiz => self.start_quiz(),
            Command::SelectOption(index) => self.select_option(index),
            Command::SubmitAnswer => self.submit_answer(),
            Command::Skip => self.skip(),
            Command::AbortQuiz => self.abort_quiz(),
            Command::Tick(token) => self.tick(token),
            Command::AddCategory(name) => self.add_category(&name),
            Command::DeleteCategory(name) => self.delete_category(&name),
            Command::AddQuestion { category, question } => self.add_question(&category, question),
            Command::DeleteQuestion { category, index } => self.delete_question(&category, index),
            Command::ImportFile(path) => self.import_file(path),
        };

        if let Err(err) = &result {
            if err.is_user_correctable() {
                warn!(command = command_name, %err, "command rejected");
            } else {
                error!(command = command_name, %err, "command failed");
            }
        }
        result
    }

    pub fn state(&self) -> &NavState {
        &self.nav
    }

    pub fn screen(&self) -> Screen {
        self.nav.screen
    }

    pub fn current_user(&self) -> Option<&str> {
        self.nav.current_user.as_deref()
    }

    /// The active quiz, present only on the Quiz screen.
    pub fn session(&self) -> Option<&QuizSession> {
        self.session.as_ref()
    }

    pub fn selected_category(&self) -> Option<&str> {
        self.selected_category.as_deref()
    }

    /// The countdown step the event loop should schedule next.
    pub fn countdown_token(&self) -> Option<TickToken> {
        self.session.as_ref().and_then(QuizSession::countdown_token)
    }

    /// Category names, alphabetical.
    pub fn categories(&self) -> Vec<String> {
        self.content.list_categories().map(str::to_string).collect()
    }

    /// Questions of a category as stored. Admin only.
    pub fn questions(&self, category: &str) -> Result<&[Question]> {
        self.require(Screen::Admin, "listQuestions")?;
        self.content
            .list_questions(category)
            .ok_or_else(|| QuizError::NotFound(format!("category {}", category)))
    }

    /// Raw result log lines. Admin only.
    pub fn results(&self) -> Result<Vec<String>> {
        self.require(Screen::Admin, "viewResults")?;
        self.results.read_all()
    }

    pub fn login(&mut self, username: &str, password: &str) -> Result<Notice> {
        self.require(Screen::Login, "login")?;
        let username = username.trim();
        let password = password.trim();

        if !self.credentials.verify(username, password) {
            return Err(QuizError::InvalidCredentials);
        }

        let screen = if username == ADMIN_USERNAME {
            Screen::Admin
        } else {
            Screen::Menu
        };
        self.nav = NavState {
            screen,
            current_user: Some(username.to_string()),
        };

        info!(username, %screen, "logged in");
        Ok(Notice::LoggedIn {
            username: username.to_string(),
            screen,
        })
    }

    pub fn register(&mut self, username: &str, password: &str) -> Result<Notice> {
        self.require(Screen::Login, "register")?;
        let username = username.trim();
        self.credentials.register(username, password.trim())?;
        Ok(Notice::Registered {
            username: username.to_string(),
        })
    }

    pub fn logout(&mut self) -> Result<Notice> {
        self.require_any(&[Screen::Menu, Screen::Admin], "logout")?;
        info!(username = ?self.nav.current_user, "logged out");
        self.nav = NavState::default();
        self.selected_category = None;
        Ok(Notice::LoggedOut)
    }

    pub fn open_admin(&mut self) -> Result<Notice> {
        self.require(Screen::Menu, "openAdmin")?;
        if self.current_user() != Some(ADMIN_USERNAME) {
            return Err(QuizError::NotPermitted {
                command: "openAdmin",
                screen: Screen::Menu,
            });
        }
        self.nav.screen = Screen::Admin;
        Ok(Notice::Navigated(Screen::Admin))
    }

    pub fn open_menu(&mut self) -> Result<Notice> {
        self.require(Screen::Admin, "openMenu")?;
        self.nav.screen = Screen::Menu;
        Ok(Notice::Navigated(Screen::Menu))
    }

    pub fn select_category(&mut self, name: &str) -> Result<Notice> {
        self.require(Screen::Menu, "selectCategory")?;
        if !self.content.contains(name) {
            return Err(QuizError::NotFound(format!("category {}", name)));
        }
        self.selected_category = Some(name.to_string());
        Ok(Notice::CategorySelected(name.to_string()))
    }

    /// Start a quiz on the selected category.
    pub fn start_quiz(&mut self) -> Result<Notice> {
        self.require(Screen::Menu, "startQuiz")?;
        let category = self
            .selected_category
            .clone()
            .ok_or_else(|| QuizError::InvalidInput("select a category".into()))?;
        let questions = self
            .content
            .list_questions(&category)
            .ok_or_else(|| QuizError::NotFound(format!("category {}", category)))?;

        let mut session = QuizSession::new(self.time_limit);
        session.start(&category, questions)?;
        let total = session.total();

        self.session = Some(session);
        self.nav.screen = Screen::Quiz;
        Ok(Notice::QuizStarted { category, total })
    }

    pub fn select_option(&mut self, index: usize) -> Result<Notice> {
        self.active_session("selectOption")?.select_option(index)?;
        Ok(Notice::OptionSelected(index))
    }

    pub fn submit_answer(&mut self) -> Result<Notice> {
        let outcome = self.active_session("submitAnswer")?.submit()?;
        let notice = Notice::Answered {
            correct: outcome.correct,
            correct_option: outcome.correct_option,
            progress: outcome.progress,
        };
        self.after_progress(outcome.progress, notice)
    }

    pub fn skip(&mut self) -> Result<Notice> {
        let progress = self.active_session("skip")?.next()?;
        self.after_progress(progress, Notice::Skipped(progress))
    }

    /// Leave the quiz without recording a result. The caller confirms first.
    pub fn abort_quiz(&mut self) -> Result<Notice> {
        self.active_session("abortQuiz")?.abort()?;
        self.session = None;
        self.nav.screen = Screen::Menu;
        Ok(Notice::QuizAborted)
    }

    /// Apply a countdown tick. Ticks that do not match the running question
    /// are reported as stale and change nothing.
    pub fn tick(&mut self, token: TickToken) -> Result<Notice> {
        let Some(session) = self.session.as_mut() else {
            return Ok(Notice::StaleTick);
        };

        match session.tick(token) {
            TickOutcome::Stale => Ok(Notice::StaleTick),
            TickOutcome::Counting { remaining } => Ok(Notice::Counting { remaining }),
            TickOutcome::Expired(progress) => {
                self.after_progress(progress, Notice::TimeExpired(progress))
            }
        }
    }

    pub fn add_category(&mut self, name: &str) -> Result<Notice> {
        self.require(Screen::Admin, "addCategory")?;
        self.content.add_category(name)?;
        Ok(Notice::CategoryAdded(name.trim().to_string()))
    }

    pub fn delete_category(&mut self, name: &str) -> Result<Notice> {
        self.require(Screen::Admin, "deleteCategory")?;
        self.content.delete_category(name)?;
        if self.selected_category.as_deref() == Some(name) {
            self.selected_category = None;
        }
        Ok(Notice::CategoryDeleted(name.to_string()))
    }

    pub fn add_question(&mut self, category: &str, question: Question) -> Result<Notice> {
        self.require(Screen::Admin, "addQuestion")?;
        self.content.add_question(category, question)?;
        Ok(Notice::QuestionAdded {
            category: category.to_string(),
        })
    }

    pub fn delete_question(&mut self, category: &str, index: usize) -> Result<Notice> {
        self.require(Screen::Admin, "deleteQuestion")?;
        self.content.delete_question(category, index)?;
        Ok(Notice::QuestionDeleted {
            category: category.to_string(),
            index,
        })
    }

    pub fn import_file(&mut self, path: PathBuf) -> Result<Notice> {
        self.require(Screen::Admin, "importFile")?;
        let report = self.content.import_file(path)?;
        Ok(Notice::Imported(report))
    }

    fn require(&self, screen: Screen, command: &'static str) -> Result<()> {
        self.require_any(&[screen], command)
    }

    fn require_any(&self, screens: &[Screen], command: &'static str) -> Result<()> {
        if screens.contains(&self.nav.screen) {
            Ok(())
        } else {
            Err(QuizError::NotPermitted {
                command,
                screen: self.nav.screen,
            })
        }
    }

    fn active_session(&mut self, command: &'static str) -> Result<&mut QuizSession> {
        self.require(Screen::Quiz, command)?;
        self.session.as_mut().ok_or(QuizError::SessionInactive)
    }

    /// Record the attempt and return to the menu once the quiz finished.
    /// A failed append still ends the quiz; the error carries `notice`.
    fn after_progress(&mut self, progress: Progress, notice: Notice) -> Result<Notice> {
        let Progress::Finished { score, total } = progress else {
            return Ok(notice);
        };

        let category = self
            .session
            .take()
            .map(|s| s.category().to_string())
            .unwrap_or_default();
        self.nav.screen = Screen::Menu;

        let username = self.nav.current_user.clone().unwrap_or_default();
        let record = AttemptRecord::now(username, category, score, total);
        match self.results.append(&record) {
            Ok(()) => Ok(notice),
            Err(source) => Err(QuizError::AttemptNotRecorded {
                notice: Box::new(notice),
                source: Box::new(source),
            }),
        }
    }
}
