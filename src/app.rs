use std::path::PathBuf;

use crate::controller::{Command, Controller, Notice};
use crate::error::QuizError;
use crate::models::{NUM_OPTIONS, Question, Screen};
use crate::session::{Progress, TickToken};

/// Which login field receives typed characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Username,
    Password,
}

#[derive(Debug, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub focus: LoginField,
}

/// Which list has focus on the admin screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdminPane {
    #[default]
    Categories,
    Questions,
}

#[derive(Debug, Default)]
pub struct AdminView {
    pub pane: AdminPane,
    pub category_cursor: usize,
    pub question_cursor: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    AbortQuiz,
    DeleteCategory(String),
    DeleteQuestion { category: String, index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    AddCategory,
    Import,
}

/// Field labels of the add-question form, in focus order.
pub const QUESTION_FORM_FIELDS: [&str; 6] = [
    "Question",
    "Option 1",
    "Option 2",
    "Option 3",
    "Option 4",
    "Correct option (1-4)",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionForm {
    pub category: String,
    pub fields: [String; 6],
    pub focus: usize,
    pub error: Option<String>,
}

/// Modal overlays. While one is open it receives all input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Popup {
    Message {
        kind: MessageKind,
        title: String,
        lines: Vec<String>,
    },
    Confirm {
        prompt: String,
        action: ConfirmAction,
    },
    Input {
        title: String,
        value: String,
        action: InputAction,
    },
    QuestionForm(QuestionForm),
    Results {
        lines: Vec<String>,
        scroll: usize,
    },
}

/// Presentation state around the [`Controller`]. Holds only form buffers,
/// list cursors and popups; everything authoritative lives in the controller.
pub struct App {
    controller: Controller,
    pub login: LoginForm,
    pub menu_cursor: usize,
    pub quiz_cursor: usize,
    pub admin: AdminView,
    pub popup: Option<Popup>,
    pub should_quit: bool,
    /// Why the result of the quiz that just ended was not saved.
    unsaved_result: Option<String>,
}

impl App {
    pub fn new(controller: Controller) -> Self {
        Self {
            controller,
            login: LoginForm::default(),
            menu_cursor: 0,
            quiz_cursor: 0,
            admin: AdminView::default(),
            popup: None,
            should_quit: false,
            unsaved_result: None,
        }
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn screen(&self) -> Screen {
        self.controller.screen()
    }

    /// The countdown step to schedule. Paused while the feedback for the
    /// previous question is on screen; error and confirmation popups do not
    /// stop the clock.
    pub fn countdown_token(&self) -> Option<TickToken> {
        if matches!(
            self.popup,
            Some(Popup::Message {
                kind: MessageKind::Info,
                ..
            })
        ) {
            return None;
        }
        self.controller.countdown_token()
    }

    /// Questions of the category under the admin cursor.
    pub fn admin_questions(&self) -> &[Question] {
        let Some(category) = self.admin_category() else {
            return &[];
        };
        self.controller.questions(&category).unwrap_or_default()
    }

    pub fn admin_category(&self) -> Option<String> {
        self.controller
            .categories()
            .into_iter()
            .nth(self.admin.category_cursor)
    }

    fn run(&mut self, command: Command) -> Option<Notice> {
        match self.controller.dispatch(command) {
            Ok(notice) => Some(notice),
            Err(QuizError::AttemptNotRecorded { notice, source }) => {
                self.unsaved_result = Some(source.to_string());
                Some(*notice)
            }
            Err(err) => {
                self.show_error(&err);
                None
            }
        }
    }

    pub fn show_info(&mut self, title: &str, lines: Vec<String>) {
        self.popup = Some(Popup::Message {
            kind: MessageKind::Info,
            title: title.to_string(),
            lines,
        });
    }

    pub fn show_error(&mut self, err: &QuizError) {
        self.popup = Some(Popup::Message {
            kind: MessageKind::Error,
            title: "Error".to_string(),
            lines: vec![err.to_string()],
        });
    }

    pub fn close_popup(&mut self) {
        self.popup = None;
    }

    // Login

    pub fn login_push(&mut self, c: char) {
        match self.login.focus {
            LoginField::Username => self.login.username.push(c),
            LoginField::Password => self.login.password.push(c),
        }
    }

    pub fn login_pop(&mut self) {
        match self.login.focus {
            LoginField::Username => self.login.username.pop(),
            LoginField::Password => self.login.password.pop(),
        };
    }

    pub fn login_toggle_field(&mut self) {
        self.login.focus = match self.login.focus {
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Username,
        };
    }

    pub fn submit_login(&mut self) {
        let command = Command::Login {
            username: self.login.username.clone(),
            password: self.login.password.clone(),
        };
        if self.run(command).is_some() {
            self.login = LoginForm::default();
            self.menu_cursor = 0;
            self.admin = AdminView::default();
        }
    }

    pub fn submit_register(&mut self) {
        let command = Command::Register {
            username: self.login.username.clone(),
            password: self.login.password.clone(),
        };
        if let Some(Notice::Registered { username }) = self.run(command) {
            self.show_info("Registered", vec![format!("User {} registered", username)]);
        }
    }

    // Menu

    pub fn menu_next(&mut self) {
        let len = self.controller.categories().len();
        if len > 0 {
            self.menu_cursor = (self.menu_cursor + 1) % len;
        }
    }

    pub fn menu_previous(&mut self) {
        let len = self.controller.categories().len();
        if len > 0 {
            self.menu_cursor = (self.menu_cursor + len - 1) % len;
        }
    }

    pub fn start_selected_quiz(&mut self) {
        let Some(category) = self.controller.categories().into_iter().nth(self.menu_cursor)
        else {
            self.show_error(&QuizError::InvalidInput("select a category".into()));
            return;
        };
        if self.run(Command::SelectCategory(category)).is_none() {
            return;
        }
        if self.run(Command::StartQuiz).is_some() {
            self.quiz_cursor = 0;
        }
    }

    pub fn open_admin(&mut self) {
        if self.run(Command::OpenAdmin).is_some() {
            self.admin = AdminView::default();
        }
    }

    pub fn open_menu(&mut self) {
        if self.run(Command::OpenMenu).is_some() {
            self.menu_cursor = 0;
        }
    }

    pub fn logout(&mut self) {
        self.run(Command::Logout);
    }

    // Quiz

    pub fn select_next_option(&mut self) {
        self.quiz_cursor = (self.quiz_cursor + 1) % NUM_OPTIONS;
        self.run(Command::SelectOption(self.quiz_cursor));
    }

    pub fn select_previous_option(&mut self) {
        self.quiz_cursor = (self.quiz_cursor + NUM_OPTIONS - 1) % NUM_OPTIONS;
        self.run(Command::SelectOption(self.quiz_cursor));
    }

    pub fn select_option(&mut self, index: usize) {
        if self.run(Command::SelectOption(index)).is_some() {
            self.quiz_cursor = index;
        }
    }

    pub fn submit_answer(&mut self) {
        if let Some(Notice::Answered {
            correct,
            correct_option,
            progress,
        }) = self.run(Command::SubmitAnswer)
        {
            let mut lines = vec![match (correct, correct_option) {
                (true, _) => "Correct answer".to_string(),
                (false, Some(text)) => format!("Wrong. Correct answer: {}", text),
                (false, None) => "Wrong".to_string(),
            }];
            lines.extend(self.finish_lines(progress));
            let title = if correct { "Correct" } else { "Wrong" };
            self.show_info(title, lines);
            self.quiz_cursor = 0;
        }
    }

    pub fn skip_question(&mut self) {
        if let Some(Notice::Skipped(progress)) = self.run(Command::Skip) {
            let lines = self.finish_lines(progress);
            if !lines.is_empty() {
                self.show_info("Quiz Finished", lines);
            }
            self.quiz_cursor = 0;
        }
    }

    pub fn confirm_abort(&mut self) {
        self.popup = Some(Popup::Confirm {
            prompt: "End quiz and return to menu?".to_string(),
            action: ConfirmAction::AbortQuiz,
        });
    }

    pub fn on_tick(&mut self, token: TickToken) {
        if let Some(Notice::TimeExpired(progress)) = self.run(Command::Tick(token)) {
            let mut lines = vec!["Time's up for this question".to_string()];
            lines.extend(self.finish_lines(progress));
            self.show_info("Time up", lines);
            self.quiz_cursor = 0;
        }
    }

    // Admin

    pub fn admin_toggle_pane(&mut self) {
        self.admin.pane = match self.admin.pane {
            AdminPane::Categories => AdminPane::Questions,
            AdminPane::Questions => AdminPane::Categories,
        };
    }

    pub fn admin_move(&mut self, forward: bool) {
        let (cursor, len) = match self.admin.pane {
            AdminPane::Categories => (
                &mut self.admin.category_cursor,
                self.controller.categories().len(),
            ),
            AdminPane::Questions => {
                let len = self.admin_questions().len();
                (&mut self.admin.question_cursor, len)
            }
        };
        if len == 0 {
            *cursor = 0;
            return;
        }
        *cursor = if forward {
            (*cursor + 1) % len
        } else {
            (*cursor + len - 1) % len
        };
        if self.admin.pane == AdminPane::Categories {
            self.admin.question_cursor = 0;
        }
    }

    pub fn prompt_add_category(&mut self) {
        self.popup = Some(Popup::Input {
            title: "New category name".to_string(),
            value: String::new(),
            action: InputAction::AddCategory,
        });
    }

    pub fn prompt_import(&mut self) {
        self.popup = Some(Popup::Input {
            title: "Path of JSON file to import".to_string(),
            value: String::new(),
            action: InputAction::Import,
        });
    }

    pub fn prompt_delete(&mut self) {
        let Some(category) = self.admin_category() else {
            self.show_error(&QuizError::InvalidInput("select a category".into()));
            return;
        };
        let action = match self.admin.pane {
            AdminPane::Categories => {
                self.popup = Some(Popup::Confirm {
                    prompt: format!("Delete category '{}' and all its questions?", category),
                    action: ConfirmAction::DeleteCategory(category),
                });
                return;
            }
            AdminPane::Questions => ConfirmAction::DeleteQuestion {
                category,
                index: self.admin.question_cursor,
            },
        };
        if self.admin_questions().is_empty() {
            self.show_error(&QuizError::InvalidInput("select a question".into()));
            return;
        }
        self.popup = Some(Popup::Confirm {
            prompt: "Delete selected question?".to_string(),
            action,
        });
    }

    pub fn prompt_add_question(&mut self) {
        let Some(category) = self.admin_category() else {
            self.show_error(&QuizError::InvalidInput("select a category".into()));
            return;
        };
        self.popup = Some(Popup::QuestionForm(QuestionForm {
            category,
            fields: Default::default(),
            focus: 0,
            error: None,
        }));
    }

    pub fn show_results(&mut self) {
        match self.controller.results() {
            Ok(lines) if lines.is_empty() => {
                self.show_info("Results", vec!["No results yet".to_string()]);
            }
            Ok(lines) => self.popup = Some(Popup::Results { lines, scroll: 0 }),
            Err(err) => self.show_error(&err),
        }
    }

    /// Carry out a confirmed action.
    pub fn confirm(&mut self, action: ConfirmAction) {
        self.popup = None;
        match action {
            ConfirmAction::AbortQuiz => {
                self.run(Command::AbortQuiz);
            }
            ConfirmAction::DeleteCategory(name) => {
                if self.run(Command::DeleteCategory(name)).is_some() {
                    self.admin.category_cursor = 0;
                    self.admin.question_cursor = 0;
                }
            }
            ConfirmAction::DeleteQuestion { category, index } => {
                if self
                    .run(Command::DeleteQuestion { category, index })
                    .is_some()
                {
                    self.admin.question_cursor = self.admin.question_cursor.saturating_sub(1);
                }
            }
        }
    }

    /// Apply a submitted single-line input popup.
    pub fn submit_input(&mut self, action: InputAction, value: String) {
        self.popup = None;
        match action {
            InputAction::AddCategory => {
                self.run(Command::AddCategory(value));
            }
            InputAction::Import => {
                let path = PathBuf::from(value.trim());
                if let Some(Notice::Imported(report)) = self.run(Command::ImportFile(path)) {
                    let mut lines = vec![
                        format!("Questions imported: {}", report.added),
                        format!("New categories: {}", report.created_categories.len()),
                    ];
                    if !report.skipped.is_empty() {
                        lines.push(format!("Skipped entries: {}", report.skipped.len()));
                        lines.extend(report.skipped.iter().map(|s| {
                            format!("  {} #{}: {}", s.category, s.position, s.reason)
                        }));
                    }
                    self.show_info("Imported", lines);
                }
            }
        }
    }

    /// Validate the add-question form and store the question. The form stays
    /// open with an error message if validation fails.
    pub fn submit_question_form(&mut self, mut form: QuestionForm) {
        let answer = match form.fields[5].trim().parse::<usize>() {
            Ok(n) if (1..=NUM_OPTIONS).contains(&n) => n - 1,
            _ => {
                form.error = Some("Answer must be 1-4".to_string());
                self.popup = Some(Popup::QuestionForm(form));
                return;
            }
        };

        let question = match Question::new(form.fields[0].clone(), form.fields[1..5].to_vec(), answer)
        {
            Ok(q) => q,
            Err(err) => {
                form.error = Some(err.to_string());
                self.popup = Some(Popup::QuestionForm(form));
                return;
            }
        };

        self.popup = None;
        self.run(Command::AddQuestion {
            category: form.category,
            question,
        });
    }
}

impl App {
    /// Closing lines for a finished quiz: the score, and a warning if the
    /// result could not be saved.
    fn finish_lines(&mut self, progress: Progress) -> Vec<String> {
        let Progress::Finished { score, total } = progress else {
            return Vec::new();
        };
        let mut lines = vec![format!("Score: {}/{}", score, total)];
        if let Some(reason) = self.unsaved_result.take() {
            lines.push(format!("Result not saved: {}", reason));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn app(dir: &std::path::Path) -> App {
        App::new(Controller::open(&Config::new(dir)).unwrap())
    }

    fn type_login(app: &mut App, user: &str, pass: &str) {
        for c in user.chars() {
            app.login_push(c);
        }
        app.login_toggle_field();
        for c in pass.chars() {
            app.login_push(c);
        }
    }

    #[test]
    fn test_login_clears_form() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());
        type_login(&mut app, "admin", "admin");
        app.submit_login();
        assert_eq!(app.screen(), Screen::Admin);
        assert!(app.login.username.is_empty());
        assert!(app.popup.is_none());
    }

    #[test]
    fn test_bad_login_shows_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());
        type_login(&mut app, "admin", "nope");
        app.submit_login();
        assert_eq!(app.screen(), Screen::Login);
        assert!(matches!(
            app.popup,
            Some(Popup::Message {
                kind: MessageKind::Error,
                ..
            })
        ));
    }

    fn start_seed_quiz(app: &mut App) {
        type_login(app, "admin", "admin");
        app.submit_login();
        app.open_menu();
        app.start_selected_quiz();
        assert_eq!(app.screen(), Screen::Quiz);
    }

    #[test]
    fn test_feedback_popup_pauses_countdown() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());
        start_seed_quiz(&mut app);
        assert!(app.countdown_token().is_some());

        app.select_option(0);
        app.submit_answer();
        assert!(matches!(
            app.popup,
            Some(Popup::Message {
                kind: MessageKind::Info,
                ..
            })
        ));
        assert!(app.countdown_token().is_none());

        app.close_popup();
        assert!(app.countdown_token().is_some());
        assert_eq!(app.controller().session().unwrap().current_index(), 1);
    }

    #[test]
    fn test_error_and_confirm_popups_keep_countdown_running() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());
        start_seed_quiz(&mut app);

        app.submit_answer();
        assert!(matches!(
            app.popup,
            Some(Popup::Message {
                kind: MessageKind::Error,
                ..
            })
        ));
        let token = app.countdown_token().unwrap();
        app.on_tick(token);
        assert_eq!(
            app.controller().session().unwrap().remaining_seconds(),
            crate::session::DEFAULT_TIME_LIMIT - 1
        );

        app.close_popup();
        app.confirm_abort();
        assert!(app.countdown_token().is_some());
        app.confirm(ConfirmAction::AbortQuiz);
        assert_eq!(app.screen(), Screen::Menu);
    }

    #[test]
    fn test_unsaved_result_still_shows_answer_feedback() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the result log should be makes every append fail.
        std::fs::create_dir(dir.path().join("results.txt")).unwrap();
        let mut app = app(dir.path());
        start_seed_quiz(&mut app);

        app.skip_question();
        app.close_popup();
        app.skip_question();
        app.close_popup();
        let answer = app
            .controller()
            .session()
            .unwrap()
            .current_question()
            .unwrap()
            .correct_index();
        app.select_option(answer);
        app.submit_answer();

        assert_eq!(app.screen(), Screen::Menu);
        let Some(Popup::Message { kind, lines, .. }) = &app.popup else {
            panic!("expected feedback popup");
        };
        assert_eq!(*kind, MessageKind::Info);
        assert_eq!(lines[0], "Correct answer");
        assert_eq!(lines[1], "Score: 1/3");
        assert!(lines[2].starts_with("Result not saved"));
    }

    #[test]
    fn test_question_form_validation() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());
        type_login(&mut app, "admin", "admin");
        app.submit_login();
        app.prompt_add_question();

        let Some(Popup::QuestionForm(mut form)) = app.popup.clone() else {
            panic!("expected question form");
        };
        form.fields = [
            "2+2?".into(),
            "3".into(),
            "4".into(),
            "5".into(),
            "6".into(),
            "9".into(),
        ];
        app.submit_question_form(form.clone());
        assert!(matches!(
            &app.popup,
            Some(Popup::QuestionForm(QuestionForm { error: Some(_), .. }))
        ));

        form.fields[5] = "2".into();
        app.submit_question_form(form);
        assert!(app.popup.is_none());
        let last = app.admin_questions().last().unwrap();
        assert_eq!(last.text(), "2+2?");
        assert_eq!(last.correct_option(), "4");
    }
}
