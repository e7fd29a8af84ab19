mod attempt;
mod question;

use std::fmt;

pub use attempt::AttemptRecord;
pub use question::{NUM_OPTIONS, Question};

/// Screens the navigation controller can have active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Login,
    Menu,
    Quiz,
    Admin,
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Screen::Login => "Login",
            Screen::Menu => "Menu",
            Screen::Quiz => "Quiz",
            Screen::Admin => "Admin",
        };
        f.write_str(name)
    }
}

/// Which screen is active and who is logged in.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NavState {
    pub screen: Screen,
    pub current_user: Option<String>,
}
