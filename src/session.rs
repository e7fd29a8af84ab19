//! One quiz attempt: question order, countdown and scoring.
//!
//! The session itself never touches a clock. It hands out a [`TickToken`]
//! describing the countdown step it is waiting for, and [`QuizSession::tick`]
//! only acts on the token it handed out last. A tick scheduled for an earlier
//! question (or an earlier session) is ignored.

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{QuizError, Result};
use crate::models::{NUM_OPTIONS, Question};

/// Seconds allowed per question unless configured otherwise.
pub const DEFAULT_TIME_LIMIT: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    NotStarted,
    InProgress,
    /// Terminal. Score and total no longer change.
    Finished,
}

/// Identifies one pending countdown step of one question of one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickToken {
    session: Uuid,
    question: usize,
    remaining: u32,
}

/// Where the session went after leaving a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// Now showing the question at this 0-based index.
    Next { index: usize },
    /// All questions done. The caller records the attempt.
    Finished { score: usize, total: usize },
}

/// Result of [`QuizSession::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub correct: bool,
    /// Text of the correct option, present only when the answer was wrong.
    pub correct_option: Option<String>,
    pub progress: Progress,
}

/// Result of [`QuizSession::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The token does not belong to the current countdown step.
    Stale,
    /// One second elapsed; this many remain.
    Counting { remaining: u32 },
    /// Time ran out; the question was skipped.
    Expired(Progress),
}

#[derive(Debug, Clone)]
pub struct QuizSession {
    id: Uuid,
    status: SessionStatus,
    time_limit: u32,
    category: String,
    question_order: Vec<Question>,
    current_index: usize,
    score: usize,
    selected_option: Option<usize>,
    remaining_seconds: u32,
}

impl QuizSession {
    /// A session that has not started yet. `time_limit` is clamped to at
    /// least one second.
    pub fn new(time_limit: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            status: SessionStatus::NotStarted,
            time_limit: time_limit.max(1),
            category: String::new(),
            question_order: Vec::new(),
            current_index: 0,
            score: 0,
            selected_option: None,
            remaining_seconds: 0,
        }
    }

    /// Start on a snapshot of `questions` in a random order.
    pub fn start(&mut self, category: &str, questions: &[Question]) -> Result<()> {
        self.start_with_rng(category, questions, &mut rand::thread_rng())
    }

    /// Same as [`start`](Self::start) with a caller-supplied random source.
    pub fn start_with_rng<R: Rng + ?Sized>(
        &mut self,
        category: &str,
        questions: &[Question],
        rng: &mut R,
    ) -> Result<()> {
        if self.status != SessionStatus::NotStarted {
            return Err(QuizError::InvalidInput("quiz already started".into()));
        }
        if questions.is_empty() {
            return Err(QuizError::EmptyCategory(category.to_string()));
        }

        let mut order = questions.to_vec();
        order.shuffle(rng);

        self.id = Uuid::new_v4();
        self.category = category.to_string();
        self.question_order = order;
        self.current_index = 0;
        self.score = 0;
        self.status = SessionStatus::InProgress;
        self.load_question();

        info!(
            session = %self.id,
            category,
            total = self.question_order.len(),
            "quiz started"
        );
        Ok(())
    }

    /// Record which option the user intends to submit.
    pub fn select_option(&mut self, index: usize) -> Result<()> {
        self.ensure_in_progress()?;
        if index >= NUM_OPTIONS {
            return Err(QuizError::InvalidOption(index));
        }
        self.selected_option = Some(index);
        Ok(())
    }

    /// Score the selected option and move on.
    pub fn submit(&mut self) -> Result<AnswerOutcome> {
        self.ensure_in_progress()?;
        let selected = self.selected_option.ok_or(QuizError::NoSelection)?;
        let question = self
            .current_question()
            .ok_or(QuizError::SessionInactive)?;

        let correct = selected == question.correct_index();
        let correct_option = (!correct).then(|| question.correct_option().to_string());
        if correct {
            self.score += 1;
        }
        debug!(session = %self.id, question = self.current_index, correct, "answer submitted");

        let progress = self.advance();
        Ok(AnswerOutcome {
            correct,
            correct_option,
            progress,
        })
    }

    /// Skip the current question without scoring it.
    pub fn next(&mut self) -> Result<Progress> {
        self.ensure_in_progress()?;
        Ok(self.advance())
    }

    /// Apply one countdown step. Only the token from
    /// [`countdown_token`](Self::countdown_token) is honoured.
    pub fn tick(&mut self, token: TickToken) -> TickOutcome {
        if self.countdown_token() != Some(token) {
            return TickOutcome::Stale;
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds > 0 {
            return TickOutcome::Counting {
                remaining: self.remaining_seconds,
            };
        }

        info!(session = %self.id, question = self.current_index, "time expired");
        TickOutcome::Expired(self.advance())
    }

    /// Throw the attempt away without scoring it.
    pub fn abort(&mut self) -> Result<()> {
        self.ensure_in_progress()?;
        info!(session = %self.id, category = %self.category, "quiz aborted");
        *self = Self::new(self.time_limit);
        Ok(())
    }

    /// The countdown step currently awaited, if a question is open.
    pub fn countdown_token(&self) -> Option<TickToken> {
        (self.status == SessionStatus::InProgress).then_some(TickToken {
            session: self.id,
            question: self.current_index,
            remaining: self.remaining_seconds,
        })
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn question_order(&self) -> &[Question] {
        &self.question_order
    }

    pub fn current_question(&self) -> Option<&Question> {
        match self.status {
            SessionStatus::InProgress => self.question_order.get(self.current_index),
            _ => None,
        }
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn total(&self) -> usize {
        self.question_order.len()
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn selected_option(&self) -> Option<usize> {
        self.selected_option
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn time_limit(&self) -> u32 {
        self.time_limit
    }

    fn ensure_in_progress(&self) -> Result<()> {
        match self.status {
            SessionStatus::InProgress => Ok(()),
            _ => Err(QuizError::SessionInactive),
        }
    }

    fn load_question(&mut self) {
        self.selected_option = None;
        self.remaining_seconds = self.time_limit;
    }

    fn advance(&mut self) -> Progress {
        self.current_index += 1;

        if self.current_index >= self.question_order.len() {
            self.status = SessionStatus::Finished;
            self.selected_option = None;
            self.remaining_seconds = 0;
            info!(
                session = %self.id,
                score = self.score,
                total = self.total(),
                "quiz finished"
            );
            Progress::Finished {
                score: self.score,
                total: self.total(),
            }
        } else {
            self.load_question();
            Progress::Next {
                index: self.current_index,
            }
        }
    }
}
