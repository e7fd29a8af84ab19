use serde::{Deserialize, Serialize};

use crate::error::{QuizError, Result};

/// Number of answer options every question carries.
pub const NUM_OPTIONS: usize = 4;

/// A multiple-choice question with exactly four distinct options.
///
/// Instances can only be built through [`Question::new`] (or deserialized,
/// which runs the same checks), so `correct_index` always points at an
/// existing option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawQuestion", into = "RawQuestion")]
pub struct Question {
    text: String,
    options: [String; NUM_OPTIONS],
    correct_index: usize,
}

/// On-disk shape of a question.
#[derive(Serialize, Deserialize)]
struct RawQuestion {
    question: String,
    options: Vec<String>,
    answer: usize,
}

impl Question {
    /// Validate and build a question. Text and options are trimmed.
    pub fn new<S: Into<String>>(
        text: impl Into<String>,
        options: impl IntoIterator<Item = S>,
        correct_index: usize,
    ) -> Result<Self> {
        let text = text.into().trim().to_string();
        if text.is_empty() {
            return Err(QuizError::InvalidQuestion("question text is empty".into()));
        }

        let options: Vec<String> = options
            .into_iter()
            .map(|o| o.into().trim().to_string())
            .collect();
        if options.len() != NUM_OPTIONS {
            return Err(QuizError::InvalidQuestion(format!(
                "expected {} options, got {}",
                NUM_OPTIONS,
                options.len()
            )));
        }
        if let Some(pos) = options.iter().position(|o| o.is_empty()) {
            return Err(QuizError::InvalidQuestion(format!(
                "option {} is empty",
                pos + 1
            )));
        }
        for (i, option) in options.iter().enumerate() {
            if options[..i].contains(option) {
                return Err(QuizError::InvalidQuestion(format!(
                    "option {} duplicates another option",
                    i + 1
                )));
            }
        }
        if correct_index >= NUM_OPTIONS {
            return Err(QuizError::InvalidQuestion(format!(
                "answer index {} is not in 0..{}",
                correct_index, NUM_OPTIONS
            )));
        }

        let options: [String; NUM_OPTIONS] = options
            .try_into()
            .map_err(|_| QuizError::InvalidQuestion("option count changed".into()))?;

        Ok(Self {
            text,
            options,
            correct_index,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn options(&self) -> &[String; NUM_OPTIONS] {
        &self.options
    }

    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    /// Text of the correct option.
    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_index]
    }

    /// One-line summary used by the admin listing.
    pub fn summary(&self) -> String {
        format!(
            "{}  [{}]  (Ans: {})",
            self.text,
            self.options.join(" | "),
            self.correct_index + 1
        )
    }
}

impl TryFrom<RawQuestion> for Question {
    type Error = QuizError;

    fn try_from(raw: RawQuestion) -> Result<Self> {
        Question::new(raw.question, raw.options, raw.answer)
    }
}

impl From<Question> for RawQuestion {
    fn from(q: Question) -> Self {
        RawQuestion {
            question: q.text,
            options: q.options.into(),
            answer: q.correct_index,
        }
    }
}
