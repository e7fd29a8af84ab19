use std::fmt;

use chrono::{DateTime, Local};

/// One finished quiz attempt. Written to the result log as a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptRecord {
    pub timestamp: DateTime<Local>,
    pub username: String,
    pub category: String,
    pub score: usize,
    pub total: usize,
}

impl AttemptRecord {
    /// Record an attempt at the current local time. `score` is clamped to
    /// `total`.
    pub fn now(
        username: impl Into<String>,
        category: impl Into<String>,
        score: usize,
        total: usize,
    ) -> Self {
        Self {
            timestamp: Local::now(),
            username: username.into(),
            category: category.into(),
            score: score.min(total),
            total,
        }
    }
}

impl fmt::Display for AttemptRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} | {} | {}/{}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S%.6f"),
            self.username,
            self.category,
            self.score,
            self.total
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_format() {
        let record = AttemptRecord::now("alice", "Math", 1, 1);
        let line = record.to_string();
        assert!(line.ends_with(" | alice | Math | 1/1"));
        assert!(!line.contains('\n'));
    }

    #[test]
    fn test_score_clamped() {
        let record = AttemptRecord::now("bob", "Math", 5, 3);
        assert_eq!(record.score, 3);
    }
}
