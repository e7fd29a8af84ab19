use std::path::{Path, PathBuf};

use crate::session::DEFAULT_TIME_LIMIT;

const QUESTIONS_FILE: &str = "questions.json";
const USERS_FILE: &str = "users.json";
const RESULTS_FILE: &str = "results.txt";
const LOG_FILE: &str = "quizdesk.log";

/// Where the durable resources live and how long each question may take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub time_limit: u32,
}

impl Config {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            time_limit: DEFAULT_TIME_LIMIT,
        }
    }

    pub fn with_time_limit(mut self, seconds: u32) -> Self {
        self.time_limit = seconds.max(1);
        self
    }

    pub fn questions_path(&self) -> PathBuf {
        self.data_dir.join(QUESTIONS_FILE)
    }

    pub fn users_path(&self) -> PathBuf {
        self.data_dir.join(USERS_FILE)
    }

    pub fn results_path(&self) -> PathBuf {
        self.data_dir.join(RESULTS_FILE)
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_and_limit() {
        let config = Config::new("/tmp/quiz").with_time_limit(0);
        assert_eq!(config.time_limit, 1);
        assert_eq!(config.users_path(), PathBuf::from("/tmp/quiz/users.json"));
        assert_eq!(
            config.results_path(),
            PathBuf::from("/tmp/quiz/results.txt")
        );
        assert_eq!(Config::default().time_limit, DEFAULT_TIME_LIMIT);
    }
}
