//! Append-only log of finished attempts.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::error::{QuizError, Result};
use crate::models::AttemptRecord;

/// Plain-text result log, one attempt per line.
#[derive(Debug)]
pub struct ResultLog {
    path: PathBuf,
}

impl ResultLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record and flush it to disk.
    pub fn append(&self, record: &AttemptRecord) -> Result<()> {
        let write = || -> io::Result<()> {
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)?;
            writeln!(file, "{}", record)?;
            file.sync_data()
        };

        write().map_err(|err| {
            error!(path = %self.path.display(), %err, "failed to append result");
            QuizError::io(&self.path, err)
        })?;

        info!(
            username = %record.username,
            category = %record.category,
            score = record.score,
            total = record.total,
            "result recorded"
        );
        Ok(())
    }

    /// All logged lines in order. A log that does not exist yet is empty.
    pub fn read_all(&self) -> Result<Vec<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(content
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(str::to_string)
                .collect()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(QuizError::io(&self.path, err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_log_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let log = ResultLog::new(dir.path().join("results.txt"));
        assert!(log.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_append_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        let log = ResultLog::new(dir.path().join("results.txt"));
        log.append(&AttemptRecord::now("alice", "Math", 1, 1)).unwrap();
        log.append(&AttemptRecord::now("bob", "Math", 0, 2)).unwrap();

        let lines = log.read_all().unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("| alice | Math | 1/1"));
        assert!(lines[1].ends_with("| bob | Math | 0/2"));
    }

    #[test]
    fn test_append_failure_is_io() {
        let dir = tempfile::tempdir().unwrap();
        let log = ResultLog::new(dir.path().join("missing-dir").join("results.txt"));
        let err = log
            .append(&AttemptRecord::now("alice", "Math", 1, 1))
            .unwrap_err();
        assert!(matches!(err, QuizError::Io { .. }));
    }
}
