//! Durable question bank: category name to an ordered list of questions.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{info, warn};

use crate::data::loader::{load_json, save_json_atomic};
use crate::error::{QuizError, Result};
use crate::models::Question;

type Bank = BTreeMap<String, Vec<Question>>;
type RawBank = BTreeMap<String, Vec<Value>>;

/// A question entry that was left out of an import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub category: String,
    /// 1-based position of the entry inside its category in the import file.
    pub position: usize,
    pub reason: String,
}

/// Outcome of [`ContentStore::import_merge`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Number of questions appended.
    pub added: usize,
    /// Categories that did not exist before the import.
    pub created_categories: Vec<String>,
    /// Entries rejected by validation.
    pub skipped: Vec<SkippedEntry>,
}

/// The question bank, persisted as a single JSON file.
///
/// Every mutator writes the whole bank before returning `Ok`. If the write
/// fails the in-memory bank is left as it was.
#[derive(Debug)]
pub struct ContentStore {
    path: PathBuf,
    categories: Bank,
    skipped_on_load: Vec<SkippedEntry>,
}

impl ContentStore {
    /// Open the bank at `path`, creating it with the seed category if the
    /// file does not exist yet.
    ///
    /// Entries that fail validation are left out of the loaded bank and
    /// listed by [`skipped_on_load`](Self::skipped_on_load). The file keeps
    /// them until the next write.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let (categories, skipped_on_load) = match load_json::<RawBank, _>(&path)? {
            Some(raw) => {
                let mut bank = Bank::new();
                let report = merge_entries(&mut bank, raw);
                if !report.skipped.is_empty() {
                    warn!(
                        path = %path.display(),
                        skipped = report.skipped.len(),
                        "question bank has invalid entries"
                    );
                }
                (bank, report.skipped)
            }
            None => {
                let bank = seed_bank();
                save_json_atomic(&path, &bank)?;
                info!(path = %path.display(), "created question bank with seed data");
                (bank, Vec::new())
            }
        };

        Ok(Self {
            path,
            categories,
            skipped_on_load,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Category names in alphabetical order.
    pub fn list_categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    /// Questions of `category` in insertion order, or `None` if the category
    /// does not exist.
    pub fn list_questions(&self, category: &str) -> Option<&[Question]> {
        self.categories.get(category).map(Vec::as_slice)
    }

    pub fn contains(&self, category: &str) -> bool {
        self.categories.contains_key(category)
    }

    /// Entries of the bank file that were left out when it was opened.
    pub fn skipped_on_load(&self) -> &[SkippedEntry] {
        &self.skipped_on_load
    }

    pub fn add_category(&mut self, name: &str) -> Result<()> {
        let name = category_name(name).map_err(|reason| QuizError::InvalidInput(reason.into()))?;
        if self.categories.contains_key(name) {
            return Err(QuizError::DuplicateCategory(name.to_string()));
        }

        let mut next = self.categories.clone();
        next.insert(name.to_string(), Vec::new());
        self.commit(next)?;

        info!(category = name, "category added");
        Ok(())
    }

    /// Remove a category and all of its questions.
    pub fn delete_category(&mut self, name: &str) -> Result<()> {
        if !self.categories.contains_key(name) {
            return Err(QuizError::NotFound(format!("category {}", name)));
        }

        let mut next = self.categories.clone();
        let removed = next.remove(name).map_or(0, |qs| qs.len());
        self.commit(next)?;

        info!(category = name, removed, "category deleted");
        Ok(())
    }

    /// Append a question to the end of `category`.
    pub fn add_question(&mut self, category: &str, question: Question) -> Result<()> {
        if !self.categories.contains_key(category) {
            return Err(QuizError::NotFound(format!("category {}", category)));
        }

        let mut next = self.categories.clone();
        next.entry(category.to_string()).or_default().push(question);
        self.commit(next)?;

        info!(category, "question added");
        Ok(())
    }

    /// Remove the question at `index` (0-based) and return it.
    pub fn delete_question(&mut self, category: &str, index: usize) -> Result<Question> {
        let Some(questions) = self.categories.get(category) else {
            return Err(QuizError::NotFound(format!("category {}", category)));
        };
        if index >= questions.len() {
            return Err(QuizError::OutOfRange {
                index,
                len: questions.len(),
            });
        }

        let mut next = self.categories.clone();
        let removed = next
            .get_mut(category)
            .map(|qs| qs.remove(index))
            .ok_or_else(|| QuizError::NotFound(format!("category {}", category)))?;
        self.commit(next)?;

        info!(category, index, "question deleted");
        Ok(removed)
    }

    /// Read a JSON file of `{ category: [question, ...] }` and merge it.
    pub fn import_file<P: AsRef<Path>>(&mut self, path: P) -> Result<ImportReport> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|err| QuizError::io(path, err))?;
        let external: RawBank =
            serde_json::from_str(&content).map_err(|err| QuizError::format(path, err))?;

        let report = self.import_merge(external)?;
        info!(
            source = %path.display(),
            added = report.added,
            skipped = report.skipped.len(),
            "import finished"
        );
        Ok(report)
    }

    /// Merge external categories into the bank.
    ///
    /// Existing categories get the new questions appended (no dedup); unknown
    /// categories are created. Entries that fail validation are skipped and
    /// reported. The merged bank is written once at the end.
    pub fn import_merge(&mut self, external: RawBank) -> Result<ImportReport> {
        let mut next = self.categories.clone();
        let report = merge_entries(&mut next, external);
        self.commit(next)?;
        Ok(report)
    }

    fn commit(&mut self, next: Bank) -> Result<()> {
        save_json_atomic(&self.path, &next)?;
        self.categories = next;
        Ok(())
    }
}

/// Trimmed category name, or the reason it cannot be used. A name ends up
/// inside `|`-separated result lines, so it must stay on one line and must
/// not contain the separator.
fn category_name(raw: &str) -> std::result::Result<&str, &'static str> {
    let name = raw.trim();
    if name.is_empty() {
        Err("category name must not be empty")
    } else if name.chars().any(char::is_control) {
        Err("category name must not contain control characters")
    } else if name.contains('|') {
        Err("category name must not contain '|'")
    } else {
        Ok(name)
    }
}

/// Validate raw `{ category: [entry, ...] }` data into `bank`, appending to
/// existing categories and skipping entries that do not validate.
fn merge_entries(bank: &mut Bank, external: RawBank) -> ImportReport {
    let mut report = ImportReport::default();

    for (raw_name, entries) in external {
        let name = match category_name(&raw_name) {
            Ok(name) => name,
            Err(reason) => {
                warn!(category = %raw_name.escape_debug(), reason, "skipping category");
                report
                    .skipped
                    .extend((1..=entries.len()).map(|position| SkippedEntry {
                        category: raw_name.clone(),
                        position,
                        reason: reason.to_string(),
                    }));
                continue;
            }
        };

        if !bank.contains_key(name) {
            report.created_categories.push(name.to_string());
        }
        let target = bank.entry(name.to_string()).or_default();

        for (i, entry) in entries.into_iter().enumerate() {
            match serde_json::from_value::<Question>(entry) {
                Ok(question) => {
                    target.push(question);
                    report.added += 1;
                }
                Err(err) => {
                    warn!(category = name, position = i + 1, %err, "skipping entry");
                    report.skipped.push(SkippedEntry {
                        category: name.to_string(),
                        position: i + 1,
                        reason: err.to_string(),
                    });
                }
            }
        }
    }

    report
}

fn seed_bank() -> Bank {
    let seed = [
        (
            "Which model is also known as the linear sequential model?",
            ["Waterfall Model", "Spiral Model", "RAD Model", "Prototype Model"],
            0,
        ),
        (
            "Requirement gathering is done in which phase?",
            ["Design", "Analysis", "Testing", "Deployment"],
            1,
        ),
        (
            "White-box testing is also called?",
            [
                "Behavioral Testing",
                "Structural Testing",
                "User Testing",
                "Black-box Testing",
            ],
            1,
        ),
    ];

    let questions = seed
        .into_iter()
        .filter_map(|(text, options, answer)| Question::new(text, options, answer).ok())
        .collect();

    let mut bank = Bank::new();
    bank.insert("Software Engineering".to_string(), questions);
    bank
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn question(text: &str) -> Question {
        Question::new(text, ["3", "4", "5", "6"], 1).unwrap()
    }

    fn open_empty(dir: &Path) -> ContentStore {
        let mut store = ContentStore::open(dir.join("questions.json")).unwrap();
        store.delete_category("Software Engineering").unwrap();
        store
    }

    #[test]
    fn test_first_open_seeds_bank() {
        let dir = tempfile::tempdir().unwrap();
        let store = ContentStore::open(dir.path().join("questions.json")).unwrap();
        let cats: Vec<_> = store.list_categories().collect();
        assert_eq!(cats, vec!["Software Engineering"]);
        assert_eq!(store.list_questions("Software Engineering").unwrap().len(), 3);
        assert!(dir.path().join("questions.json").exists());
    }

    #[test]
    fn test_add_question_appends_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_empty(dir.path());
        store.add_category("Math").unwrap();
        store.add_question("Math", question("1+1?")).unwrap();
        store.add_question("Math", question("2+2?")).unwrap();

        let qs = store.list_questions("Math").unwrap();
        assert_eq!(qs.last().unwrap(), &question("2+2?"));

        let reopened = ContentStore::open(store.path()).unwrap();
        assert_eq!(reopened.list_questions("Math").unwrap(), qs);
    }

    #[test]
    fn test_category_errors() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_empty(dir.path());
        store.add_category("Math").unwrap();

        assert!(matches!(
            store.add_category("Math"),
            Err(QuizError::DuplicateCategory(_))
        ));
        assert!(matches!(
            store.add_category("   "),
            Err(QuizError::InvalidInput(_))
        ));
        assert!(matches!(
            store.delete_category("Art"),
            Err(QuizError::NotFound(_))
        ));
        assert!(matches!(
            store.add_question("Art", question("q")),
            Err(QuizError::NotFound(_))
        ));
    }

    #[test]
    fn test_delete_category_removes_questions() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_empty(dir.path());
        store.add_category("Math").unwrap();
        store.add_question("Math", question("2+2?")).unwrap();

        store.delete_category("Math").unwrap();
        assert!(store.list_questions("Math").is_none());
        assert!(!store.contains("Math"));
    }

    #[test]
    fn test_delete_question() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_empty(dir.path());
        store.add_category("Math").unwrap();
        store.add_question("Math", question("a?")).unwrap();
        store.add_question("Math", question("b?")).unwrap();

        assert!(matches!(
            store.delete_question("Math", 2),
            Err(QuizError::OutOfRange { index: 2, len: 2 })
        ));
        let removed = store.delete_question("Math", 0).unwrap();
        assert_eq!(removed.text(), "a?");
        assert_eq!(store.list_questions("Math").unwrap()[0].text(), "b?");
    }

    #[test]
    fn test_failed_write_keeps_memory_state() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_empty(dir.path());
        // Point the store at a path whose parent is a regular file.
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "x").unwrap();
        store.path = blocker.join("questions.json");

        let err = store.add_category("Math").unwrap_err();
        assert!(matches!(err, QuizError::Io { .. }));
        assert!(!store.contains("Math"));
    }

    #[test]
    fn test_import_merges_and_skips_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_empty(dir.path());
        store.add_category("Math").unwrap();
        store.add_question("Math", question("1+1?")).unwrap();

        let external: RawBank = serde_json::from_value(json!({
            "Math": [
                {"question": "3+3?", "options": ["5", "6", "7", "8"], "answer": 1},
                {"question": "", "options": ["a", "b", "c", "d"], "answer": 0}
            ],
            "History": [
                {"question": "Year?", "options": ["1066", "1492", "1776", "1914"], "answer": 0},
                {"question": "Bad", "options": ["a", "b"], "answer": 0}
            ]
        }))
        .unwrap();

        let report = store.import_merge(external).unwrap();
        assert_eq!(report.added, 2);
        assert_eq!(report.created_categories, vec!["History".to_string()]);
        assert_eq!(report.skipped.len(), 2);
        assert_eq!(report.skipped[0].category, "History");
        assert_eq!(report.skipped[0].position, 2);

        let math = store.list_questions("Math").unwrap();
        assert_eq!(math.len(), 2);
        assert_eq!(math[1].text(), "3+3?");
        assert_eq!(store.list_questions("History").unwrap().len(), 1);
    }

    #[test]
    fn test_import_file_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_empty(dir.path());
        let path = dir.path().join("import.json");
        fs::write(&path, r#"["not", "a", "mapping"]"#).unwrap();

        assert!(matches!(
            store.import_file(&path),
            Err(QuizError::Format { .. })
        ));
        assert!(matches!(
            store.import_file(dir.path().join("missing.json")),
            Err(QuizError::Io { .. })
        ));
        assert_eq!(store.list_categories().count(), 0);
    }

    #[test]
    fn test_category_names_stay_on_one_line() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_empty(dir.path());

        assert!(matches!(
            store.add_category("Math\nScience"),
            Err(QuizError::InvalidInput(_))
        ));
        assert!(matches!(
            store.add_category("Math | Science"),
            Err(QuizError::InvalidInput(_))
        ));

        let external: RawBank = serde_json::from_value(json!({
            "Geo\ngraphy": [
                {"question": "Capital of Peru?", "options": ["Lima", "Quito", "La Paz", "Bogota"], "answer": 0}
            ],
            "Art": [
                {"question": "Painter of Guernica?", "options": ["Dali", "Miro", "Picasso", "Goya"], "answer": 2}
            ]
        }))
        .unwrap();
        let report = store.import_merge(external).unwrap();
        assert_eq!(report.added, 1);
        assert_eq!(report.created_categories, vec!["Art".to_string()]);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].category, "Geo\ngraphy");
        let cats: Vec<_> = store.list_categories().collect();
        assert_eq!(cats, vec!["Art"]);
    }

    #[test]
    fn test_open_skips_invalid_entries_in_bank_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("questions.json");
        fs::write(
            &path,
            r#"{
                "Math": [
                    {"question": "2+2?", "options": ["3", "4", "5", "6"], "answer": 1},
                    {"question": "Three options", "options": ["a", "b", "c"], "answer": 0},
                    {"question": "Twins", "options": ["a", "a", "b", "c"], "answer": 0}
                ]
            }"#,
        )
        .unwrap();

        let store = ContentStore::open(&path).unwrap();
        let math = store.list_questions("Math").unwrap();
        assert_eq!(math.len(), 1);
        assert_eq!(math[0].text(), "2+2?");
        let positions: Vec<_> = store.skipped_on_load().iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![2, 3]);
    }

    #[test]
    fn test_open_rejects_malformed_bank_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("questions.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            ContentStore::open(&path),
            Err(QuizError::Format { .. })
        ));
    }
}
