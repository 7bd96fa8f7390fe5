use super::DocumentStore;
use crate::error::{BoardError, Result};
use crate::model::AppDocument;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

pub const DOCUMENT_FILENAME: &str = "board.json";

/// A board document kept in a single JSON file.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<dir>/board.json`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(DOCUMENT_FILENAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_parent(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(BoardError::Io)?;
            }
        }
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| DOCUMENT_FILENAME.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl DocumentStore for FileStore {
    fn load(&self) -> Result<Option<AppDocument>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path).map_err(BoardError::Io)?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        let value: Value = serde_json::from_str(&content).map_err(BoardError::Serialization)?;
        match &value {
            Value::Null => return Ok(None),
            Value::Object(map) if map.is_empty() => return Ok(None),
            Value::Object(_) => {}
            _ => {
                return Err(BoardError::Store(format!(
                    "{} does not hold a board document",
                    self.path.display()
                )))
            }
        }

        let doc: AppDocument = serde_json::from_value(value).map_err(BoardError::Serialization)?;
        Ok(Some(doc))
    }

    fn save(&mut self, doc: &AppDocument) -> Result<()> {
        self.ensure_parent()?;
        let content = serde_json::to_string_pretty(doc).map_err(BoardError::Serialization)?;

        // A crash mid-write must not leave a truncated board behind
        let temp = self.temp_path();
        fs::write(&temp, content).map_err(BoardError::Io)?;
        fs::rename(&temp, &self.path).map_err(BoardError::Io)?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Card, CardType};

    #[test]
    fn missing_file_loads_as_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::in_dir(dir.path());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn save_creates_parent_dirs_and_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::in_dir(dir.path().join("nested").join("cache"));

        let mut doc = AppDocument::new();
        doc.pool.push(Card::new(CardType::Post));
        doc.notes = "hello".into();
        store.save(&doc).unwrap();

        assert_eq!(store.load().unwrap(), Some(doc));
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn empty_object_and_blank_file_load_as_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::in_dir(dir.path());

        fs::write(store.path(), "   ").unwrap();
        assert!(store.load().unwrap().is_none());

        fs::write(store.path(), "{}").unwrap();
        assert!(store.load().unwrap().is_none());

        fs::write(store.path(), "null").unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn non_object_document_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::in_dir(dir.path());

        fs::write(store.path(), "[1, 2, 3]").unwrap();
        assert!(matches!(store.load(), Err(BoardError::Store(_))));

        fs::write(store.path(), "{ not json").unwrap();
        assert!(matches!(store.load(), Err(BoardError::Serialization(_))));
    }
}
