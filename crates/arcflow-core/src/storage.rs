//! JSON persistence for the board.
//!
//! The file is read whole at start-up and rewritten whole on save. Saves go
//! through a temporary file in the same directory that is renamed over the
//! target, so a crash never leaves a half-written board behind.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::model::Board;

const INDENT: &[u8] = b"    ";

#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the board. A missing file is an empty board.
    pub fn load(&self) -> Result<Board> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no storage file yet, starting empty");
                return Ok(Board::new());
            }
            Err(source) => return Err(self.io_error(source)),
        };

        let board: Board =
            serde_json::from_str(&contents).map_err(|source| Error::StoreCorrupt {
                path: self.path.clone(),
                source,
            })?;
        debug!(groups = board.groups().len(), "board loaded");
        Ok(board)
    }

    /// Replaces the stored board with `board`, creating the directory if needed.
    pub fn save(&self, board: &Board) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|source| Error::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut file = NamedTempFile::new_in(dir).map_err(|source| Error::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        write_board(&mut file, board).map_err(|source| self.io_error(source))?;
        // Keep whatever mode the user gave the existing file.
        if let Ok(meta) = fs::metadata(&self.path) {
            file.as_file()
                .set_permissions(meta.permissions())
                .map_err(|source| self.io_error(source))?;
        }
        file.persist(&self.path).map_err(|err| self.io_error(err.error))?;

        info!(path = %self.path.display(), groups = board.groups().len(), "board saved");
        Ok(())
    }

    fn io_error(&self, source: io::Error) -> Error {
        Error::Io {
            path: self.path.clone(),
            source,
        }
    }
}

fn write_board<W: Write>(mut writer: W, board: &Board) -> io::Result<()> {
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(INDENT));
    board.serialize(&mut serializer)?;
    writer.write_all(b"\n")?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Status;
    use chrono::NaiveDate;

    fn populated() -> Board {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let mut board = Board::new();
        board
            .create_group("Home", "Buy milk", &["2 liters".to_string()], today)
            .unwrap();
        board.assign_task(1, "Laundry", &[], today).unwrap();
        board.create_group("Work", "Write report", &[], today).unwrap();
        board.set_status(1, &[2], Status::Done, today).unwrap();
        board.set_status(2, &[1], Status::InProgress, today).unwrap();
        board.toggle_mark(2, 1).unwrap();
        board.tick_subtasks(1, 1, &[1]).unwrap();
        board
    }

    #[test]
    fn test_missing_file_is_empty_board() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path().join("storage.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load_is_identical() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path().join("nested").join("storage.json"));
        let board = populated();

        store.save(&board).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded, board);

        // Saving the loaded copy again produces the same bytes.
        let first = fs::read_to_string(store.path()).unwrap();
        store.save(&loaded).unwrap();
        let second = fs::read_to_string(store.path()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_saved_file_uses_four_space_indent() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path().join("storage.json"));
        store.save(&populated()).unwrap();

        let text = fs::read_to_string(store.path()).unwrap();
        assert!(text.starts_with("[\n    {\n        \"name\": \"Home\""));
        assert!(text.ends_with("]\n"));
        assert!(!text.contains("\"idx\""));
    }

    #[cfg(unix)]
    #[test]
    fn test_save_keeps_existing_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path().join("storage.json"));
        store.save(&Board::new()).unwrap();
        fs::set_permissions(store.path(), fs::Permissions::from_mode(0o644)).unwrap();

        store.save(&populated()).unwrap();
        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[test]
    fn test_corrupt_file_is_reported_and_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "{ not json").unwrap();

        let store = Store::new(&path);
        let err = store.load().unwrap_err();
        assert!(matches!(err, Error::StoreCorrupt { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn test_wrong_shape_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, r#"{"name": "Home"}"#).unwrap();

        let err = Store::new(&path).load().unwrap_err();
        assert!(matches!(err, Error::StoreCorrupt { .. }));
    }

    #[test]
    fn test_minimal_documents_fill_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(
            &path,
            r#"[{"name": "Home", "tasks": [{"name": "Buy milk", "subtasks": [{"name": "2 liters"}]}]}]"#,
        )
        .unwrap();

        let board = Store::new(&path).load().unwrap();
        let task = board.task(1, 1).unwrap();
        assert_eq!(task.status, Status::Todo);
        assert!(!task.important);
        assert_eq!(task.start, None);
        assert!(!task.subtasks[0].done);
    }
}
