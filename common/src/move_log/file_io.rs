use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use super::record::MoveLogRecord;

#[derive(Debug)]
pub enum MoveLogError {
    IoError(std::io::Error),
    JsonError(serde_json::Error),
    InvalidLine { line: usize, source: serde_json::Error },
}

impl std::fmt::Display for MoveLogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MoveLogError::IoError(e) => write!(f, "IO error: {}", e),
            MoveLogError::JsonError(e) => write!(f, "JSON error: {}", e),
            MoveLogError::InvalidLine { line, source } => {
                write!(f, "Invalid move log line {}: {}", line, source)
            }
        }
    }
}

impl std::error::Error for MoveLogError {}

impl From<std::io::Error> for MoveLogError {
    fn from(e: std::io::Error) -> Self {
        MoveLogError::IoError(e)
    }
}

impl From<serde_json::Error> for MoveLogError {
    fn from(e: serde_json::Error) -> Self {
        MoveLogError::JsonError(e)
    }
}

/// Appends records to a JSONL file; each record is flushed as one line.
pub struct MoveLogWriter {
    path: PathBuf,
    file: File,
    written: usize,
}

impl MoveLogWriter {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, MoveLogError> {
        let path = path.into();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            file,
            written: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn append(&mut self, record: &MoveLogRecord) -> Result<(), MoveLogError> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');
        self.file.write_all(line.as_bytes())?;
        self.file.flush()?;
        self.written += 1;
        Ok(())
    }
}

pub fn load_move_log(path: &Path) -> Result<Vec<MoveLogRecord>, MoveLogError> {
    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|source| MoveLogError::InvalidLine {
            line: index + 1,
            source,
        })?;
        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::ultimate_tictactoe::{GameState, Move};

    #[test]
    fn test_append_creates_directory_and_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("bot_moves.jsonl");

        let mut state = GameState::new();
        let mut writer = MoveLogWriter::open(&path).unwrap();
        for mv in [Move::new(1, 1, 1, 1), Move::new(1, 1, 2, 2)] {
            writer.append(&MoveLogRecord::capture(&state, mv, None)).unwrap();
            state.apply_move(mv).unwrap();
        }
        assert_eq!(writer.written(), 2);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);

        let records = load_move_log(&path).unwrap();
        assert_eq!(records[1].best_move, Move::new(1, 1, 2, 2));
        assert_eq!(records[1].allowed_square, Some([1, 1]));
    }

    #[test]
    fn test_reopen_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("moves.jsonl");
        let record = MoveLogRecord::capture(&GameState::new(), Move::new(0, 0, 0, 0), None);

        MoveLogWriter::open(&path).unwrap().append(&record).unwrap();
        MoveLogWriter::open(&path).unwrap().append(&record).unwrap();

        assert_eq!(load_move_log(&path).unwrap().len(), 2);
    }

    #[test]
    fn test_bad_line_reports_line_number() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("moves.jsonl");
        let record = MoveLogRecord::capture(&GameState::new(), Move::new(0, 0, 0, 0), None);
        let good = serde_json::to_string(&record).unwrap();
        std::fs::write(&path, format!("{}\n\n{{not json\n", good)).unwrap();

        let err = load_move_log(&path).unwrap_err();
        assert!(matches!(err, MoveLogError::InvalidLine { line: 3, .. }));
    }
}
