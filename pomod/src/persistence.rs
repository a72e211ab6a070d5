use anyhow::Result;
use chrono::{DateTime, Local};
use pomod_ipc::Mode;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

const LOG_FILE: &str = "log.jsonl";

/// One finished period, as written to the session log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    #[serde(rename = "type")]
    pub kind: Mode,
    pub start: DateTime<Local>,
    pub end: DateTime<Local>,
    pub duration: u64, // seconds
}

/// Append-only JSON-lines log of finished periods.
#[derive(Debug, Clone)]
pub struct SessionLog {
    path: PathBuf,
}

impl SessionLog {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(LOG_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, record: &SessionRecord) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }

        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }

    pub fn read_all(&self) -> Result<Vec<SessionRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&self.path)?;
        contents
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| -> Result<SessionRecord> { Ok(serde_json::from_str(line)?) })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, SubsecRound};

    fn record(kind: Mode, duration: u64) -> SessionRecord {
        let end = Local::now().trunc_subsecs(0);
        SessionRecord {
            kind,
            start: end - Duration::seconds(duration as i64),
            end,
            duration,
        }
    }

    #[test]
    fn appends_one_json_object_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let log = SessionLog::new(&dir.path().join("nested").join("pomod"));

        log.append(&record(Mode::Work, 3000)).unwrap();
        log.append(&record(Mode::Break, 600)).unwrap();

        let contents = fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["type"], "work");
        assert_eq!(first["duration"], 3000);
        let start = first["start"].as_str().unwrap();
        let end = first["end"].as_str().unwrap();
        let start = DateTime::parse_from_rfc3339(start).unwrap();
        let end = DateTime::parse_from_rfc3339(end).unwrap();
        assert_eq!(end - start, Duration::seconds(3000));

        let all = log.read_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].kind, Mode::Break);
        assert_eq!(all[1].duration, 600);
    }

    #[test]
    fn missing_log_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let log = SessionLog::new(dir.path());
        assert!(log.read_all().unwrap().is_empty());
    }

    #[test]
    fn malformed_line_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let log = SessionLog::new(dir.path());
        log.append(&record(Mode::Work, 3000)).unwrap();

        let mut file = OpenOptions::new().append(true).open(log.path()).unwrap();
        file.write_all(b"{not json\n").unwrap();

        assert!(log.read_all().is_err());
    }
}
