use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

/// The payload rewritten on every iteration: `{"date":"<ISO-8601>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub date: String,
}

impl CommitRecord {
    pub fn new(date: impl Into<String>) -> Self {
        Self { date: date.into() }
    }

    /// Overwrite `path` with this record as one line of JSON.
    ///
    /// # Errors
    /// Returns the underlying I/O error if the file cannot be written.
    pub fn write_to(&self, path: &Path) -> io::Result<()> {
        let mut json = serde_json::to_string(self).map_err(io::Error::other)?;
        json.push('\n');
        fs::write(path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn writes_single_line_json() {
        let td = tempdir().unwrap();
        let p = td.path().join("data.json");
        CommitRecord::new("2024-02-03T04:05:06.789Z")
            .write_to(&p)
            .unwrap();
        assert_eq!(
            fs::read_to_string(&p).unwrap(),
            "{\"date\":\"2024-02-03T04:05:06.789Z\"}\n"
        );
    }

    #[test]
    fn overwrites_previous_content() {
        let td = tempdir().unwrap();
        let p = td.path().join("data.json");
        fs::write(&p, "a much longer previous payload that must disappear").unwrap();
        CommitRecord::new("2024-01-01T00:00:00.000Z")
            .write_to(&p)
            .unwrap();
        let back: CommitRecord = serde_json::from_str(&fs::read_to_string(&p).unwrap()).unwrap();
        assert_eq!(back.date, "2024-01-01T00:00:00.000Z");
    }

    #[test]
    fn missing_parent_dir_is_an_error() {
        let td = tempdir().unwrap();
        let p = td.path().join("no/such/dir/data.json");
        assert!(CommitRecord::new("x").write_to(&p).is_err());
    }
}
