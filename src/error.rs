use thiserror::Error;

/// Failures a backdating run can end with.
///
/// Every variant is terminal: the run stops at the step that produced it and
/// commits made before that point stay in local history.
#[derive(Debug, Error)]
pub enum BackdateError {
    #[error("invalid range: start {start} is after end {end}")]
    InvalidRange { start: String, end: String },

    #[error("invalid date \"{input}\" (expected an ISO-8601 instant or YYYY-MM-DD)")]
    InvalidInput { input: String },

    #[error("invalid author \"{input}\" (expected \"Name <email>\")")]
    InvalidAuthor { input: String },

    #[error("iteration {iteration}: failed to write {path}")]
    Write {
        iteration: u32,
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("iteration {iteration}: commit failed")]
    Commit {
        iteration: u32,
        #[source]
        source: anyhow::Error,
    },

    #[error("push failed")]
    Push {
        #[source]
        source: anyhow::Error,
    },
}

/// Render an error and its `source()` chain as `outer: inner: root`.
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut cur = err.source();
    while let Some(e) = cur {
        out.push_str(": ");
        out.push_str(&e.to_string());
        cur = e.source();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn display_invalid_range() {
        let e = BackdateError::InvalidRange {
            start: "2024-06-01T00:00:00.000Z".to_string(),
            end: "2024-01-01T00:00:00.000Z".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "invalid range: start 2024-06-01T00:00:00.000Z is after end 2024-01-01T00:00:00.000Z"
        );
    }

    #[test]
    fn display_invalid_input() {
        let e = BackdateError::InvalidInput {
            input: "yesterday".to_string(),
        };
        assert_eq!(
            e.to_string(),
            r#"invalid date "yesterday" (expected an ISO-8601 instant or YYYY-MM-DD)"#
        );
    }

    #[test]
    fn commit_error_keeps_cause() {
        let e = BackdateError::Commit {
            iteration: 2,
            source: anyhow::anyhow!("index locked"),
        };
        assert_eq!(e.to_string(), "iteration 2: commit failed");
        assert_eq!(e.source().unwrap().to_string(), "index locked");
        assert_eq!(error_chain(&e), "iteration 2: commit failed: index locked");
    }
}
