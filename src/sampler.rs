//! Uniform random instants inside a date range.
//!
//! Sampling works on the epoch-millisecond integer line: both endpoints are
//! truncated to whole milliseconds and a single integer is drawn from the
//! inclusive span between them. No calendar weighting is applied.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, SubsecRound, TimeDelta, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::BackdateError;

/// Formats accepted for naive (offset-less) date-times, read as UTC.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// An inclusive `[start, end]` range of UTC instants with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl SampleRange {
    /// Build a range, rejecting `start > end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, BackdateError> {
        if start > end {
            return Err(BackdateError::InvalidRange {
                start: format_instant(start),
                end: format_instant(end),
            });
        }
        Ok(Self {
            start: start.trunc_subsecs(3),
            end: end.trunc_subsecs(3),
        })
    }

    /// Parse both endpoints with [`parse_instant`] and build a range.
    pub fn parse(start: &str, end: &str) -> Result<Self, BackdateError> {
        Self::new(parse_instant(start)?, parse_instant(end)?)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Draw one instant uniformly from the range, at millisecond resolution.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> DateTime<Utc> {
        let span = self.end.timestamp_millis() - self.start.timestamp_millis();
        let offset = rng.random_range(0..=span);
        self.start + TimeDelta::milliseconds(offset)
    }
}

/// Parse a date-like string as a UTC instant.
///
/// Accepts RFC 3339 (any offset, converted to UTC), a naive date-time read as
/// UTC, or a bare `YYYY-MM-DD` read as UTC midnight.
pub fn parse_instant(input: &str) -> Result<DateTime<Utc>, BackdateError> {
    let s = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(ndt.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ndt| ndt.and_utc())
        .ok_or_else(|| BackdateError::InvalidInput {
            input: input.to_string(),
        })
}

/// Render an instant as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
pub fn format_instant(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Sample one instant from `[start, end]` and return it in normalized form.
pub fn random_date_between<R: Rng + ?Sized>(
    rng: &mut R,
    start: &str,
    end: &str,
) -> Result<String, BackdateError> {
    let range = SampleRange::parse(start, end)?;
    Ok(format_instant(range.sample(rng)))
}

/// Random source for a run: seeded when reproducibility is requested.
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

/// CLI command: print `count` dates sampled from `[start, end]`, one per line.
pub fn cmd_sample(start: &str, end: &str, count: u32, seed: Option<u64>) -> Result<()> {
    let range = SampleRange::parse(start, end)?;
    let mut rng = make_rng(seed);
    for _ in 0..count {
        println!("{}", format_instant(range.sample(&mut rng)));
    }
    Ok(())
}
