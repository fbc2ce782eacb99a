//! Wall-clock timing of a run phase

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Start, end and elapsed milliseconds of a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timing {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration_ms: u64,
}

impl Timing {
    pub fn between(started_at: DateTime<Utc>, finished_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            finished_at,
            duration_ms: elapsed_ms(started_at, finished_at),
        }
    }

    /// Zero-length timing at `at`, used for phases with nothing to do.
    pub fn instant(at: DateTime<Utc>) -> Self {
        Self::between(at, at)
    }

    /// Span covering `[min(start), max(end)]` of the given pairs.
    ///
    /// Returns `None` when the iterator is empty.
    pub fn spanning<I>(spans: I) -> Option<Self>
    where
        I: IntoIterator<Item = (DateTime<Utc>, DateTime<Utc>)>,
    {
        spans
            .into_iter()
            .fold(None, |acc: Option<(DateTime<Utc>, DateTime<Utc>)>, (s, e)| {
                Some(match acc {
                    None => (s, e),
                    Some((min_s, max_e)) => (min_s.min(s), max_e.max(e)),
                })
            })
            .map(|(s, e)| Self::between(s, e))
    }
}

/// Milliseconds from `start` to `end`, clamped at zero.
pub fn elapsed_ms(start: DateTime<Utc>, end: DateTime<Utc>) -> u64 {
    (end - start).num_milliseconds().max(0) as u64
}
