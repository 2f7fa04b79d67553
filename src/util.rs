//! Identifier and timestamp helpers shared by the services and the store.

use std::{cmp::Ordering, sync::Mutex};

use rand::Rng;
use time::{Duration, OffsetDateTime, format_description::well_known::Rfc3339};

/// Alphabet used for room and candidate identifiers.
const ID_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Length of identifiers handed out to rooms.
pub const ROOM_ID_LENGTH: usize = 10;
/// Length of identifiers handed out to candidates.
pub const CANDIDATE_ID_LENGTH: usize = 12;

/// Generate a short random identifier made of lowercase letters and digits.
pub fn new_id(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

/// Format a timestamp as RFC 3339 in UTC with millisecond precision.
///
/// Fails for years outside `0..=9999`, which RFC 3339 cannot express.
pub fn try_format_timestamp(at: OffsetDateTime) -> Result<String, time::error::Format> {
    let at = at.to_offset(time::UtcOffset::UTC);
    let at = at
        .replace_millisecond(at.millisecond())
        .unwrap_or(at);
    at.format(&Rfc3339)
}

/// Display form of [`try_format_timestamp`] for responses and logs. Years RFC 3339
/// cannot express fall back to `time`'s own rendering instead of a placeholder.
pub fn format_timestamp(at: OffsetDateTime) -> String {
    try_format_timestamp(at).unwrap_or_else(|_| at.to_string())
}

/// Parse an RFC 3339 timestamp, normalising it to UTC.
pub fn parse_timestamp(raw: &str) -> Result<OffsetDateTime, time::error::Parse> {
    OffsetDateTime::parse(raw.trim(), &Rfc3339).map(|at| at.to_offset(time::UtcOffset::UTC))
}

/// Human-friendly ordering for display names: case-insensitive first, then exact
/// text so the order stays total.
pub fn collate(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Source of the current time, swappable so deadlines can be exercised in tests.
pub trait Clock: Send + Sync {
    /// Current instant in UTC.
    fn now(&self) -> OffsetDateTime;
}

/// Wall clock backed by the operating system.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<OffsetDateTime>,
}

impl ManualClock {
    /// Start the clock at `start`.
    pub fn new(start: OffsetDateTime) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Move the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        let mut guard = self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> OffsetDateTime {
        *self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
