use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::movie::MovieId;

/// Wire format of ledger timestamps, e.g. `11/03/2024 21:40:05`.
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Fixed UTC-3 zone in which all ledger timestamps are written and parsed.
pub fn reference_zone() -> FixedOffset {
    FixedOffset::west_opt(3 * 3600).expect("UTC-3 is a valid offset")
}

/// Current wall-clock time in the reference zone.
pub fn reference_now() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&reference_zone())
}

/// One row of the watch ledger.
///
/// Persisted field names are `id`, `title`, `updated_at`, `isDubbed`; the
/// renames keep existing ledger blobs loading unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    #[serde(rename = "id")]
    pub movie_id: MovieId,
    pub title: String,
    pub updated_at: String,
    #[serde(rename = "isDubbed")]
    pub confirmed: bool,
}

impl LedgerEntry {
    pub fn new(
        movie_id: MovieId,
        title: impl Into<String>,
        confirmed: bool,
        at: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            movie_id,
            title: title.into(),
            updated_at: at.format(TIMESTAMP_FORMAT).to_string(),
            confirmed,
        }
    }

    /// Parses `updated_at` in the reference zone. `None` when the stored
    /// value is not in the ledger timestamp format.
    pub fn parsed_updated_at(&self) -> Option<DateTime<FixedOffset>> {
        NaiveDateTime::parse_from_str(&self.updated_at, TIMESTAMP_FORMAT)
            .ok()?
            .and_local_timezone(reference_zone())
            .single()
    }
}
