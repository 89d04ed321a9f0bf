//! Typed views over stored documents.
//!
//! Documents in the store are plain JSON objects; the models here are the
//! typed edges used by the auth layer and the response shapes. Domain
//! handlers that just shuttle documents between the store and the client
//! (services, orders, news) work on raw documents instead.

pub mod user;

pub use user::{PublicUser, User};

use chrono::{SecondsFormat, Utc};

/// Current time as an ISO 8601 timestamp with millisecond precision
/// (`2024-01-15T10:30:00.000Z`), the format every `createdAt`/`updatedAt`
/// field carries. Lexicographic order on these strings is chronological
/// order, which the list endpoints rely on for sorting.
#[must_use]
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Uzbek month names for human-readable news dates.
const UZ_MONTHS: [&str; 12] = [
    "yanvar", "fevral", "mart", "aprel", "may", "iyun", "iyul", "avgust", "sentabr", "oktabr",
    "noyabr", "dekabr",
];

/// Today's date in the display format used by news items, e.g.
/// `2024-yil 15-yanvar`.
#[must_use]
pub fn today_uz() -> String {
    use chrono::Datelike;

    let now = Utc::now();
    let month = UZ_MONTHS
        .get(now.month0() as usize)
        .copied()
        .unwrap_or("yanvar");
    format!("{}-yil {}-{}", now.year(), now.day(), month)
}
