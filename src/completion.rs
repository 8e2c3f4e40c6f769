//! Pure card completion predicates. No I/O.

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde_json::Value;

/// Default window, in days, for [`is_card_completed_recently`].
pub const DEFAULT_RECENT_DAYS: i64 = 30;

/// Whether the card sits in an archive lane.
pub fn is_card_completed(card: &Value) -> bool {
    card["lane"]["laneClassType"] == "archive"
}

/// Whether the card finished within the last `days_ago` days.
///
/// Returns `None` when the card has no `actualFinish` date (or it cannot be
/// parsed); callers must treat that separately from `Some(false)`, which means
/// the card finished but not recently.
pub fn is_card_completed_recently(card: &Value, days_ago: i64) -> Option<bool> {
    let finish = card.get("actualFinish")?.as_str()?;
    let completed = parse_finish(finish)?;
    Some((Local::now().naive_local() - completed).num_days() < days_ago)
}

/// Parses the service's finish timestamps: RFC 3339, a naive datetime, or a
/// bare date. The zone offset, if any, is dropped and the wall-clock time
/// kept.
fn parse_finish(value: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = value.parse::<NaiveDateTime>() {
        return Some(dt);
    }
    value
        .parse::<NaiveDate>()
        .ok()
        .map(|d| d.and_hms_opt(0, 0, 0).unwrap_or_default())
}
