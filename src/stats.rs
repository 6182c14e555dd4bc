//! Dashboard statistics over the ledger's confirmed entries.

use chrono::{DateTime, Datelike, Duration, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::models::LedgerEntry;

/// Dashboard counters, all derived from confirmed entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchStats {
    pub today: u32,
    pub yesterday: u32,
    pub week: u32,
    pub month: u32,
    pub last_month: u32,
    pub total: u32,
}

/// Recomputes the dashboard counters from scratch.
///
/// Pending entries never count. A confirmed entry whose timestamp no
/// longer parses still lands in `total` but stays out of every time
/// window.
pub fn compute_stats(entries: &[LedgerEntry], now: DateTime<FixedOffset>) -> WatchStats {
    let mut stats = WatchStats::default();

    let today = now.date_naive();
    let yesterday = (now - Duration::days(1)).date_naive();
    let week_floor = now - Duration::days(7);
    let (last_month, last_month_year) = previous_month(now);

    for entry in entries.iter().filter(|e| e.confirmed) {
        stats.total += 1;

        let Some(at) = entry.parsed_updated_at() else {
            continue;
        };

        if at.date_naive() == today {
            stats.today += 1;
        }
        if at.date_naive() == yesterday {
            stats.yesterday += 1;
        }
        if at > week_floor {
            stats.week += 1;
        }
        if at.month() == now.month() && at.year() == now.year() {
            stats.month += 1;
        }
        if at.month() == last_month && at.year() == last_month_year {
            stats.last_month += 1;
        }
    }

    stats
}

/// Calendar month immediately before `now`, with its year.
fn previous_month(now: DateTime<FixedOffset>) -> (u32, i32) {
    if now.month() == 1 {
        (12, now.year() - 1)
    } else {
        (now.month() - 1, now.year())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::entry::reference_zone;
    use chrono::TimeZone;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<FixedOffset> {
        reference_zone().with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    fn entry(id: u64, updated_at: &str, confirmed: bool) -> LedgerEntry {
        LedgerEntry {
            movie_id: id,
            title: format!("movie {id}"),
            updated_at: updated_at.to_string(),
            confirmed,
        }
    }

    #[test]
    fn pending_entries_never_count() {
        let entries = vec![entry(1, "15/03/2024 09:00:00", false)];
        let stats = compute_stats(&entries, at(2024, 3, 15, 12, 0, 0));
        assert_eq!(stats, WatchStats::default());
    }

    #[test]
    fn today_and_yesterday_are_calendar_days() {
        let entries = vec![
            entry(1, "15/03/2024 00:00:01", true),
            entry(2, "14/03/2024 23:59:59", true),
            entry(3, "13/03/2024 12:00:00", true),
        ];
        let stats = compute_stats(&entries, at(2024, 3, 15, 12, 0, 0));
        assert_eq!(stats.today, 1);
        assert_eq!(stats.yesterday, 1);
    }

    #[test]
    fn week_window_is_strictly_after_seven_days_before_now() {
        let entries = vec![
            entry(1, "08/03/2024 12:00:00", true),
            entry(2, "08/03/2024 12:00:01", true),
        ];
        let stats = compute_stats(&entries, at(2024, 3, 15, 12, 0, 0));
        assert_eq!(stats.week, 1, "entry exactly on the floor is out");
    }

    #[test]
    fn month_is_the_calendar_month_not_a_rolling_window() {
        let entries = vec![
            entry(1, "01/03/2024 00:00:00", true),
            entry(2, "29/02/2024 23:59:59", true),
        ];
        let stats = compute_stats(&entries, at(2024, 3, 15, 12, 0, 0));
        assert_eq!(stats.month, 1);
        assert_eq!(stats.last_month, 1);
    }

    #[test]
    fn last_month_rolls_into_the_previous_year() {
        let entries = vec![
            entry(1, "28/12/2023 20:00:00", true),
            entry(2, "05/01/2024 20:00:00", true),
        ];
        let stats = compute_stats(&entries, at(2024, 1, 10, 12, 0, 0));
        assert_eq!(stats.last_month, 1);
        assert_eq!(stats.month, 1);
    }

    #[test]
    fn a_fresh_mark_and_an_old_one_split_across_buckets() {
        let entries = vec![
            entry(7, "15/03/2024 10:00:00", true),
            entry(9, "04/02/2024 10:00:00", true),
        ];
        let stats = compute_stats(&entries, at(2024, 3, 15, 12, 0, 0));
        assert_eq!(stats.today, 1);
        assert_eq!(stats.total, 2);
        assert_eq!(stats.month, 1);
        assert_eq!(stats.last_month, 1);
    }

    #[test]
    fn unparsable_timestamps_count_only_in_total() {
        let entries = vec![
            entry(1, "2024-03-15T09:00:00Z", true),
            entry(2, "whenever", true),
        ];
        let stats = compute_stats(&entries, at(2024, 3, 15, 12, 0, 0));
        assert_eq!(stats.total, 2);
        assert_eq!(stats.today, 0);
        assert_eq!(stats.week, 0);
        assert_eq!(stats.month, 0);
    }

    #[test]
    fn full_snapshot_over_a_mixed_ledger() {
        let entries = vec![
            entry(1, "15/03/2024 08:30:00", true),
            entry(2, "14/03/2024 23:59:59", true),
            entry(3, "10/03/2024 11:00:00", true),
            entry(4, "08/03/2024 12:00:00", true),
            entry(5, "01/03/2024 00:00:00", true),
            entry(6, "29/02/2024 10:00:00", true),
            entry(7, "15/01/2024 12:00:00", true),
            entry(8, "15/03/2024 09:00:00", false),
            entry(9, "not a timestamp", true),
        ];
        let stats = compute_stats(&entries, at(2024, 3, 15, 12, 0, 0));
        assert_eq!(
            stats,
            WatchStats {
                today: 1,
                yesterday: 1,
                week: 3,
                month: 5,
                last_month: 1,
                total: 8,
            }
        );
    }

    #[test]
    fn snapshot_serializes_last_month_in_camel_case() {
        let value = serde_json::to_value(WatchStats::default()).unwrap();
        assert!(value.get("lastMonth").is_some());
        assert!(value.get("last_month").is_none());
    }
}
