//! Grouping of the weekly fixture list into per-day buckets for display.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::MatchData;

/// Bucket key for fixtures whose source carried no date.
pub const NO_DATE_KEY: &str = "no-date";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayGroup {
    pub date_key: String,
    pub header: String,
    pub matches: Vec<MatchData>,
}

/// Partition matches into date buckets. Bucket order is the order each date
/// first appears in the input (not sorted), and matches keep their input
/// order within a bucket. Dateless matches all share one sentinel bucket.
pub fn group_by_date(matches: Vec<MatchData>) -> Vec<DayGroup> {
    let mut groups: Vec<DayGroup> = Vec::new();

    for m in matches {
        let key = m.date.clone().unwrap_or_else(|| NO_DATE_KEY.to_string());
        match groups.iter().position(|g| g.date_key == key) {
            Some(i) => groups[i].matches.push(m),
            None => groups.push(DayGroup {
                header: format_date_header(&key),
                date_key: key,
                matches: vec![m],
            }),
        }
    }

    groups
}

/// Cosmetic layer over the date key: `YYYY-MM-DD` becomes a readable
/// weekday/month/day header; anything unparseable passes through verbatim.
pub fn format_date_header(date_key: &str) -> String {
    if date_key == NO_DATE_KEY {
        return "No date".to_string();
    }
    match NaiveDate::parse_from_str(date_key, "%Y-%m-%d") {
        Ok(date) => date.format("%A, %B %-d").to_string(),
        Err(_) => date_key.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(id: &str, date: Option<&str>) -> MatchData {
        MatchData {
            id: Some(id.to_string()),
            date: date.map(str::to_string),
            ..MatchData::default()
        }
    }

    fn ids(group: &DayGroup) -> Vec<&str> {
        group
            .matches
            .iter()
            .filter_map(|m| m.id.as_deref())
            .collect()
    }

    #[test]
    fn buckets_follow_first_seen_order() {
        let groups = group_by_date(vec![
            fixture("a", Some("2024-07-02")),
            fixture("b", Some("2024-07-01")),
            fixture("c", Some("2024-07-02")),
            fixture("d", Some("2024-07-03")),
        ]);

        let keys: Vec<&str> = groups.iter().map(|g| g.date_key.as_str()).collect();
        // not sorted: 07-02 was seen before 07-01
        assert_eq!(keys, ["2024-07-02", "2024-07-01", "2024-07-03"]);
        assert_eq!(ids(&groups[0]), ["a", "c"]);
    }

    #[test]
    fn dateless_matches_share_one_bucket() {
        let groups = group_by_date(vec![
            fixture("a", None),
            fixture("b", Some("2024-07-01")),
            fixture("c", None),
        ]);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].date_key, NO_DATE_KEY);
        assert_eq!(groups[0].header, "No date");
        assert_eq!(ids(&groups[0]), ["a", "c"]);
    }

    #[test]
    fn headers_render_weekday_and_month() {
        assert_eq!(format_date_header("2024-07-01"), "Monday, July 1");
        // unparseable keys pass through unchanged
        assert_eq!(format_date_header("next week"), "next week");
    }

    #[test]
    fn empty_input_yields_no_groups() {
        assert!(group_by_date(Vec::new()).is_empty());
    }
}
