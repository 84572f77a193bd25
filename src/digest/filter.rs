use chrono::NaiveDate;

use super::data_types::{ArticleRecord, Digest};

/// De-duplicate records by link, first occurrence wins. This is the
/// identity-based pass; textual near-duplicates are handled separately.
pub fn deduplicate_by_link(records: &[ArticleRecord]) -> Digest {
    let mut unique_records: Digest = Vec::new();
    let mut links: Vec<String> = Vec::new();

    for record in records {
        if !links.contains(&record.link) {
            links.push(record.link.clone());
            unique_records.push(record.clone());
        }
    }

    unique_records
}

/// Keep exactly the records published on `today`. The timestamp's calendar
/// date is taken in its own offset; records without a timestamp are
/// dropped. Order of survivors is unchanged.
pub fn published_on(records: &[ArticleRecord], today: NaiveDate) -> Digest {
    records
        .iter()
        .filter(|record| {
            record
                .published_at
                .is_some_and(|published| published.date_naive() == today)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod test {
    use super::{deduplicate_by_link, published_on};
    use crate::digest::data_types::ArticleRecord;
    use chrono::{DateTime, NaiveDate};

    fn record(link: &str, published: Option<&str>) -> ArticleRecord {
        ArticleRecord {
            competitor: "쿠팡".to_string(),
            title: "쿠팡 뉴스".to_string(),
            summary: String::new(),
            link: link.to_string(),
            published_at: published.map(|raw| DateTime::parse_from_rfc3339(raw).unwrap()),
        }
    }

    #[test]
    fn test_deduplicate_by_link_first_wins() {
        let mut first = record("https://example.com/a", None);
        first.title = "원본".to_string();
        let mut second = record("https://example.com/a", None);
        second.title = "중복".to_string();
        let third = record("https://example.com/b", None);

        let unique = deduplicate_by_link(&[first, second, third]);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].title, "원본");
        assert_eq!(unique[1].link, "https://example.com/b");
    }

    #[test]
    fn test_published_on_keeps_only_today() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        let records = vec![
            record("https://example.com/a", Some("2025-03-15T09:00:00+00:00")),
            record("https://example.com/b", Some("2025-03-14T23:59:00+00:00")),
            record("https://example.com/c", None),
            // Late-evening KST timestamp still lands on the 15th in its own offset
            record("https://example.com/d", Some("2025-03-15T23:30:00+09:00")),
        ];

        let todays = published_on(&records, today);
        assert_eq!(todays.len(), 2);
        assert_eq!(todays[0].link, "https://example.com/a");
        assert_eq!(todays[1].link, "https://example.com/d");
    }

    #[test]
    fn test_published_on_is_idempotent() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        let records = vec![
            record("https://example.com/a", Some("2025-03-15T09:00:00+00:00")),
            record("https://example.com/b", Some("2025-03-16T09:00:00+00:00")),
        ];

        let once = published_on(&records, today);
        let twice = published_on(&once, today);
        assert_eq!(once, twice);
    }
}
