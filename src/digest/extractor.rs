use chrono::{DateTime, FixedOffset};
use scraper::{Html, Selector};

use super::data_types::ArticleRecord;

/// Pulls structured article records out of raw search-results markup.
/// Selectors follow the page's known result-block structure.
pub struct Extractor {
    block: Selector,
    heading: Selector,
    anchor: Selector,
    snippet: Selector,
    time: Selector,
}

impl Extractor {
    #[must_use]
    pub fn new() -> Self {
        Self {
            block: Selector::parse("div.dbsr").unwrap(),
            heading: Selector::parse("div[role='heading']").unwrap(),
            anchor: Selector::parse("a").unwrap(),
            snippet: Selector::parse(".Y3v8qd").unwrap(),
            time: Selector::parse("time").unwrap(),
        }
    }

    /// Extract candidate records from one competitor's markup. A block
    /// missing its heading or link is skipped without touching its
    /// siblings; a missing snippet becomes an empty summary.
    pub fn extract(&self, competitor: &str, html: &str) -> Vec<ArticleRecord> {
        let document = Html::parse_document(html);
        let mut records = Vec::new();

        for block in document.select(&self.block) {
            let Some(title) = block
                .select(&self.heading)
                .next()
                .map(|el| el.text().collect::<String>().trim().to_string())
            else {
                continue;
            };
            if title.is_empty() {
                continue;
            }

            let Some(link) = block
                .select(&self.anchor)
                .next()
                .and_then(|el| el.value().attr("href"))
            else {
                continue;
            };

            let summary = block
                .select(&self.snippet)
                .next()
                .map(|el| el.text().collect::<String>().trim().to_string())
                .unwrap_or_default();

            let published_at = block
                .select(&self.time)
                .next()
                .and_then(|el| el.value().attr("datetime"))
                .and_then(parse_published);

            records.push(ArticleRecord {
                competitor: competitor.to_string(),
                title,
                summary,
                link: link.to_string(),
                published_at,
            });
        }

        records
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a machine-readable datetime attribute. A trailing "Z" is
/// normalized to an explicit UTC offset; anything unparseable counts as
/// "no publish date" rather than an error.
fn parse_published(raw: &str) -> Option<DateTime<FixedOffset>> {
    let normalized = if let Some(stripped) = raw.strip_suffix('Z') {
        format!("{stripped}+00:00")
    } else {
        raw.to_string()
    };
    DateTime::parse_from_rfc3339(&normalized).ok()
}
