use chrono::{DateTime, FixedOffset};

/// List of articles that survived the current pipeline run
pub type Digest = Vec<ArticleRecord>;

/// One scraped news item. Lives only for the run that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleRecord {
    /// The search term that produced this record
    pub competitor: String,
    pub title: String,
    /// Snippet text, possibly empty
    pub summary: String,
    /// Dedup identity key within a single run
    pub link: String,
    /// Absent when the result block carried no parseable timestamp
    pub published_at: Option<DateTime<FixedOffset>>,
}
