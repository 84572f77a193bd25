use tracing::{info, warn};

mod data_types;
mod dedup;
mod extractor;
mod fetcher;
mod filter;

use data_types::Digest;
use dedup::deduplicate_similar;
use extractor::Extractor;
use fetcher::NewsFetcher;
use filter::{deduplicate_by_link, published_on};

/// Run the scrape half of the pipeline: fetch each competitor's search
/// page, extract records, keep today's articles, drop repeated links, then
/// suppress near-duplicate text. A failing fetch costs that competitor's
/// yield and nothing else.
pub async fn collect_digest(
    fetcher: &NewsFetcher,
    competitors: &[&str],
    similarity_threshold: f64,
) -> Digest {
    let extractor = Extractor::new();
    let today = chrono::Local::now().date_naive();

    let mut articles = Vec::new();
    for competitor in competitors {
        match fetcher.fetch_search_page(competitor).await {
            Ok(html) => articles.extend(extractor.extract(competitor, &html)),
            Err(e) => warn!(%competitor, error = %e, "search fetch failed, skipping competitor"),
        }
    }
    info!(scraped = articles.len(), "extraction finished");

    let todays = published_on(&articles, today);
    let unique = deduplicate_by_link(&todays);
    deduplicate_similar(unique, similarity_threshold)
}

pub mod prelude {
    pub use super::collect_digest;
    pub use super::data_types::*;
    pub use super::dedup::*;
    pub use super::extractor::*;
    pub use super::fetcher::*;
    pub use super::filter::*;
}
