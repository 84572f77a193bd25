use tracing::debug;

const SEARCH_BASE_URL: &str = "https://www.google.com";
const BROWSER_USER_AGENT: &str = "Mozilla/5.0";

/// Issues one news-search request per competitor name and hands back the
/// raw markup. Parsing is the extractor's job.
pub struct NewsFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl NewsFetcher {
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: SEARCH_BASE_URL.to_string(),
        }
    }

    #[allow(dead_code)]
    fn with_base_url(&mut self, base_url: String) -> &mut Self {
        self.base_url = base_url;
        self
    }

    /// Fetch the news-scoped search results page for one competitor name.
    /// A non-success status is an error; the caller decides whether that
    /// aborts anything (it doesn't — the competitor just yields nothing).
    pub async fn fetch_search_page(
        &self,
        competitor: &str,
    ) -> Result<String, Box<dyn std::error::Error>> {
        let url = format!(
            "{}/search?q={}&tbm=nws&hl=ko",
            self.base_url,
            urlencoding::encode(competitor)
        );
        debug!(%competitor, %url, "fetching search results");

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::USER_AGENT, BROWSER_USER_AGENT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(format!("search returned status {}", response.status()).into());
        }

        Ok(response.text().await?)
    }
}

impl Default for NewsFetcher {
    fn default() -> Self {
        Self::new()
    }
}
