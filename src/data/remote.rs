//! Port of London Authority tide prediction API client
//!
//! A query made for the first day of a quarter returns the predictions for
//! the whole quarter as a JSON `table`.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info};

use super::{CalendarQuarter, Site};
use crate::error::TideError;

/// Base URL for the PLA gauge data API
pub const PLA_BASE_URL: &str = "https://tidepredictions.pla.co.uk/gauge_data";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for fetching raw quarter payloads from the PLA API
#[derive(Debug, Clone)]
pub struct PlaClient {
    client: Client,
    base_url: String,
}

impl PlaClient {
    /// Create a new PlaClient with the given request timeout
    pub fn new(timeout: Duration) -> Result<Self, TideError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client))
    }

    /// Create a new PlaClient with a custom HTTP client
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            base_url: PLA_BASE_URL.to_string(),
        }
    }

    /// Set the base URL for requests (for testing)
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// URL of the prediction query for one site and day
    ///
    /// Month and day are not zero-padded, e.g. `.../0113A/2021/1/1/0/1/`.
    pub fn query_url(&self, site: &Site, year: i32, month: u32, day: u32) -> String {
        format!(
            "{}/{}/{}/{}/{}/0/1/",
            self.base_url.trim_end_matches('/'),
            site.code,
            year,
            month,
            day
        )
    }

    /// Fetches the raw payload covering `quarter` at `site`
    ///
    /// The body is returned unvalidated; the cache validates before storing.
    ///
    /// # Returns
    /// * `Ok(String)` - The response body
    /// * `Err(TideError::Network)` - On transport failure or a non-success status
    pub async fn fetch_quarter(
        &self,
        site: &Site,
        quarter: CalendarQuarter,
    ) -> Result<String, TideError> {
        let url = self.query_url(site, quarter.year(), quarter.first_month(), 1);
        info!(site = site.name, %quarter, "fetching tide predictions");
        debug!(%url, "GET");

        let response = self.client.get(&url).send().await?.error_for_status()?;
        let text = response.text().await?;
        debug!(bytes = text.len(), "received payload");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::site_by_name;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn chelsea() -> &'static Site {
        site_by_name("Chelsea Bridge").unwrap()
    }

    #[test]
    fn test_query_url_passes_date_unpadded() {
        let client = PlaClient::with_client(Client::new());
        let url = client.query_url(chelsea(), 2021, 1, 1);
        assert_eq!(
            url,
            "https://tidepredictions.pla.co.uk/gauge_data/0113A/2021/1/1/0/1/"
        );
        assert!(client.query_url(chelsea(), 2021, 12, 31).contains("2021/12/31"));
    }

    #[test]
    fn test_query_url_with_trailing_slash_base() {
        let client = PlaClient::with_client(Client::new()).with_base_url("http://localhost/");
        assert_eq!(
            client.query_url(chelsea(), 2014, 4, 1),
            "http://localhost/0113A/2014/4/1/0/1/"
        );
    }

    #[tokio::test]
    async fn test_fetch_quarter_requests_first_day_of_quarter() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/0113A/2014/7/1/0/1/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"table\":{}}"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = PlaClient::new(DEFAULT_TIMEOUT)
            .unwrap()
            .with_base_url(mock_server.uri());
        let quarter = CalendarQuarter::new(2014, 3).unwrap();
        let body = client.fetch_quarter(chelsea(), quarter).await.unwrap();

        assert_eq!(body, "{\"table\":{}}");
    }

    #[tokio::test]
    async fn test_fetch_quarter_reports_error_status() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let client = PlaClient::new(DEFAULT_TIMEOUT)
            .unwrap()
            .with_base_url(mock_server.uri());
        let quarter = CalendarQuarter::new(2014, 1).unwrap();
        let result = client.fetch_quarter(chelsea(), quarter).await;

        assert!(matches!(result, Err(TideError::Network(_))));
    }
}
