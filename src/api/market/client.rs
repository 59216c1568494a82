use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::models::FetchError;
use super::MarketSource;
use crate::models::{HotelId, PriceSeries};

/// Separator the market service expects between hotel names.
pub const HOTEL_SEPARATOR: &str = "|";

/// HTTP client for the hotel market service
pub struct MarketDataClient {
    http_client: HttpClient,
    base_url: String,
}

impl MarketDataClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://www.mfamanagement.co.in";

    /// Create a new client with custom base URL
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            http_client: HttpClient::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the eligible hotels listing
    pub fn eligible_hotels_url(&self) -> String {
        format!("{}/eligible_hotels", self.base_url)
    }

    /// URL of the market graph query for a selection
    pub fn market_data_url(&self, hotels: &[HotelId]) -> String {
        format!("{}/market_graph1?hotels={}", self.base_url, hotels_param(hotels))
    }

    /// GET a URL and decode its JSON body
    ///
    /// The body is read as text first so that a malformed payload is reported
    /// as a decode failure rather than a transport failure.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let response = self.http_client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Market service returned {} for {}", status, url);
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl MarketSource for MarketDataClient {
    /// GET /eligible_hotels
    ///
    /// Returns the hotel names in the order the service sent them.
    async fn fetch_eligible_hotels(&self) -> Result<Vec<HotelId>, FetchError> {
        let url = self.eligible_hotels_url();
        debug!("Fetching eligible hotels from {}", url);
        self.get_json(&url).await
    }

    /// GET /market_graph1?hotels=A|B|C
    ///
    /// An empty selection is still sent (`hotels=`); the service decides
    /// what to answer.
    async fn fetch_market_data(&self, hotels: &[HotelId]) -> Result<PriceSeries, FetchError> {
        let url = self.market_data_url(hotels);
        debug!("Fetching market data for {} hotel(s)", hotels.len());
        self.get_json(&url).await
    }
}

/// Join hotel names into the `hotels` query value.
///
/// Names are percent-encoded individually; the separators stay literal.
pub fn hotels_param(hotels: &[HotelId]) -> String {
    hotels
        .iter()
        .map(|h| urlencoding::encode(h.as_str()).into_owned())
        .collect::<Vec<_>>()
        .join(HOTEL_SEPARATOR)
}
