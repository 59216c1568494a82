pub mod client;
pub mod models;

use std::future::Future;

use crate::models::{HotelId, PriceSeries};

pub use client::MarketDataClient;
pub use models::FetchError;

/// Anything that can answer the two market service queries.
///
/// `MarketDataClient` is the HTTP implementation; the dashboard only sees
/// this trait.
pub trait MarketSource: Send + Sync + 'static {
    fn fetch_eligible_hotels(&self) -> impl Future<Output = Result<Vec<HotelId>, FetchError>> + Send;

    fn fetch_market_data(
        &self,
        hotels: &[HotelId],
    ) -> impl Future<Output = Result<PriceSeries, FetchError>> + Send;
}
