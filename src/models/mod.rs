//! Data models for the dashboard
//!
//! Hotel identifiers, the market price records fetched for a selection, and
//! the chart model derived from them.

pub mod hotel;
pub mod price;
pub mod chart;

// Re-export commonly used types for convenience
pub use hotel::HotelId;
pub use price::{PricePoint, PriceSeries};
pub use chart::{ChartModel, PriceRange};
