//! Market price models

use serde::{Deserialize, Serialize};

/// One day of market data for the selected hotels.
///
/// Every price may be missing when upstream has nothing for that date;
/// both an absent key and an explicit `null` decode to `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: String,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub my_price: Option<f64>,
    #[serde(default)]
    pub median: Option<f64>,
}

/// Price points in the order the market service returned them.
pub type PriceSeries = Vec<PricePoint>;
