//! Chart models

/// Lower and upper market price for one date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Plot-ready view of a price series
///
/// Every series has one entry per label; `None` marks a gap.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartModel {
    pub labels: Vec<String>,
    pub range: Vec<PriceRange>,
    pub my_price: Vec<Option<f64>>,
    pub median: Vec<Option<f64>>,
    pub y_axis_max: f64,
}

impl ChartModel {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }
}
