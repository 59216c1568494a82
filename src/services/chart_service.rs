use std::path::Path;

use plotters::prelude::*;
use thiserror::Error;

use crate::models::{ChartModel, PricePoint, PriceRange};

/// Headroom added above the highest plotted price
pub const Y_AXIS_HEADROOM: f64 = 0.10;

pub const CHART_TITLE: &str = "Market Overview";
pub const Y_AXIS_TITLE: &str = "INR";

pub const RANGE_LABEL: &str = "Price Range";
pub const MY_PRICE_LABEL: &str = "My Hotel Price";
pub const MEDIAN_LABEL: &str = "Median Price";

const RANGE_COLOR: RGBColor = RGBColor(75, 192, 192);
const RANGE_OPACITY: f64 = 0.6;
const MY_PRICE_POINT_RADIUS: i32 = 6;
const MEDIAN_MARKER_HALF: i32 = 7;
const BAR_HALF_WIDTH: f64 = 0.3;
const MY_PRICE_DASH: u32 = 5;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Failed to render chart: {0}")]
    Render(String),
}

/// Build the plotted series and y-axis bound from a price series.
///
/// Labels follow the series order. Missing prices stay `None` in the
/// series and count as 0 for the axis bound; an empty series gives a
/// bound of 0.
pub fn assemble(series: &[PricePoint]) -> ChartModel {
    let labels = series.iter().map(|p| p.date.clone()).collect();
    let range = series
        .iter()
        .map(|p| PriceRange { min: p.min, max: p.max })
        .collect();
    let my_price = series.iter().map(|p| p.my_price).collect();
    let median = series.iter().map(|p| p.median).collect();

    let max_val = series
        .iter()
        .flat_map(|p| [p.min, p.max, p.my_price])
        .map(|v| v.filter(|v| v.is_finite()).unwrap_or(0.0))
        .fold(0.0_f64, f64::max);

    ChartModel {
        labels,
        range,
        my_price,
        median,
        y_axis_max: max_val + Y_AXIS_HEADROOM * max_val,
    }
}

/// Label shown under category slot `x`, if any.
fn label_at(labels: &[String], x: f64) -> String {
    let idx = x.round();
    if idx < 0.0 || (idx - x).abs() > f64::EPSILON {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

/// Split an optional series into runs of consecutive present values.
fn present_runs(values: &[Option<f64>]) -> Vec<Vec<(f64, f64)>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();

    for (i, value) in values.iter().enumerate() {
        match value {
            Some(v) if v.is_finite() => current.push((i as f64, *v)),
            _ => {
                if !current.is_empty() {
                    runs.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }

    runs
}

/// Render a chart model to a PNG file
pub fn render_chart(model: &ChartModel, path: &Path, width: u32, height: u32) -> Result<(), ChartError> {
    let backend = BitMapBackend::new(path, (width, height));
    let root = backend.into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| ChartError::Render(format!("Failed to fill canvas: {}", e)))?;

    // Keep a drawable span even when there is no data
    let y_max = model.y_axis_max.max(1.0);
    let slots = model.len().max(1);
    let x_range = -0.5_f64..(slots as f64 - 0.5);

    let mut chart = ChartBuilder::on(&root)
        .caption(CHART_TITLE, ("sans-serif", 32.0).into_font())
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range, 0.0_f64..y_max)
        .map_err(|e| ChartError::Render(format!("Failed to build chart: {}", e)))?;

    let labels = &model.labels;
    let x_formatter = |x: &f64| label_at(labels, *x);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(slots)
        .x_label_formatter(&x_formatter)
        .y_desc(Y_AXIS_TITLE)
        .draw()
        .map_err(|e| ChartError::Render(format!("Failed to draw mesh: {}", e)))?;

    // Range bars
    let range_style = RANGE_COLOR.mix(RANGE_OPACITY).filled();
    chart
        .draw_series(model.range.iter().enumerate().filter_map(|(i, r)| {
            let (lo, hi) = (r.min?, r.max?);
            let x = i as f64;
            Some(Rectangle::new(
                [(x - BAR_HALF_WIDTH, lo), (x + BAR_HALF_WIDTH, hi)],
                range_style,
            ))
        }))
        .map_err(|e| ChartError::Render(format!("Failed to draw ranges: {}", e)))?
        .label(RANGE_LABEL)
        .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 15, y + 5)], range_style));

    // Own price: dashed line through present points, broken at gaps
    for run in present_runs(&model.my_price) {
        chart
            .draw_series(DashedLineSeries::new(
                run,
                MY_PRICE_DASH,
                MY_PRICE_DASH,
                BLUE.stroke_width(2),
            ))
            .map_err(|e| ChartError::Render(format!("Failed to draw line: {}", e)))?;
    }
    chart
        .draw_series(
            present_runs(&model.my_price)
                .into_iter()
                .flatten()
                .map(|pt| Circle::new(pt, MY_PRICE_POINT_RADIUS, BLUE.filled())),
        )
        .map_err(|e| ChartError::Render(format!("Failed to draw point: {}", e)))?
        .label(MY_PRICE_LABEL)
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 15, y)], BLUE.stroke_width(2)));

    // Median: unconnected square markers
    chart
        .draw_series(present_runs(&model.median).into_iter().flatten().map(|pt| {
            EmptyElement::at(pt)
                + Rectangle::new(
                    [(-MEDIAN_MARKER_HALF, -MEDIAN_MARKER_HALF), (MEDIAN_MARKER_HALF, MEDIAN_MARKER_HALF)],
                    RED.filled(),
                )
        }))
        .map_err(|e| ChartError::Render(format!("Failed to draw markers: {}", e)))?
        .label(MEDIAN_LABEL)
        .legend(|(x, y)| Rectangle::new([(x + 3, y - 4), (x + 11, y + 4)], RED.filled()));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(|e| ChartError::Render(format!("Failed to draw legend: {}", e)))?;

    root.present()
        .map_err(|e| ChartError::Render(format!("Failed to write {}: {}", path.display(), e)))?;

    Ok(())
}
