use std::path::Path;

use tracing::{error, info};

use crate::api::market::MarketSource;
use crate::config::Config;
use crate::models::PricePoint;
use crate::services::chart_service;
use crate::services::dashboard_service::Dashboard;
use crate::utils::{Align, Table};

fn fmt_price(price: Option<f64>) -> String {
    match price {
        Some(p) if p.fract() == 0.0 => format!("{:.0}", p),
        Some(p) => format!("{:.2}", p),
        None => "n/a".to_string(),
    }
}

/// Per-date breakdown, the same figures the chart tooltip shows
pub fn price_table(series: &[PricePoint]) -> String {
    if series.is_empty() {
        return "No market data for the current selection.".to_string();
    }

    let mut table = Table::new(&["Date", "My Hotel Price", "Price Range", "Median Price"])
        .align(1, Align::Right)
        .align(2, Align::Right)
        .align(3, Align::Right);

    for point in series {
        table.add_row(vec![
            point.date.clone(),
            fmt_price(point.my_price),
            format!("{}-{}", fmt_price(point.min), fmt_price(point.max)),
            fmt_price(point.median),
        ]);
    }

    table.render()
}

pub fn status<S: MarketSource>(dashboard: &Dashboard<S>) -> String {
    let store = dashboard.selection();
    let chart = dashboard.chart();
    let updated = dashboard
        .last_updated()
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "never".to_string());

    [
        format!("Selected hotels: {} of {}", store.selected().len(), store.eligible().len()),
        format!("Dates plotted:   {}", chart.len()),
        format!("Y-axis max:      {:.2}", chart.y_axis_max),
        format!("Requests open:   {}", dashboard.in_flight()),
        format!("Last updated:    {}", updated),
    ]
    .join("\n")
}

/// Draw the current chart to `path`
pub fn render<S: MarketSource>(dashboard: &Dashboard<S>, config: &Config, path: &Path) -> Result<String, String> {
    let model = dashboard.chart();
    chart_service::render_chart(&model, path, config.chart_width, config.chart_height)
        .map_err(|e| e.to_string())?;

    info!("Rendered {} date(s) to {}", model.len(), path.display());
    Ok(format!("Chart written to {}", path.display()))
}

/// Re-render to the configured path after new data arrives; failures are only logged
pub fn render_current<S: MarketSource>(dashboard: &Dashboard<S>, config: &Config) {
    if let Err(e) = render(dashboard, config, &config.chart_path) {
        error!("{}", e);
    }
}
