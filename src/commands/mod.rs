pub mod chart;
pub mod help;
pub mod hotels;

use std::path::PathBuf;

use tracing::debug;

use crate::api::market::MarketSource;
use crate::config::Config;
use crate::services::dashboard_service::Dashboard;

/// A parsed console command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Hotels,
    Toggle(String),
    SelectAll,
    UnselectAll,
    Refresh,
    Table,
    Render(Option<PathBuf>),
    Status,
    Help,
    Quit,
}

/// Parse one console line. Blank lines parse to `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    // hotel names may contain spaces, so the argument is the rest of the line
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_lowercase().as_str() {
        "hotels" | "list" => Command::Hotels,
        "toggle" | "t" => {
            if rest.is_empty() {
                return Err("Usage: toggle <hotel>".to_string());
            }
            Command::Toggle(rest.to_string())
        }
        "all" | "selectall" => Command::SelectAll,
        "none" | "unselectall" => Command::UnselectAll,
        "refresh" | "update" => Command::Refresh,
        "table" => Command::Table,
        "render" => Command::Render((!rest.is_empty()).then(|| PathBuf::from(rest))),
        "status" => Command::Status,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(format!("Unknown command '{}'. Type `help` for usage.", other)),
    };

    Ok(Some(command))
}

/// Run one command against the dashboard and return the text to show
pub fn execute<S: MarketSource>(
    dashboard: &mut Dashboard<S>,
    config: &Config,
    command: Command,
) -> Result<String, String> {
    match command {
        Command::Hotels => Ok(hotels::list(dashboard)),
        Command::Toggle(name) => hotels::toggle(dashboard, &name),
        Command::SelectAll => Ok(hotels::select_all(dashboard)),
        Command::UnselectAll => Ok(hotels::unselect_all(dashboard)),
        Command::Refresh => {
            let token = dashboard.refresh();
            Ok(format!("Refreshing market data (request #{})", token))
        }
        Command::Table => Ok(chart::price_table(dashboard.series())),
        Command::Render(path) => {
            let path = path.unwrap_or_else(|| config.chart_path.clone());
            chart::render(dashboard, config, &path)
        }
        Command::Status => Ok(chart::status(dashboard)),
        Command::Help => Ok(help::execute()),
        Command::Quit => Ok(String::new()),
    }
}

/// Handle one console line; returns false once the user asked to quit
pub fn handle_line<S: MarketSource>(dashboard: &mut Dashboard<S>, config: &Config, line: &str) -> bool {
    let command = match parse_command(line) {
        Ok(Some(command)) => command,
        Ok(None) => return true,
        Err(e) => {
            println!("{}", e);
            return true;
        }
    };

    debug!("Console command: {:?}", command);
    if command == Command::Quit {
        return false;
    }

    match execute(dashboard, config, command) {
        Ok(output) => println!("{}", output),
        Err(e) => println!("Error: {}", e),
    }
    true
}
