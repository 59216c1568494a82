use crate::api::market::MarketSource;
use crate::models::HotelId;
use crate::services::dashboard_service::{Dashboard, SelectionAction};

fn checkbox(checked: bool) -> &'static str {
    if checked {
        "[x]"
    } else {
        "[ ]"
    }
}

/// The hotel picker: select-all / unselect-all state, then one line per hotel
pub fn list<S: MarketSource>(dashboard: &Dashboard<S>) -> String {
    let store = dashboard.selection();
    if store.eligible().is_empty() {
        return "No eligible hotels loaded.".to_string();
    }

    let mut lines = vec![
        format!("{} Select All", checkbox(store.all_selected())),
        format!("{} Unselect All", checkbox(store.none_selected())),
    ];
    lines.extend(
        store
            .eligible()
            .iter()
            .map(|hotel| format!("  {} {}", checkbox(store.is_selected(hotel)), hotel)),
    );
    lines.join("\n")
}

/// Toggle one hotel by name
pub fn toggle<S: MarketSource>(dashboard: &mut Dashboard<S>, name: &str) -> Result<String, String> {
    let id = HotelId::from(name);
    if !dashboard.apply(SelectionAction::Toggle(id.clone())) {
        return Err(format!("Unknown hotel '{}'. Use `hotels` to list eligible hotels.", name));
    }

    let state = if dashboard.selection().is_selected(&id) {
        "selected"
    } else {
        "unselected"
    };
    let store = dashboard.selection();
    Ok(format!(
        "{} {} ({} of {} selected)",
        id,
        state,
        store.selected().len(),
        store.eligible().len()
    ))
}

pub fn select_all<S: MarketSource>(dashboard: &mut Dashboard<S>) -> String {
    dashboard.apply(SelectionAction::SelectAll);
    format!("All {} hotels selected", dashboard.selection().selected().len())
}

pub fn unselect_all<S: MarketSource>(dashboard: &mut Dashboard<S>) -> String {
    dashboard.apply(SelectionAction::UnselectAll);
    "All hotels unselected".to_string()
}
