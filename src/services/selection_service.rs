use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::debug;

use crate::models::HotelId;

/// Pushed to every subscriber after a selection mutation
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionChange {
    pub selected: Vec<HotelId>,
}

/// Eligible hotels plus the subset the user currently compares against
///
/// The selection is always a subset of the eligible hotels and keeps
/// insertion order: it follows the eligible order after a load or
/// `select_all`, and toggled-in hotels go to the end.
#[derive(Debug, Default)]
pub struct SelectionStore {
    eligible: Vec<HotelId>,
    selected: Vec<HotelId>,
    subscribers: Vec<UnboundedSender<SelectionChange>>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register for change notifications.
    pub fn subscribe(&mut self) -> UnboundedReceiver<SelectionChange> {
        let (tx, rx) = unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    /// Replace the eligible hotels (sorted, duplicates dropped) and select all of them.
    pub fn load_eligible(&mut self, ids: Vec<HotelId>) {
        let mut eligible = ids;
        eligible.sort();
        eligible.dedup();
        debug!("Loaded {} eligible hotels", eligible.len());

        self.selected = eligible.clone();
        self.eligible = eligible;
        self.notify();
    }

    pub fn select_all(&mut self) {
        self.selected = self.eligible.clone();
        self.notify();
    }

    pub fn unselect_all(&mut self) {
        self.selected.clear();
        self.notify();
    }

    /// Flip one hotel in or out of the selection.
    ///
    /// Returns false and changes nothing when `id` is not eligible.
    pub fn toggle(&mut self, id: &HotelId) -> bool {
        if !self.is_eligible(id) {
            debug!("Ignoring toggle of non-eligible hotel '{}'", id);
            return false;
        }

        if let Some(pos) = self.selected.iter().position(|h| h == id) {
            self.selected.remove(pos);
        } else {
            self.selected.push(id.clone());
        }
        self.notify();
        true
    }

    pub fn eligible(&self) -> &[HotelId] {
        &self.eligible
    }

    pub fn selected(&self) -> &[HotelId] {
        &self.selected
    }

    pub fn is_eligible(&self, id: &HotelId) -> bool {
        self.eligible.binary_search(id).is_ok()
    }

    pub fn is_selected(&self, id: &HotelId) -> bool {
        self.selected.contains(id)
    }

    /// True when every eligible hotel is selected.
    pub fn all_selected(&self) -> bool {
        // selection is a duplicate-free subset, so equal size means equal set
        self.selected.len() == self.eligible.len()
    }

    /// True when nothing is selected.
    pub fn none_selected(&self) -> bool {
        self.selected.is_empty()
    }

    fn notify(&mut self) {
        let change = SelectionChange {
            selected: self.selected.clone(),
        };
        self.subscribers.retain(|tx| tx.send(change.clone()).is_ok());
    }
}
