// State management module.
// Controller core, per-tab controllers, and list selection state.

#![allow(dead_code)]

pub mod controller;
pub mod search;
pub mod trending;

pub use controller::{FetchJob, Phase, QueryState, Snapshot};
pub use search::SearchTabState;
pub use trending::TrendingTabState;

use ratatui::widgets::ListState;

/// Keyboard selection cursor for a results list.
#[derive(Debug, Clone, Default)]
pub struct ListCursor {
    pub state: ListState,
}

impl ListCursor {
    pub fn selected(&self) -> Option<usize> {
        self.state.selected()
    }

    /// Select the next item, staying at the end of the list.
    pub fn select_next(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            Some(i) => i,
            None => 0,
        };
        self.state.select(Some(i));
    }

    /// Select the previous item, staying at the start of the list.
    pub fn select_prev(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.state.select(Some(i));
    }

    /// Reset selection to the first item when fresh results arrive.
    pub fn reset(&mut self, len: usize) {
        if len > 0 {
            self.state.select(Some(0));
        } else {
            self.state.select(None);
        }
    }
}
