// Shared list and loading helpers for the state modules.

use ratatui::widgets::ListState;

/// Loading state for async data.
#[derive(Debug, Clone, Default)]
pub enum LoadingState<T> {
    #[default]
    Idle,
    Loading,
    Loaded(T),
    Error(String),
}

impl<T> LoadingState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadingState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            LoadingState::Loaded(data) => Some(data),
            _ => None,
        }
    }
}

/// Move selection down one row, staying on the last row.
pub fn select_next(list_state: &mut ListState, len: usize) {
    if len == 0 {
        list_state.select(None);
        return;
    }
    let i = match list_state.selected() {
        Some(i) if i >= len - 1 => len - 1,
        Some(i) => i + 1,
        None => 0,
    };
    list_state.select(Some(i));
}

/// Move selection up one row, staying on the first row.
pub fn select_prev(list_state: &mut ListState, len: usize) {
    if len == 0 {
        list_state.select(None);
        return;
    }
    let i = match list_state.selected() {
        Some(i) => i.saturating_sub(1).min(len - 1),
        None => 0,
    };
    list_state.select(Some(i));
}

/// Select the first row, or nothing for an empty list.
pub fn reset_selection(list_state: &mut ListState, len: usize) {
    list_state.select(if len == 0 { None } else { Some(0) });
}
