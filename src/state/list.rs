// Loading and selection state for async-loaded lists.

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

    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadingState::Loaded(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            LoadingState::Loaded(data) => Some(data),
            _ => None,
        }
    }
}

/// A list of items with keyboard-tracked selection.
#[derive(Debug, Clone)]
pub struct SelectableList<T> {
    pub data: LoadingState<Vec<T>>,
    pub list_state: ListState,
}

impl<T> Default for SelectableList<T> {
    fn default() -> Self {
        Self {
            data: LoadingState::Idle,
            list_state: ListState::default(),
        }
    }
}

impl<T> SelectableList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[T] {
        self.data.data().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    /// Get the currently selected index.
    pub fn selected(&self) -> Option<usize> {
        self.list_state.selected()
    }

    /// Get the selected item.
    pub fn selected_item(&self) -> Option<&T> {
        self.items().get(self.list_state.selected()?)
    }

    /// Select the next item, staying at the end.
    pub fn select_next(&mut self) {
        let len = self.len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i >= len - 1 => i,
            Some(i) => i + 1,
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    /// Select the previous item, staying at the start.
    pub fn select_prev(&mut self) {
        if self.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    /// Reset selection to the first item, or none when empty.
    pub fn reset_selection(&mut self) {
        if self.is_empty() {
            self.list_state.select(None);
        } else {
            self.list_state.select(Some(0));
        }
    }

    /// Set loaded data and reset the selection.
    pub fn set_loaded(&mut self, items: Vec<T>) {
        self.data = LoadingState::Loaded(items);
        self.reset_selection();
    }

    pub fn set_loading(&mut self) {
        self.data = LoadingState::Loading;
    }

    pub fn set_error(&mut self, error: String) {
        self.data = LoadingState::Error(error);
    }

    /// Remove the item at `index`, keeping the selection in bounds.
    pub fn remove(&mut self, index: usize) {
        if let LoadingState::Loaded(items) = &mut self.data {
            if index < items.len() {
                items.remove(index);
            }
            match self.list_state.selected() {
                Some(_) if items.is_empty() => self.list_state.select(None),
                Some(i) if i >= items.len() => self.list_state.select(Some(items.len() - 1)),
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_clamps_at_both_ends() {
        let mut list = SelectableList::new();
        list.set_loaded(vec!["a", "b", "c"]);
        assert_eq!(list.selected(), Some(0));

        list.select_prev();
        assert_eq!(list.selected(), Some(0));

        list.select_next();
        list.select_next();
        list.select_next();
        assert_eq!(list.selected(), Some(2));
        assert_eq!(list.selected_item(), Some(&"c"));
    }

    #[test]
    fn empty_list_never_selects() {
        let mut list: SelectableList<&str> = SelectableList::new();
        list.set_loaded(Vec::new());
        list.select_next();
        assert_eq!(list.selected(), None);
        assert!(list.selected_item().is_none());
    }

    #[test]
    fn loading_and_error_states_expose_no_items() {
        let mut list: SelectableList<&str> = SelectableList::new();
        list.set_loading();
        assert!(list.data.is_loading());
        assert!(list.is_empty());

        list.set_error("boom".to_string());
        assert!(list.is_empty());
    }

    #[test]
    fn remove_keeps_selection_in_bounds() {
        let mut list = SelectableList::new();
        list.set_loaded(vec!["a", "b"]);
        list.select_next();
        assert_eq!(list.selected(), Some(1));

        list.remove(1);
        assert_eq!(list.selected(), Some(0));

        list.remove(0);
        assert_eq!(list.selected(), None);
    }
}
