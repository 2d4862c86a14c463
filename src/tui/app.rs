use ratatui::widgets::ListState;

use crate::domain::Item;

pub const PAGE_SIZE: usize = 10;

pub struct TuiApp {
    pub items: Vec<Item>,
    pub item_index: usize,
    pub list_state: ListState,
    pub should_quit: bool,
    pub status_message: Option<String>,
    pub is_refreshing: bool,
    pub help: String,
}

impl TuiApp {
    pub fn new(help: String) -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));

        Self {
            items: Vec::new(),
            item_index: 0,
            list_state,
            should_quit: false,
            status_message: None,
            is_refreshing: false,
            help,
        }
    }

    /// Replace the list with a new view, keeping the cursor in range.
    pub fn set_items(&mut self, items: Vec<Item>) {
        self.items = items;
        if self.item_index >= self.items.len() {
            self.item_index = self.items.len().saturating_sub(1);
        }
        self.list_state.select(Some(self.item_index));
    }

    pub fn selected_item(&self) -> Option<&Item> {
        self.items.get(self.item_index)
    }

    pub fn move_up(&mut self) {
        if self.item_index > 0 {
            self.item_index -= 1;
            self.list_state.select(Some(self.item_index));
        }
    }

    pub fn move_down(&mut self) {
        if !self.items.is_empty() && self.item_index < self.items.len() - 1 {
            self.item_index += 1;
            self.list_state.select(Some(self.item_index));
        }
    }

    pub fn next_page(&mut self) {
        let max_index = self.items.len().saturating_sub(1);
        self.item_index = (self.item_index + PAGE_SIZE).min(max_index);
        self.list_state.select(Some(self.item_index));
    }

    pub fn prev_page(&mut self) {
        self.item_index = self.item_index.saturating_sub(PAGE_SIZE);
        self.list_state.select(Some(self.item_index));
    }

    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }
}
