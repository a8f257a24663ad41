use std::ops::Range;

use crate::pager::LogPager;

/// Rows past the visible window that are checked for missing data.
pub const LOAD_THRESHOLD: usize = 15;

/// Scroll state of a virtualized list.
///
/// Only rows in [`VirtualWindow::visible_range`] are rendered. The selection
/// is kept inside the window by moving the offset.
#[derive(Debug, Clone, Default)]
pub struct VirtualWindow {
    offset: usize,
    height: usize,
    selected: Option<usize>,
}

impl VirtualWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Set from the rendered area on every frame.
    pub fn set_height(&mut self, height: usize) {
        self.height = height;
        self.follow_selection();
    }

    pub fn visible_range(&self, item_count: usize) -> Range<usize> {
        let start = self.offset.min(item_count);
        let end = (start + self.height).min(item_count);
        start..end
    }

    /// True when a row in or just below the window still waits for data.
    pub fn needs_more(&self, pager: &LogPager, threshold: usize) -> bool {
        let item_count = pager.item_count();
        let start = self.offset.min(item_count);
        let end = (self.offset + self.height + threshold).min(item_count);
        (start..end).any(|index| !pager.is_item_loaded(index))
    }

    pub fn select_next(&mut self, item_count: usize) {
        self.move_by(1, item_count);
    }

    pub fn select_previous(&mut self, item_count: usize) {
        self.move_by(-1, item_count);
    }

    pub fn page_down(&mut self, item_count: usize) {
        self.move_by(self.page_step() as isize, item_count);
    }

    pub fn page_up(&mut self, item_count: usize) {
        self.move_by(-(self.page_step() as isize), item_count);
    }

    pub fn select_first(&mut self, item_count: usize) {
        self.selected = (item_count > 0).then_some(0);
        self.offset = 0;
    }

    pub fn select_last(&mut self, item_count: usize) {
        self.selected = item_count.checked_sub(1);
        self.follow_selection();
    }

    /// Keeps the selection valid after the item count changed.
    pub fn clamp(&mut self, item_count: usize) {
        match item_count.checked_sub(1) {
            None => {
                self.selected = None;
                self.offset = 0;
            }
            Some(last) => {
                if let Some(selected) = self.selected {
                    self.selected = Some(selected.min(last));
                }
                self.offset = self.offset.min(last);
                self.follow_selection();
            }
        }
    }

    fn page_step(&self) -> usize {
        self.height.saturating_sub(1).max(1)
    }

    fn move_by(&mut self, delta: isize, item_count: usize) {
        let Some(last) = item_count.checked_sub(1) else {
            self.selected = None;
            return;
        };
        let next = match self.selected {
            Some(i) => i.saturating_add_signed(delta).min(last),
            None => 0,
        };
        self.selected = Some(next);
        self.follow_selection();
    }

    fn follow_selection(&mut self) {
        let Some(selected) = self.selected else {
            return;
        };
        if selected < self.offset {
            self.offset = selected;
        } else if self.height > 0 && selected >= self.offset + self.height {
            self.offset = selected + 1 - self.height;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pager::PageCompletion;
    use crate::LogMessage;
    use chrono::{TimeZone, Utc};

    fn loaded_pager(count: usize, chunk: usize) -> LogPager {
        let mut pager = LogPager::with_chunk_size(chunk);
        let request = pager.request_page().unwrap();
        let batch = (0..count)
            .map(|i| LogMessage::new(format!("line {i}"), Utc.timestamp_opt(0, 0).unwrap()))
            .collect();
        pager.apply(PageCompletion {
            request,
            result: Ok(batch),
        });
        pager
    }

    #[test]
    fn test_empty_pager_needs_first_page() {
        let pager = LogPager::new();
        let window = VirtualWindow::new();
        assert!(window.needs_more(&pager, LOAD_THRESHOLD));
    }

    #[test]
    fn test_needs_more_only_near_loading_row() {
        let pager = loaded_pager(100, 100);
        assert_eq!(pager.item_count(), 101);

        let mut window = VirtualWindow::new();
        window.set_height(20);
        assert!(!window.needs_more(&pager, LOAD_THRESHOLD));

        window.select_last(pager.item_count());
        assert_eq!(window.offset(), 81);
        assert!(window.needs_more(&pager, LOAD_THRESHOLD));

        window.select_first(pager.item_count());
        window.move_by(70, pager.item_count());
        // rows 51..=70 visible, 71..86 within threshold
        assert!(!window.needs_more(&pager, LOAD_THRESHOLD));
        assert!(window.needs_more(&pager, 40));
    }

    #[test]
    fn test_finished_pager_never_needs_more() {
        let pager = loaded_pager(5, 100);
        let mut window = VirtualWindow::new();
        window.set_height(20);
        assert!(!window.needs_more(&pager, LOAD_THRESHOLD));
    }

    #[test]
    fn test_selection_scrolls_window() {
        let mut window = VirtualWindow::new();
        window.set_height(3);
        for _ in 0..5 {
            window.select_next(10);
        }
        assert_eq!(window.selected(), Some(4));
        assert_eq!(window.visible_range(10), 2..5);

        window.page_up(10);
        assert_eq!(window.selected(), Some(2));
        assert_eq!(window.offset(), 2);

        window.select_previous(10);
        assert_eq!(window.visible_range(10), 1..4);

        window.page_down(10);
        window.page_down(10);
        window.page_down(10);
        window.page_down(10);
        assert_eq!(window.selected(), Some(9));
        assert_eq!(window.visible_range(10), 7..10);
    }

    #[test]
    fn test_clamp_after_shrink() {
        let mut window = VirtualWindow::new();
        window.set_height(4);
        window.select_last(50);
        window.clamp(3);
        assert_eq!(window.selected(), Some(2));
        assert_eq!(window.visible_range(3), 2..3);

        window.clamp(0);
        assert_eq!(window.selected(), None);
        assert_eq!(window.visible_range(0), 0..0);
    }
}
