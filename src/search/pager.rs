//! "Show more" pagination over an already ordered result list

use crate::search::config::SearchConfig;

/// Visible window over a result list.
///
/// Extending the window only slices; it never reorders or refilters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    visible: usize,
    initial: usize,
    step: usize,
    cap: usize,
}

impl Pager {
    pub fn new(initial: usize, step: usize, cap: usize) -> Self {
        Self {
            visible: initial,
            initial,
            step,
            cap,
        }
    }

    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(
            config.initial_page_size,
            config.page_step,
            config.max_display_results,
        )
    }

    /// Back to the initial window
    pub fn reset(&mut self) {
        self.visible = self.initial;
    }

    /// Results that may ever be displayed out of `total`
    pub fn displayable(&self, total: usize) -> usize {
        total.min(self.cap)
    }

    /// Number of results currently visible out of `total`
    pub fn visible_len(&self, total: usize) -> usize {
        self.visible.min(self.displayable(total))
    }

    pub fn window<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[..self.visible_len(items.len())]
    }

    pub fn has_more(&self, total: usize) -> bool {
        self.visible_len(total) < self.displayable(total)
    }

    /// Displayable results not yet visible
    pub fn remaining(&self, total: usize) -> usize {
        self.displayable(total) - self.visible_len(total)
    }

    /// Whether the window has reached the display cap while more results exist
    pub fn is_capped(&self, total: usize) -> bool {
        total > self.cap && !self.has_more(total)
    }

    /// Extend the window by one step; returns how many results became visible
    pub fn show_more(&mut self, total: usize) -> usize {
        let before = self.visible_len(total);
        self.visible = (before + self.step).min(self.displayable(total));
        self.visible_len(total) - before
    }
}

impl Default for Pager {
    fn default() -> Self {
        Self::from_config(&SearchConfig::default())
    }
}
