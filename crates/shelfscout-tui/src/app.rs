// TUI application state and transitions
use shelfscout_cache::QuerySnapshot;
use shelfscout_core::{categorize, Book, CategoryMap};
use std::sync::Arc;

/// What the shell is showing right now
///
/// `Loading` covers both the initial fetch and explicit refetches. An empty
/// fetch result lands in `Error` just like a failed one - there is no
/// separate "empty shelf" screen, and the only way out is a user retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Error,
    Ready,
}

pub struct App {
    pub should_quit: bool,
    pub phase: Phase,
    /// Genre buckets in tab order; rebuilt only when the book list changes
    pub shelf: CategoryMap,
    pub active_tab: usize,
    /// Scroll offset per tab, same length as the shelf
    pub scroll: Vec<usize>,
    last_books: Option<Arc<Vec<Book>>>,
}

impl App {
    pub fn new() -> Self {
        Self {
            should_quit: false,
            phase: Phase::Loading,
            shelf: CategoryMap::new(),
            active_tab: 0,
            scroll: Vec::new(),
            last_books: None,
        }
    }

    /// Fold a query snapshot into the shell's state machine
    ///
    /// Categorization is memoized on the identity of the fetched list: the
    /// same `Arc` coming back leaves the shelf, active tab, and scroll
    /// positions untouched.
    pub fn apply_snapshot(&mut self, snapshot: &QuerySnapshot<Vec<Book>>) {
        if snapshot.is_fetching() {
            self.phase = Phase::Loading;
            return;
        }

        if snapshot.error.is_some() {
            self.phase = Phase::Error;
            return;
        }

        match &snapshot.data {
            Some(books) if !books.is_empty() => {
                let unchanged = self
                    .last_books
                    .as_ref()
                    .is_some_and(|prev| Arc::ptr_eq(prev, books));
                if !unchanged {
                    self.set_books(Arc::clone(books));
                }
                // Every book may still be missing a genre; no tabs means
                // nothing to show
                self.phase = if self.shelf.is_empty() {
                    Phase::Error
                } else {
                    Phase::Ready
                };
            }
            // Empty result is presented the same way as a failure
            _ => self.phase = Phase::Error,
        }
    }

    fn set_books(&mut self, books: Arc<Vec<Book>>) {
        self.shelf = categorize(&books);
        self.active_tab = 0;
        self.scroll = vec![0; self.shelf.len()];
        self.last_books = Some(books);
    }

    /// User asked for another attempt; the caller drives the actual refetch
    pub fn retry(&mut self) {
        self.phase = Phase::Loading;
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn next_tab(&mut self) {
        if !self.shelf.is_empty() {
            self.active_tab = (self.active_tab + 1) % self.shelf.len();
        }
    }

    pub fn previous_tab(&mut self) {
        if !self.shelf.is_empty() {
            self.active_tab = (self.active_tab + self.shelf.len() - 1) % self.shelf.len();
        }
    }

    /// The bucket behind the active tab
    pub fn active_bucket(&self) -> Option<(&str, &[Book])> {
        self.shelf.bucket_at(self.active_tab)
    }

    pub fn scroll_down(&mut self) {
        let limit = self
            .active_bucket()
            .map(|(_, bucket)| bucket.len().saturating_sub(1))
            .unwrap_or(0);
        if let Some(offset) = self.scroll.get_mut(self.active_tab) {
            *offset = (*offset + 1).min(limit);
        }
    }

    pub fn scroll_up(&mut self) {
        if let Some(offset) = self.scroll.get_mut(self.active_tab) {
            *offset = offset.saturating_sub(1);
        }
    }

    pub fn active_scroll(&self) -> usize {
        self.scroll.get(self.active_tab).copied().unwrap_or(0)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelfscout_cache::FetchError;

    fn book(title: &str, genre: Option<&str>) -> Book {
        Book {
            id: None,
            title: title.to_string(),
            author: "someone".to_string(),
            published_date: 1577836800,
            genre: genre.map(String::from),
        }
    }

    fn snapshot(
        data: Option<Arc<Vec<Book>>>,
        error: Option<FetchError>,
        fetching: bool,
    ) -> QuerySnapshot<Vec<Book>> {
        QuerySnapshot {
            data,
            error,
            is_loading: fetching,
            is_refetching: false,
        }
    }

    #[test]
    fn test_fetch_in_flight_shows_loading() {
        let mut app = App::new();
        app.apply_snapshot(&snapshot(None, None, true));
        assert_eq!(app.phase, Phase::Loading);
    }

    #[test]
    fn test_failure_and_empty_result_both_show_error() {
        let mut app = App::new();
        app.apply_snapshot(&snapshot(None, Some(FetchError("boom".into())), false));
        assert_eq!(app.phase, Phase::Error);

        let mut app = App::new();
        app.apply_snapshot(&snapshot(Some(Arc::new(Vec::new())), None, false));
        assert_eq!(app.phase, Phase::Error);
    }

    #[test]
    fn test_all_ungenred_books_show_error() {
        let mut app = App::new();
        let books = Arc::new(vec![book("A", None), book("B", None)]);
        app.apply_snapshot(&snapshot(Some(books), None, false));
        assert_eq!(app.phase, Phase::Error);
    }

    #[test]
    fn test_ready_selects_first_genre_tab() {
        let mut app = App::new();
        let books = Arc::new(vec![
            book("A", Some("Sci-Fi")),
            book("B", Some("Sci-Fi")),
            book("C", Some("Drama")),
        ]);
        app.apply_snapshot(&snapshot(Some(books), None, false));

        assert_eq!(app.phase, Phase::Ready);
        assert_eq!(app.active_tab, 0);
        assert_eq!(app.shelf.first_genre(), Some("Sci-Fi"));
        assert_eq!(app.active_bucket().map(|(_, b)| b.len()), Some(2));
    }

    #[test]
    fn test_retry_leaves_error_for_loading() {
        let mut app = App::new();
        app.apply_snapshot(&snapshot(None, Some(FetchError("boom".into())), false));
        app.retry();
        assert_eq!(app.phase, Phase::Loading);
    }

    #[test]
    fn test_unchanged_book_list_preserves_tab_and_scroll() {
        let mut app = App::new();
        let books = Arc::new(vec![
            book("A", Some("Sci-Fi")),
            book("B", Some("Drama")),
            book("C", Some("Drama")),
        ]);
        app.apply_snapshot(&snapshot(Some(Arc::clone(&books)), None, false));
        app.next_tab();
        app.scroll_down();
        assert_eq!(app.active_tab, 1);
        assert_eq!(app.active_scroll(), 1);

        // Same Arc comes back from the cache: nothing recomputed or reset
        app.apply_snapshot(&snapshot(Some(Arc::clone(&books)), None, false));
        assert_eq!(app.active_tab, 1);
        assert_eq!(app.active_scroll(), 1);

        // A different list resets the view
        let changed = Arc::new(vec![book("D", Some("Poetry"))]);
        app.apply_snapshot(&snapshot(Some(changed), None, false));
        assert_eq!(app.active_tab, 0);
        assert_eq!(app.shelf.first_genre(), Some("Poetry"));
    }

    #[test]
    fn test_tab_cycling_wraps() {
        let mut app = App::new();
        let books = Arc::new(vec![
            book("A", Some("Sci-Fi")),
            book("B", Some("Drama")),
        ]);
        app.apply_snapshot(&snapshot(Some(books), None, false));

        app.next_tab();
        assert_eq!(app.active_tab, 1);
        app.next_tab();
        assert_eq!(app.active_tab, 0);
        app.previous_tab();
        assert_eq!(app.active_tab, 1);
    }

    #[test]
    fn test_scroll_clamps_to_bucket() {
        let mut app = App::new();
        let books = Arc::new(vec![
            book("A", Some("Sci-Fi")),
            book("B", Some("Sci-Fi")),
        ]);
        app.apply_snapshot(&snapshot(Some(books), None, false));

        app.scroll_up();
        assert_eq!(app.active_scroll(), 0);
        app.scroll_down();
        app.scroll_down();
        app.scroll_down();
        assert_eq!(app.active_scroll(), 1);
    }
}
