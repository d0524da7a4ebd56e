//! Fetch-time tracking for catalog entries.

use crate::ids::ProductId;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

/// Records when each entry was last fetched.
///
/// An entry with no stamp, or a stamp older than the window, is stale.
/// Nothing here fetches; consumers decide when to refresh.
#[derive(Debug, Clone)]
pub struct FetchTracker {
    fetched_at: HashMap<ProductId, DateTime<Utc>>,
    window: Duration,
}

impl FetchTracker {
    pub fn new(window: Duration) -> Self {
        Self {
            fetched_at: HashMap::new(),
            window,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn stamp(&mut self, id: &ProductId, at: DateTime<Utc>) {
        self.fetched_at.insert(id.clone(), at);
    }

    /// Forget an entry entirely.
    pub fn forget(&mut self, id: &ProductId) {
        self.fetched_at.remove(id);
    }

    pub fn clear(&mut self) {
        self.fetched_at.clear();
    }

    /// Clear one stamp, or every stamp when `id` is `None`.
    pub fn invalidate(&mut self, id: Option<&ProductId>) {
        match id {
            Some(id) => self.forget(id),
            None => self.clear(),
        }
    }

    pub fn last_fetched(&self, id: &ProductId) -> Option<DateTime<Utc>> {
        self.fetched_at.get(id).copied()
    }

    pub fn is_stale(&self, id: &ProductId, now: DateTime<Utc>) -> bool {
        match self.fetched_at.get(id) {
            Some(at) => now - *at > self.window,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 1, 8, 0, 0).unwrap()
    }

    #[test]
    fn test_fresh_until_window_passes() {
        let mut tracker = FetchTracker::new(Duration::seconds(300));
        let id = ProductId::new("a");
        tracker.stamp(&id, start());

        assert!(!tracker.is_stale(&id, start() + Duration::seconds(300)));
        assert!(tracker.is_stale(&id, start() + Duration::seconds(301)));
    }

    #[test]
    fn test_unstamped_is_stale() {
        let tracker = FetchTracker::new(Duration::seconds(300));
        assert!(tracker.is_stale(&ProductId::new("a"), start()));
    }

    #[test]
    fn test_invalidate_one_or_all() {
        let mut tracker = FetchTracker::new(Duration::seconds(300));
        let a = ProductId::new("a");
        let b = ProductId::new("b");
        tracker.stamp(&a, start());
        tracker.stamp(&b, start());

        tracker.invalidate(Some(&a));
        assert_eq!(tracker.last_fetched(&a), None);
        assert_eq!(tracker.last_fetched(&b), Some(start()));

        tracker.invalidate(None);
        assert_eq!(tracker.last_fetched(&b), None);
    }
}
