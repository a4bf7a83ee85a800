use std::collections::VecDeque;

use crate::models::{Alert, AlertId};

pub const DEFAULT_ALERT_LOG_CAPACITY: usize = 10;

/// Newest-first, capacity-bounded list of emitted alerts.
#[derive(Debug, Clone)]
pub struct AlertLog {
    entries: VecDeque<Alert>,
    capacity: usize,
}

impl Default for AlertLog {
    fn default() -> Self {
        Self::new()
    }
}

impl AlertLog {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_ALERT_LOG_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Prepends `alert`; the oldest entries beyond capacity are dropped.
    pub fn add(&mut self, alert: Alert) {
        self.entries.push_front(alert);
        self.entries.truncate(self.capacity);
    }

    /// Returns whether an entry was removed. Unknown ids are ignored.
    pub fn remove(&mut self, id: AlertId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|alert| alert.id != id);
        self.entries.len() != before
    }

    pub fn list(&self) -> Vec<Alert> {
        self.entries.iter().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Alert> {
        self.entries.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Alert> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
