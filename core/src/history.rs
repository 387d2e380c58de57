// Copyright (c) 2023 Mike Tsao. All rights reserved.

use std::collections::VecDeque;

/// A bounded first-in-first-out record of recent items. Once it holds
/// `capacity` items, each push evicts the oldest.
///
/// Quizzes use it to avoid asking the same question twice in a row.
#[derive(Clone, Debug)]
pub struct RecentHistory<T> {
    capacity: usize,
    items: VecDeque<T>,
}
impl<T> Default for RecentHistory<T> {
    fn default() -> Self {
        Self::new_with(Self::DEFAULT_CAPACITY)
    }
}
impl<T> RecentHistory<T> {
    /// How many items are remembered unless the caller says otherwise.
    pub const DEFAULT_CAPACITY: usize = 3;

    /// A capacity of zero remembers nothing.
    pub fn new_with(capacity: usize) -> Self {
        Self {
            capacity,
            items: VecDeque::with_capacity(capacity),
        }
    }

    /// Records an item, returning whatever had to be evicted to make room.
    pub fn push(&mut self, item: T) -> Option<T> {
        if self.capacity == 0 {
            return Some(item);
        }
        let evicted = if self.items.len() >= self.capacity {
            self.items.pop_front()
        } else {
            None
        };
        self.items.push_back(item);
        evicted
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn most_recent(&self) -> Option<&T> {
        self.items.back()
    }
}
impl<T: PartialEq> RecentHistory<T> {
    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest_when_full() {
        let mut history = RecentHistory::new_with(2);
        assert!(history.is_empty());
        assert_eq!(history.push(1), None);
        assert_eq!(history.push(2), None);
        assert!(history.is_full());
        assert_eq!(history.push(3), Some(1));
        assert_eq!(history.len(), 2);
        assert!(!history.contains(&1));
        assert!(history.contains(&2));
        assert!(history.contains(&3));
        assert_eq!(history.iter().copied().collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(history.most_recent(), Some(&3));
    }

    #[test]
    fn zero_capacity_remembers_nothing() {
        let mut history = RecentHistory::new_with(0);
        assert_eq!(history.push("a"), Some("a"));
        assert!(history.is_empty());
        assert!(!history.contains(&"a"));
    }

    #[test]
    fn clear_forgets_everything() {
        let mut history = RecentHistory::<u8>::default();
        assert_eq!(history.capacity(), RecentHistory::<u8>::DEFAULT_CAPACITY);
        for i in 0..10 {
            history.push(i);
        }
        assert_eq!(history.len(), 3);
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.most_recent(), None);
    }
}
