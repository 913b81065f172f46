//! Client-side cache state for one API resource.
//!
//! A [`Resource`] is a plain value: every transition consumes the current
//! state and returns the next one, so a UI layer can own as many independent
//! containers as it needs and swap them atomically.

use serde::{Deserialize, Serialize};

/// Cached data for one resource plus its fetch status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource<T> {
    pub data: T,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T: Default> Default for Resource<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Resource<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            loading: false,
            error: None,
        }
    }

    /// A fetch was started. Existing data stays visible.
    pub fn started(self) -> Self {
        Self {
            loading: true,
            error: None,
            ..self
        }
    }

    /// A fetch completed with fresh data.
    pub fn loaded(self, data: T) -> Self {
        Self {
            data,
            loading: false,
            error: None,
        }
    }

    /// A fetch or mutation failed. Existing data is kept.
    pub fn failed(self, error: impl Into<String>) -> Self {
        Self {
            loading: false,
            error: Some(error.into()),
            ..self
        }
    }
}

/// Items that can be located in a cached list by identifier.
pub trait Keyed {
    type Key: PartialEq;

    fn key(&self) -> &Self::Key;
}

impl<T: Keyed> Resource<Vec<T>> {
    /// Append a freshly created item.
    pub fn inserted(mut self, item: T) -> Self {
        self.data.push(item);
        self.error = None;
        self
    }

    /// Replace the item with the same key, leaving the rest untouched.
    pub fn replaced(mut self, item: T) -> Self {
        if let Some(slot) = self.data.iter_mut().find(|i| i.key() == item.key()) {
            *slot = item;
        }
        self.error = None;
        self
    }

    /// Drop the item with `key`.
    pub fn removed(mut self, key: &T::Key) -> Self {
        self.data.retain(|i| i.key() != key);
        self.error = None;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: u32,
        name: &'static str,
    }

    impl Keyed for Item {
        type Key = u32;

        fn key(&self) -> &u32 {
            &self.id
        }
    }

    fn item(id: u32, name: &'static str) -> Item {
        Item { id, name }
    }

    #[test]
    fn test_fetch_lifecycle() {
        let state: Resource<Vec<Item>> = Resource::default();
        let state = state.started();
        assert!(state.loading);

        let state = state.loaded(vec![item(1, "balloons")]);
        assert!(!state.loading);
        assert_eq!(state.data.len(), 1);

        let state = state.started().failed("Failed to fetch decorations");
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("Failed to fetch decorations"));
        // stale data survives a failed refresh
        assert_eq!(state.data, vec![item(1, "balloons")]);
    }

    #[test]
    fn test_list_mutations() {
        let state = Resource::new(vec![item(1, "balloons"), item(2, "banner")])
            .inserted(item(3, "confetti"))
            .replaced(item(2, "gold banner"))
            .removed(&1);

        assert_eq!(state.data, vec![item(2, "gold banner"), item(3, "confetti")]);
    }

    #[test]
    fn test_replace_unknown_key_is_noop() {
        let state = Resource::new(vec![item(1, "balloons")]).replaced(item(9, "ghost"));
        assert_eq!(state.data, vec![item(1, "balloons")]);
    }

    #[test]
    fn test_containers_are_independent() {
        let categories = Resource::new(vec![item(1, "birthday")]);
        let decorations: Resource<Vec<Item>> = Resource::default().started();

        assert!(!categories.loading);
        assert!(decorations.loading);
    }
}
