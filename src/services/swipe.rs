// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Swipe session state machine.
//!
//! A session is a sequential cursor over one collection's items plus a
//! tagged history of swipe actions. It is pure state: directions are
//! opaque data here, and the save side effect of a right-swipe belongs to
//! the caller (see `routes::swiper`). Malformed calls (swiping while
//! idle, undoing an empty history) are no-ops, not errors - the UI gates
//! control availability on session state.
//!
//! Invariant: while a session is active, `index < items.len()`. The swipe
//! that consumes the last item closes the session in the same transition,
//! so `index == len` is never an observable active state.

use crate::models::Item;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

/// Physical swipe direction. Meaning (left=ignore, right=save, down=skip)
/// is interpreted by the collaborator receiving the action, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeDirection {
    Left,
    Right,
    Down,
}

/// One recorded swipe.
#[derive(Debug, Clone, Serialize)]
pub struct SwipeAction {
    pub direction: SwipeDirection,
    pub item: Item,
    pub timestamp: DateTime<Utc>,
}

/// The active part of a session: which collection, which items, where.
#[derive(Debug, Clone)]
struct ActiveSwipe {
    collection_id: String,
    items: Vec<Item>,
    index: usize,
}

/// Per-user swipe session state.
///
/// History outlives the active cursor (a session that exhausts its
/// collection keeps its history until the next open or reset), matching
/// the teardown semantics the UI expects.
#[derive(Debug, Default)]
pub struct SwiperState {
    active: Option<ActiveSwipe>,
    history: Vec<SwipeAction>,
}

impl SwiperState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a collection for swiping.
    ///
    /// No-op when the item list is empty - callers are expected to check
    /// before opening, and this machine does not self-validate.
    pub fn open_collection(&mut self, collection_id: String, items: Vec<Item>) {
        if items.is_empty() {
            return;
        }
        self.active = Some(ActiveSwipe {
            collection_id,
            items,
            index: 0,
        });
        self.history.clear();
    }

    /// Record a swipe on the current item and advance the cursor.
    ///
    /// Returns the recorded action, or None when there is no active
    /// session. Consuming the last item closes the session atomically.
    pub fn swipe(&mut self, direction: SwipeDirection) -> Option<SwipeAction> {
        let active = self.active.as_mut()?;
        let item = active.items.get(active.index)?.clone();

        let action = SwipeAction {
            direction,
            item,
            timestamp: Utc::now(),
        };
        self.history.push(action.clone());

        if active.index + 1 < active.items.len() {
            active.index += 1;
        } else {
            // Exhausted: close in the same transition.
            self.active = None;
        }

        Some(action)
    }

    /// Rewind the cursor by one swipe.
    ///
    /// Pops the last history entry and steps the index back, floored at
    /// zero. Never compensates external effects - an already-saved item
    /// stays saved.
    pub fn undo(&mut self) {
        if self.history.pop().is_none() {
            return;
        }
        if let Some(active) = self.active.as_mut() {
            active.index = active.index.saturating_sub(1);
        }
    }

    /// Close the session, keeping history until the next open.
    pub fn close(&mut self) {
        self.active = None;
    }

    /// Full teardown.
    pub fn reset(&mut self) {
        self.active = None;
        self.history.clear();
    }

    /// The item under the cursor, or None when idle.
    pub fn current_item(&self) -> Option<&Item> {
        let active = self.active.as_ref()?;
        active.items.get(active.index)
    }

    /// 1-based progress for display: (current, total), or (0, 0) when idle.
    pub fn progress(&self) -> (usize, usize) {
        match &self.active {
            Some(active) => (active.index + 1, active.items.len()),
            None => (0, 0),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// ID of the collection being swiped, if any.
    pub fn collection_id(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.collection_id.as_str())
    }

    pub fn history(&self) -> &[SwipeAction] {
        &self.history
    }
}

/// Shared registry of swipe sessions, one per user.
///
/// Sessions are single-consumer by construction (one interactive user,
/// one collection at a time); the map only makes the holder shareable
/// across request handlers.
#[derive(Default)]
pub struct SwiperRegistry {
    sessions: DashMap<String, SwiperState>,
}

impl SwiperRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a collection for the user, replacing any previous session.
    /// Returns false when the collection has no items.
    pub fn open(&self, user_id: &str, collection_id: String, items: Vec<Item>) -> bool {
        let mut entry = self.sessions.entry(user_id.to_string()).or_default();
        entry.open_collection(collection_id, items);
        entry.is_active()
    }

    /// Swipe for the user; None when no session is active.
    pub fn swipe(&self, user_id: &str, direction: SwipeDirection) -> Option<SwipeAction> {
        self.sessions.get_mut(user_id)?.swipe(direction)
    }

    pub fn undo(&self, user_id: &str) {
        if let Some(mut state) = self.sessions.get_mut(user_id) {
            state.undo();
        }
    }

    pub fn progress(&self, user_id: &str) -> (usize, usize) {
        self.sessions
            .get(user_id)
            .map(|s| s.progress())
            .unwrap_or((0, 0))
    }

    pub fn current_item(&self, user_id: &str) -> Option<Item> {
        self.sessions.get(user_id)?.current_item().cloned()
    }

    /// Close and drop the user's session.
    pub fn close(&self, user_id: &str) {
        self.sessions.remove(user_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MediaType;

    fn item(id: &str, position: u32) -> Item {
        Item {
            id: id.to_string(),
            collection_id: "c1".to_string(),
            external_id: format!("ext-{}", id),
            media_type: MediaType::Movie,
            title: format!("Title {}", id),
            image: None,
            year: None,
            rating: None,
            review: None,
            metadata: None,
            position,
            created_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    fn three_item_session() -> SwiperState {
        let mut state = SwiperState::new();
        state.open_collection(
            "c1".to_string(),
            vec![item("a", 0), item("b", 1), item("c", 2)],
        );
        state
    }

    #[test]
    fn test_open_empty_collection_is_noop() {
        let mut state = SwiperState::new();
        state.open_collection("c1".to_string(), vec![]);
        assert!(!state.is_active());
        assert_eq!(state.progress(), (0, 0));
        assert!(state.current_item().is_none());
    }

    #[test]
    fn test_swipe_while_idle_is_noop() {
        let mut state = SwiperState::new();
        assert!(state.swipe(SwipeDirection::Left).is_none());
        assert!(state.history().is_empty());
    }

    #[test]
    fn test_full_traversal_closes_on_last_swipe() {
        let mut state = three_item_session();

        assert_eq!(state.current_item().unwrap().id, "a");
        state.swipe(SwipeDirection::Left);
        assert_eq!(state.progress(), (2, 3));

        state.swipe(SwipeDirection::Right);
        // Before the exhausting swipe: on the last item, still active.
        assert_eq!(state.progress(), (3, 3));
        assert!(state.is_active());

        state.swipe(SwipeDirection::Down);
        // Exhausted: idle in the same transition, never index == len.
        assert!(!state.is_active());
        assert_eq!(state.progress(), (0, 0));

        let directions: Vec<SwipeDirection> =
            state.history().iter().map(|a| a.direction).collect();
        assert_eq!(
            directions,
            vec![
                SwipeDirection::Left,
                SwipeDirection::Right,
                SwipeDirection::Down
            ]
        );
        let swiped: Vec<&str> = state
            .history()
            .iter()
            .map(|a| a.item.id.as_str())
            .collect();
        assert_eq!(swiped, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_swipe_after_exhaustion_is_noop() {
        let mut state = three_item_session();
        for _ in 0..3 {
            state.swipe(SwipeDirection::Down);
        }
        assert!(state.swipe(SwipeDirection::Left).is_none());
        assert_eq!(state.history().len(), 3);
    }

    #[test]
    fn test_undo_on_fresh_session_is_noop() {
        let mut state = three_item_session();
        state.undo();
        assert_eq!(state.progress(), (1, 3));
        assert_eq!(state.current_item().unwrap().id, "a");
        assert!(state.history().is_empty());
    }

    #[test]
    fn test_undo_rewinds_one_step() {
        let mut state = three_item_session();
        state.swipe(SwipeDirection::Left);
        assert_eq!(state.current_item().unwrap().id, "b");

        state.undo();
        assert_eq!(state.current_item().unwrap().id, "a");
        assert!(state.history().is_empty());

        // The rewound item can be swiped again.
        let action = state.swipe(SwipeDirection::Right).unwrap();
        assert_eq!(action.item.id, "a");
    }

    #[test]
    fn test_undo_is_single_step_per_call() {
        let mut state = three_item_session();
        state.swipe(SwipeDirection::Left);
        state.swipe(SwipeDirection::Left);
        assert_eq!(state.current_item().unwrap().id, "c");

        state.undo();
        state.undo();
        assert_eq!(state.current_item().unwrap().id, "a");

        // History drained; a third undo is a no-op at index 0.
        state.undo();
        assert_eq!(state.current_item().unwrap().id, "a");
    }

    #[test]
    fn test_close_retains_history() {
        let mut state = three_item_session();
        state.swipe(SwipeDirection::Right);
        state.close();
        assert!(!state.is_active());
        assert_eq!(state.history().len(), 1);

        state.reset();
        assert!(state.history().is_empty());
    }

    #[test]
    fn test_reopen_clears_history() {
        let mut state = three_item_session();
        state.swipe(SwipeDirection::Right);
        state.open_collection("c2".to_string(), vec![item("x", 0)]);
        assert!(state.history().is_empty());
        assert_eq!(state.progress(), (1, 1));
        assert_eq!(state.collection_id(), Some("c2"));
    }

    #[test]
    fn test_single_item_collection() {
        let mut state = SwiperState::new();
        state.open_collection("c1".to_string(), vec![item("only", 0)]);
        assert_eq!(state.progress(), (1, 1));

        let action = state.swipe(SwipeDirection::Right).unwrap();
        assert_eq!(action.item.id, "only");
        assert!(!state.is_active());
    }

    #[test]
    fn test_registry_is_per_user() {
        let registry = SwiperRegistry::new();
        assert!(registry.open("u1", "c1".to_string(), vec![item("a", 0), item("b", 1)]));
        assert!(!registry.open("u2", "c9".to_string(), vec![]));

        assert_eq!(registry.progress("u1"), (1, 2));
        assert_eq!(registry.progress("u2"), (0, 0));

        registry.swipe("u1", SwipeDirection::Left);
        assert_eq!(registry.progress("u1"), (2, 2));

        registry.close("u1");
        assert_eq!(registry.progress("u1"), (0, 0));
        assert!(registry.swipe("u1", SwipeDirection::Left).is_none());
    }
}
