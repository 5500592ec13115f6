//! Conversation state and per-session caches

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use url::Url;

use super::intent::Intent;
use crate::error::{Error, Result};

/// Which strategy, if any, owns the next turn
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum ConversationState {
    /// No strategy pending; the next turn is tokenized afresh
    #[default]
    Idle,
    /// What/identity lookup in progress
    What,
    /// Domain/range lookup in progress (possibly awaiting a source choice)
    DomainRange,
    /// Domain/range property listing in progress
    DomainRangeProperty,
    /// Assembly lookup in progress
    Assembly,
    /// Subclass/superclass listing in progress
    SubSuper,
}

/// Inputs that drive the conversation state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateEvent {
    /// A strategy was selected for this turn
    Dispatched(Intent),
    /// The strategy produced a terminal answer
    Completed,
    /// The strategy asked the user for another reply
    AwaitingReply,
}

impl ConversationState {
    /// The transition table.
    ///
    /// | from    | event            | to      |
    /// |---------|------------------|---------|
    /// | any     | `Completed`      | `Idle`  |
    /// | `Idle`  | `Dispatched(i)`  | `i`     |
    /// | pending | `Dispatched(_)`  | pending |
    /// | any     | `AwaitingReply`  | same    |
    pub fn next(self, event: StateEvent) -> Self {
        match (self, event) {
            (_, StateEvent::Completed) => ConversationState::Idle,
            (ConversationState::Idle, StateEvent::Dispatched(intent)) => intent.into(),
            (pending, StateEvent::Dispatched(_)) => pending,
            (state, StateEvent::AwaitingReply) => state,
        }
    }

    /// The strategy that owns the next turn, if any
    pub fn pending_intent(&self) -> Option<Intent> {
        match self {
            ConversationState::Idle => None,
            ConversationState::What => Some(Intent::What),
            ConversationState::DomainRange => Some(Intent::DomainRange),
            ConversationState::DomainRangeProperty => Some(Intent::DomainRangeProperty),
            ConversationState::Assembly => Some(Intent::Assembly),
            ConversationState::SubSuper => Some(Intent::SubSuper),
        }
    }

    /// Whether the next turn's raw text should be tokenized and tagged.
    /// Otherwise it is passed through verbatim as a follow-up reply.
    pub fn reparses_input(&self) -> bool {
        *self == ConversationState::Idle
    }
}

impl From<Intent> for ConversationState {
    fn from(intent: Intent) -> Self {
        match intent {
            Intent::What => ConversationState::What,
            Intent::DomainRange => ConversationState::DomainRange,
            Intent::DomainRangeProperty => ConversationState::DomainRangeProperty,
            Intent::Assembly => ConversationState::Assembly,
            Intent::SubSuper => ConversationState::SubSuper,
        }
    }
}

/// Short predicate name to full predicate URI, discovered while answering
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredicateCache {
    entries: HashMap<String, String>,
}

impl PredicateCache {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a predicate; the URI must be absolute
    pub fn insert(&mut self, name: impl Into<String>, uri: &str) -> Result<()> {
        let parsed = Url::parse(uri).map_err(|e| Error::InvalidIri(format!("{}: {}", uri, e)))?;
        if parsed.cannot_be_a_base() {
            return Err(Error::InvalidIri(uri.to_string()));
        }
        self.entries.insert(name.into(), uri.to_string());
        Ok(())
    }

    /// Looks up a predicate URI by short name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Number of cached predicates
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Memoized answers keyed by (subject, predicate); never evicted
#[derive(Debug, Clone, Default)]
pub struct QueryCache {
    entries: HashMap<(String, String), String>,
}

impl QueryCache {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a previously computed answer
    pub fn get(&self, subject: &str, predicate: &str) -> Option<&str> {
        self.entries
            .get(&(subject.to_string(), predicate.to_string()))
            .map(String::as_str)
    }

    /// Stores an answer, keeping the first one seen for a key
    pub fn insert(&mut self, subject: &str, predicate: &str, response: impl Into<String>) {
        self.entries
            .entry((subject.to_string(), predicate.to_string()))
            .or_insert_with(|| response.into());
    }

    /// Number of cached answers
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_dispatch_and_complete() {
        let state = ConversationState::Idle.next(StateEvent::Dispatched(Intent::DomainRange));
        assert_eq!(state, ConversationState::DomainRange);
        assert!(!state.reparses_input());
        assert_eq!(state.next(StateEvent::Completed), ConversationState::Idle);
    }

    #[test]
    fn test_awaiting_reply_keeps_state() {
        let state = ConversationState::DomainRange
            .next(StateEvent::AwaitingReply)
            .next(StateEvent::AwaitingReply);
        assert_eq!(state, ConversationState::DomainRange);
    }

    #[test]
    fn test_pending_state_ignores_other_dispatch() {
        let state = ConversationState::DomainRange.next(StateEvent::Dispatched(Intent::What));
        assert_eq!(state, ConversationState::DomainRange);
    }

    #[test]
    fn test_pending_intent_round_trip() {
        for intent in [
            Intent::What,
            Intent::DomainRange,
            Intent::DomainRangeProperty,
            Intent::Assembly,
            Intent::SubSuper,
        ] {
            assert_eq!(ConversationState::from(intent).pending_intent(), Some(intent));
        }
        assert_eq!(ConversationState::Idle.pending_intent(), None);
        assert!(ConversationState::default().reparses_input());
    }

    #[test]
    fn test_predicate_cache_rejects_relative_uri() {
        let mut cache = PredicateCache::new();
        cache
            .insert("imports", "http://www.w3.org/2002/07/owl#imports")
            .unwrap();
        assert_eq!(cache.get("imports"), Some("http://www.w3.org/2002/07/owl#imports"));
        assert!(cache.insert("bad", "imports").is_err());
        assert!(cache.insert("bad", "mailto:someone").is_err());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_query_cache_keeps_first_answer() {
        let mut cache = QueryCache::new();
        assert!(cache.is_empty());
        cache.insert("mission", "imports", "first");
        cache.insert("mission", "imports", "second");
        assert_eq!(cache.get("mission", "imports"), Some("first"));
        assert_eq!(cache.get("imports", "mission"), None);
    }
}
