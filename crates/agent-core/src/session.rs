//! Session Management
//!
//! Tracks one interactive run: its id, when it started and how many turns
//! it has used against an optional budget. Nothing here is persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique session identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An interactive session
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    /// Unique identifier
    pub id: SessionId,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last activity timestamp
    pub updated_at: DateTime<Utc>,

    /// Turns completed so far
    turns: usize,

    /// Stop prompting once this many turns have run
    max_turns: Option<usize>,
}

impl Session {
    /// Create a new session
    pub fn new(max_turns: Option<usize>) -> Self {
        let now = Utc::now();
        Self {
            id: SessionId::new(),
            created_at: now,
            updated_at: now,
            turns: 0,
            max_turns,
        }
    }

    /// Whether another turn may be started
    pub fn has_budget(&self) -> bool {
        self.max_turns.is_none_or(|max| self.turns < max)
    }

    /// Count a finished turn (successful or not)
    pub fn record_turn(&mut self) {
        self.turns += 1;
        self.updated_at = Utc::now();
    }

    pub const fn turns(&self) -> usize {
        self.turns
    }

    /// Turns left in the budget, if there is one
    pub fn remaining(&self) -> Option<usize> {
        self.max_turns.map(|max| max.saturating_sub(self.turns))
    }

    /// Duration since creation
    pub fn duration(&self) -> chrono::Duration {
        self.updated_at - self.created_at
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(None)
    }
}
