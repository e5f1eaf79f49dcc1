//! Lifecycle events emitted by the reasoning loop.
//!
//! The loop never renders anything itself; an [`AgentObserver`] decides how
//! (and whether) to show progress.

use serde::Serialize;

/// Discrete progress events for one turn
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentEvent {
    /// A provider request for this act cycle is about to be sent
    Started { cycle: usize },

    /// A tool call is about to execute
    ToolInvoked { call_id: String, name: String },

    /// The model produced assistant text
    Responded { text: String },

    /// A tool or transport failure, already phrased for the user
    Errored { message: String },
}

/// Receives lifecycle events
pub trait AgentObserver: Send + Sync {
    fn on_event(&self, event: &AgentEvent);
}

impl<F> AgentObserver for F
where
    F: Fn(&AgentEvent) + Send + Sync,
{
    fn on_event(&self, event: &AgentEvent) {
        self(event);
    }
}

/// Observer that ignores everything
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl AgentObserver for NoopObserver {
    fn on_event(&self, _event: &AgentEvent) {}
}
