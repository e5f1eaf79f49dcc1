//! # agent-core
//!
//! Core agent logic: provider-agnostic service adapter interface, tool
//! registry and the tool-calling reasoning loop.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Agent                                │
//! │  ┌─────────────┐  ┌─────────────┐  ┌──────────────────────┐  │
//! │  │  Reasoning  │  │    Tool     │  │   ServiceAdapter     │  │
//! │  │    Loop     │──│  Registry   │──│   (Strategy)         │  │
//! │  └─────────────┘  └─────────────┘  └──────────────────────┘  │
//! │         │                                                    │
//! │         └── AgentEvent ──▶ AgentObserver (presentation)      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `ServiceAdapter` trait keeps every provider's wire format out of the
//! loop, so adding a provider never touches the agent logic.

pub mod error;
pub mod events;
pub mod message;
pub mod reasoning;
pub mod service;
pub mod session;
pub mod tool;

pub use error::{AgentError, Result};
pub use events::{AgentEvent, AgentObserver, NoopObserver};
pub use message::{Conversation, Message, Role, ToolCallDescriptor};
pub use reasoning::{Agent, AgentBuilder, AgentConfig, TurnOutcome};
pub use service::{ServiceAction, ServiceAdapter};
pub use session::{Session, SessionId};
pub use tool::{AsyncFnTool, FnTool, ParameterSchema, Tool, ToolDefinition, ToolRegistry};
