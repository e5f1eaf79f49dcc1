//! # agent-runtime
//!
//! Concrete service adapters for the coding agent.
//!
//! ## Providers
//!
//! - **OpenAI** (default): Chat Completions API with function calling.
//!   Any server speaking the same wire format (Ollama's `/v1`, proxies)
//!   works by overriding the base URL.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_runtime::openai::{OpenAiConfig, OpenAiService};
//!
//! let service = OpenAiService::new(OpenAiConfig::new(api_key))?;
//! let agent = AgentBuilder::new()
//!     .service(Arc::new(service))
//!     .tools(Arc::new(registry))
//!     .build()?;
//! ```

#[cfg(feature = "openai")]
pub mod openai;

#[cfg(feature = "openai")]
pub use openai::{OpenAiConfig, OpenAiService};

// Re-export core types for convenience
pub use agent_core::{
    Agent, AgentBuilder, AgentError, AgentEvent, AgentObserver, Message, Result, Role,
    ServiceAdapter, Tool, ToolRegistry,
};
