//! Reasoning Loop
//!
//! Drives one user turn through repeated act cycles: send the conversation,
//! classify the reply, run any requested tools, append their results and go
//! again until a cycle services no tool calls.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use crate::error::{AgentError, Result};
use crate::events::{AgentEvent, AgentObserver, NoopObserver};
use crate::message::{Conversation, Message, Role, ToolCallDescriptor};
use crate::service::{ServiceAction, ServiceAdapter};
use crate::tool::ToolRegistry;

/// Agent configuration
#[derive(Clone, Debug)]
pub struct AgentConfig {
    /// System prompt sent at the start of every turn
    pub system_prompt: String,

    /// Maximum act cycles (provider round-trips) per turn
    pub max_cycles: usize,

    /// Upper bound on a single provider call
    pub request_timeout: Duration,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.into(),
            max_cycles: 10,
            request_timeout: Duration::from_secs(60),
        }
    }
}

const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Summary of a completed turn
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnOutcome {
    /// Final assistant text (may be empty)
    pub reply: String,

    /// Provider round-trips used
    pub cycles: usize,

    /// Tool calls serviced across all cycles
    pub tool_calls: usize,
}

/// The main Agent struct
pub struct Agent<S: ServiceAdapter> {
    service: Arc<S>,
    tools: Arc<ToolRegistry>,
    config: AgentConfig,
    observer: Arc<dyn AgentObserver>,
    context: Conversation,
}

impl<S: ServiceAdapter> Agent<S> {
    /// Create a new agent
    pub fn new(service: Arc<S>, tools: Arc<ToolRegistry>, config: AgentConfig) -> Self {
        Self {
            service,
            tools,
            config,
            observer: Arc::new(NoopObserver),
            context: Conversation::new(),
        }
    }

    /// Create with default configuration
    pub fn with_defaults(service: Arc<S>, tools: Arc<ToolRegistry>) -> Self {
        Self::new(service, tools, AgentConfig::default())
    }

    /// Route lifecycle events to `observer`
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn AgentObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Run one user turn to completion.
    ///
    /// On success the carried context is collapsed to every user message plus
    /// the final assistant reply. On failure the context is left as it was
    /// before the turn.
    pub async fn run_turn(&mut self, user_prompt: &str) -> Result<TurnOutcome> {
        let mut working = self.build_working_list(user_prompt);
        let turn_start = working.len();
        let mut cycles = 0;
        let mut tool_calls = 0;

        loop {
            if cycles >= self.config.max_cycles {
                let err = AgentError::MaxCycles(self.config.max_cycles);
                tracing::warn!(cycles, "Turn abandoned: {}", err);
                self.emit(AgentEvent::Errored {
                    message: err.user_message(),
                });
                return Err(err);
            }
            cycles += 1;

            self.emit(AgentEvent::Started { cycle: cycles });
            let response = match self.request(&working).await {
                Ok(response) => response,
                Err(err) => {
                    tracing::warn!(cycle = cycles, "Provider request failed: {}", err);
                    self.emit(AgentEvent::Errored {
                        message: err.user_message(),
                    });
                    return Err(err);
                }
            };

            let first_new = working.len();
            working.extend(self.service.classify_response(&response));
            tracing::debug!(
                cycle = cycles,
                received = working.len() - first_new,
                "Classified provider response"
            );

            let serviced = self.act(&mut working, first_new).await;
            tool_calls += serviced;

            if serviced == 0 {
                break;
            }
        }

        self.context = Conversation::collapse(&working, turn_start);
        let reply = self
            .context
            .last()
            .map(|m| m.text().to_string())
            .unwrap_or_default();

        tracing::debug!(
            cycles,
            tool_calls,
            context_tokens = self.context.estimate_tokens(),
            "Turn complete"
        );

        Ok(TurnOutcome {
            reply,
            cycles,
            tool_calls,
        })
    }

    /// System prompt, then the carried context, then the new user message.
    fn build_working_list(&self, user_prompt: &str) -> Vec<Message> {
        let initial = self
            .service
            .format_initial_turn(user_prompt, &self.config.system_prompt);
        let split = initial
            .iter()
            .position(|m| m.role != Role::System)
            .unwrap_or(initial.len());

        let mut working = Vec::with_capacity(initial.len() + self.context.len());
        let mut initial = initial.into_iter();
        working.extend(initial.by_ref().take(split));
        working.extend(self.context.messages().iter().cloned());
        working.extend(initial);
        working
    }

    /// Send the working list, bounded by the request timeout
    async fn request(&self, working: &[Message]) -> Result<S::Response> {
        let timeout = self.config.request_timeout;
        tokio::time::timeout(
            timeout,
            self.service.send_request(working, self.tools.definitions()),
        )
        .await
        .map_err(|_| {
            AgentError::Transport(format!(
                "request timed out after {:.1}s",
                timeout.as_secs_f64()
            ))
        })?
    }

    /// Service every pending tool call in the working list and surface the
    /// assistant messages appended from `first_new` on, in list order.
    ///
    /// Returns the number of tool calls serviced.
    async fn act(&self, working: &mut Vec<Message>, first_new: usize) -> usize {
        let mut serviced = 0;
        let mut idx = 0;

        while idx < working.len() {
            match working[idx].action() {
                Some(ServiceAction::InvokeTool(call)) => {
                    let call = call.clone();
                    let result_text = self.invoke_tool(&call).await;
                    working.push(self.service.format_tool_result(&result_text, &call));
                    working[idx].mark_tool_call_complete();
                    serviced += 1;
                }
                Some(ServiceAction::Respond(text)) if idx >= first_new => {
                    self.emit(AgentEvent::Responded {
                        text: text.to_string(),
                    });
                }
                _ => {}
            }
            idx += 1;
        }

        serviced
    }

    /// Run one tool call and render the outcome for the model.
    ///
    /// Failures are reported to the observer and returned to the model as an
    /// `error` payload; the call still counts as answered.
    async fn invoke_tool(&self, call: &ToolCallDescriptor) -> String {
        tracing::debug!(tool = %call.name, call_id = %call.id, "Executing tool");
        self.emit(AgentEvent::ToolInvoked {
            call_id: call.id.clone(),
            name: call.name.clone(),
        });

        let outcome = match call.parse_arguments() {
            Ok(args) => self.tools.invoke(&call.name, &args).await,
            Err(err) => Err(err),
        };

        match outcome {
            Ok(result) => json!({ "result": result }).to_string(),
            Err(err) => {
                tracing::warn!(tool = %call.name, call_id = %call.id, "Tool call failed: {}", err);
                self.emit(AgentEvent::Errored {
                    message: err.user_message(),
                });
                json!({ "error": err.to_string() }).to_string()
            }
        }
    }

    fn emit(&self, event: AgentEvent) {
        self.observer.on_event(&event);
    }

    /// Context carried into the next turn
    pub const fn context(&self) -> &Conversation {
        &self.context
    }

    /// Get the tool registry
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Get configuration
    pub const fn config(&self) -> &AgentConfig {
        &self.config
    }
}

/// Builder for Agent configuration
pub struct AgentBuilder<S: ServiceAdapter> {
    service: Option<Arc<S>>,
    tools: Arc<ToolRegistry>,
    observer: Option<Arc<dyn AgentObserver>>,
    config: AgentConfig,
}

impl<S: ServiceAdapter> Default for AgentBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ServiceAdapter> AgentBuilder<S> {
    pub fn new() -> Self {
        Self {
            service: None,
            tools: Arc::new(ToolRegistry::new()),
            observer: None,
            config: AgentConfig::default(),
        }
    }

    #[must_use]
    pub fn service(mut self, service: Arc<S>) -> Self {
        self.service = Some(service);
        self
    }

    #[must_use]
    pub fn tools(mut self, tools: Arc<ToolRegistry>) -> Self {
        self.tools = tools;
        self
    }

    #[must_use]
    pub fn observer(mut self, observer: Arc<dyn AgentObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    #[must_use]
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = prompt.into();
        self
    }

    #[must_use]
    pub const fn max_cycles(mut self, max: usize) -> Self {
        self.config.max_cycles = max;
        self
    }

    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    pub fn build(self) -> Result<Agent<S>> {
        let service = self
            .service
            .ok_or_else(|| AgentError::Config("Service adapter is required".into()))?;
        if self.config.max_cycles == 0 {
            return Err(AgentError::Config("max_cycles must be at least 1".into()));
        }

        let agent = Agent::new(service, self.tools, self.config);
        Ok(match self.observer {
            Some(observer) => agent.with_observer(observer),
            None => agent,
        })
    }
}
