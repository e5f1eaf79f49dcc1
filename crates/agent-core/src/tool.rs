//! Tool System
//!
//! Extensible tool framework for agent capabilities.
//! Tools are registered once at startup and invoked by the reasoning loop.

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{AgentError, Result};

/// Parameter definition for tool schema
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSchema {
    /// Parameter name
    pub name: String,

    /// JSON Schema type (string, number, boolean, object, array)
    #[serde(rename = "type")]
    pub param_type: String,

    /// Human-readable description
    pub description: String,

    /// Enum of allowed values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
}

impl ParameterSchema {
    pub fn new(
        name: impl Into<String>,
        param_type: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            param_type: param_type.into(),
            description: description.into(),
            enum_values: None,
        }
    }

    /// Restrict the parameter to a fixed set of values
    #[must_use]
    pub fn with_enum<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        self.enum_values = (!values.is_empty()).then_some(values);
        self
    }
}

/// Tool definition advertised to the model
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique tool identifier
    pub name: String,

    /// Human-readable description (shown to LLM)
    pub description: String,

    /// Parameter definitions, in declaration order
    pub parameters: Vec<ParameterSchema>,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
        }
    }

    /// Declare a parameter
    #[must_use]
    pub fn param(mut self, parameter: ParameterSchema) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Every declared parameter is required
    pub fn required(&self) -> Vec<&str> {
        self.parameters.iter().map(|p| p.name.as_str()).collect()
    }

    /// JSON Schema object describing the parameters
    pub fn json_schema(&self) -> Value {
        let mut properties = Map::new();
        for param in &self.parameters {
            let mut prop = json!({
                "type": param.param_type,
                "description": param.description,
            });
            if let Some(values) = &param.enum_values {
                prop["enum"] = json!(values);
            }
            properties.insert(param.name.clone(), prop);
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": self.required(),
        })
    }

    /// Check that `args` is an object holding every required parameter
    /// and that enumerated parameters use an allowed value.
    pub fn validate(&self, args: &Value) -> Result<()> {
        let invalid = |reason: String| AgentError::ToolArgument {
            tool: self.name.clone(),
            reason,
        };

        let object = args
            .as_object()
            .ok_or_else(|| invalid("arguments must be a JSON object".into()))?;

        for param in &self.parameters {
            let value = object
                .get(&param.name)
                .ok_or_else(|| invalid(format!("missing required parameter: {}", param.name)))?;

            if let Some(allowed) = &param.enum_values {
                let ok = value.as_str().is_some_and(|v| allowed.iter().any(|a| a == v));
                if !ok {
                    return Err(invalid(format!(
                        "{} must be one of: {}",
                        param.name,
                        allowed.join(", ")
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Tool trait - implement to add new capabilities
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool's definition for LLM function calling
    fn definition(&self) -> ToolDefinition;

    /// Execute the tool with already-parsed arguments
    async fn execute(&self, args: &Value) -> anyhow::Result<Value>;
}

/// Adapts a synchronous closure into a [`Tool`]
pub struct FnTool<F> {
    definition: ToolDefinition,
    f: F,
}

impl<F> FnTool<F>
where
    F: Fn(&Value) -> anyhow::Result<Value> + Send + Sync,
{
    pub const fn new(definition: ToolDefinition, f: F) -> Self {
        Self { definition, f }
    }
}

#[async_trait]
impl<F> Tool for FnTool<F>
where
    F: Fn(&Value) -> anyhow::Result<Value> + Send + Sync,
{
    fn definition(&self) -> ToolDefinition {
        self.definition.clone()
    }

    async fn execute(&self, args: &Value) -> anyhow::Result<Value> {
        (self.f)(args)
    }
}

/// Adapts an asynchronous closure into a [`Tool`]
pub struct AsyncFnTool<F> {
    definition: ToolDefinition,
    f: F,
}

impl<F> AsyncFnTool<F>
where
    F: Fn(Value) -> BoxFuture<'static, anyhow::Result<Value>> + Send + Sync,
{
    pub const fn new(definition: ToolDefinition, f: F) -> Self {
        Self { definition, f }
    }
}

#[async_trait]
impl<F> Tool for AsyncFnTool<F>
where
    F: Fn(Value) -> BoxFuture<'static, anyhow::Result<Value>> + Send + Sync,
{
    fn definition(&self) -> ToolDefinition {
        self.definition.clone()
    }

    async fn execute(&self, args: &Value) -> anyhow::Result<Value> {
        (self.f)(args.clone()).await
    }
}

/// Registry for available tools
///
/// Built once at startup, then shared read-only behind an `Arc`.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    definitions: Vec<ToolDefinition>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new tool, rejecting duplicate names
    pub fn register<T: Tool + 'static>(&mut self, tool: T) -> Result<()> {
        self.register_arc(Arc::new(tool))
    }

    /// Register a shared tool, rejecting duplicate names
    pub fn register_arc(&mut self, tool: Arc<dyn Tool>) -> Result<()> {
        let definition = tool.definition();
        if self.index.contains_key(&definition.name) {
            return Err(AgentError::DuplicateTool(definition.name));
        }

        tracing::debug!(tool = %definition.name, "Registered tool");
        self.index.insert(definition.name.clone(), self.tools.len());
        self.definitions.push(definition);
        self.tools.push(tool);
        Ok(())
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.index.get(name).map(|&i| Arc::clone(&self.tools[i]))
    }

    /// Invoke a tool by name
    pub async fn invoke(&self, name: &str, args: &Value) -> Result<Value> {
        let idx = *self
            .index
            .get(name)
            .ok_or_else(|| AgentError::ToolNotFound(name.to_string()))?;

        self.definitions[idx].validate(args)?;

        self.tools[idx]
            .execute(args)
            .await
            .map_err(|source| AgentError::ToolExecution {
                tool: name.to_string(),
                source,
            })
    }

    /// Definitions in registration order
    pub fn definitions(&self) -> &[ToolDefinition] {
        &self.definitions
    }

    /// Get tool names
    pub fn names(&self) -> Vec<&str> {
        self.definitions.iter().map(|d| d.name.as_str()).collect()
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
