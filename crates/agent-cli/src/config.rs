//! Environment configuration

use std::time::Duration;

use agent_runtime::OpenAiConfig;
use anyhow::{Context, Result, bail};

/// Everything the REPL needs, read from the environment
#[derive(Clone, Debug)]
pub struct CliConfig {
    /// Provider connection settings
    pub openai: OpenAiConfig,

    /// Act cycles allowed per turn
    pub max_cycles: usize,

    /// Stop the REPL after this many turns
    pub max_turns: Option<usize>,
}

impl CliConfig {
    pub const DEFAULT_MAX_CYCLES: usize = 10;
    pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

    /// Read from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read through `lookup`; blank values count as unset.
    ///
    /// A missing `OPENAI_API_KEY` is an error.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let Some(api_key) = get("OPENAI_API_KEY") else {
            bail!("OPENAI_API_KEY is not set. Add it to your environment or a .env file.");
        };

        let mut openai = OpenAiConfig::new(api_key.trim());
        if let Some(model) = get("OPENAI_MODEL") {
            openai.model = model.trim().to_string();
        }
        if let Some(base_url) = get("OPENAI_BASE_URL") {
            openai.base_url = base_url.trim().to_string();
        }
        let timeout_secs =
            parse_var(&get, "AGENT_TIMEOUT_SECS")?.unwrap_or(Self::DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            bail!("AGENT_TIMEOUT_SECS must be greater than zero");
        }
        openai.timeout = Duration::from_secs(timeout_secs);

        let max_cycles = parse_var(&get, "AGENT_MAX_CYCLES")?.unwrap_or(Self::DEFAULT_MAX_CYCLES);
        if max_cycles == 0 {
            bail!("AGENT_MAX_CYCLES must be greater than zero");
        }

        Ok(Self {
            openai,
            max_cycles,
            max_turns: parse_var(&get, "AGENT_MAX_TURNS")?,
        })
    }
}

fn parse_var<T>(get: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    get(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("{key} has an invalid value: {raw:?}"))
        })
        .transpose()
}
