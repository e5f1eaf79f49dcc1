//! Interactive coding agent
//!
//! Reads tasks from stdin and lets the model work on the local filesystem
//! through the coding tools until it produces a reply.

mod config;
mod presenter;

use std::sync::Arc;

use agent_core::{AgentBuilder, Session};
use agent_runtime::OpenAiService;
use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::CliConfig;
use crate::presenter::Presenter;

const EXIT_COMMANDS: [&str; 2] = ["exit", "quit"];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so they never interleave with replies
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = CliConfig::from_env()?;

    let tools = Arc::new(coding_tools::registry().context("failed to register tools")?);
    let service = Arc::new(
        OpenAiService::new(config.openai.clone()).context("failed to create OpenAI client")?,
    );
    let presenter = Arc::new(Presenter::new());

    let mut agent = AgentBuilder::new()
        .service(service)
        .tools(Arc::clone(&tools))
        .observer(presenter.clone())
        .system_prompt(coding_tools::CODING_AGENT_PROMPT)
        .max_cycles(config.max_cycles)
        .request_timeout(config.openai.timeout)
        .build()?;

    let mut session = Session::new(config.max_turns);
    tracing::info!(
        session = %session.id,
        model = %config.openai.model,
        tools = tools.len(),
        "Agent ready"
    );
    presenter.banner(&config.openai.model, &tools.names());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while session.has_budget() {
        presenter.prompt();
        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };

        let task = line.trim();
        if is_exit_command(task) {
            break;
        }
        if task.is_empty() {
            continue;
        }

        // Failures were already shown through the observer
        match agent.run_turn(task).await {
            Ok(outcome) => tracing::debug!(
                cycles = outcome.cycles,
                tool_calls = outcome.tool_calls,
                "Turn complete"
            ),
            Err(e) => tracing::debug!(error = %e, "Turn failed"),
        }
        presenter.stop_thinking();
        session.record_turn();
        if let Some(notice) = budget_notice(&session) {
            presenter.notice(&notice);
        }
    }

    if !session.has_budget() {
        presenter.notice(&format!("Turn limit reached after {} turns.", session.turns()));
    }
    tracing::info!(
        session = %session.id,
        turns = session.turns(),
        elapsed_secs = session.duration().num_seconds(),
        "Session finished"
    );
    Ok(())
}

fn is_exit_command(input: &str) -> bool {
    EXIT_COMMANDS
        .iter()
        .any(|command| input.trim().eq_ignore_ascii_case(command))
}

/// Countdown shown while a turn budget is running out
fn budget_notice(session: &Session) -> Option<String> {
    match session.remaining()? {
        0 => None,
        1 => Some("1 turn left in this session.".into()),
        left => Some(format!("{left} turns left in this session.")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_commands() {
        assert!(is_exit_command("exit"));
        assert!(is_exit_command("  QUIT "));
        assert!(is_exit_command("Exit"));
        assert!(!is_exit_command("exit now"));
        assert!(!is_exit_command(""));
    }

    #[test]
    fn test_budget_notice() {
        assert_eq!(budget_notice(&Session::new(None)), None);

        let mut session = Session::new(Some(3));
        session.record_turn();
        assert_eq!(
            budget_notice(&session).as_deref(),
            Some("2 turns left in this session.")
        );
        session.record_turn();
        assert_eq!(
            budget_notice(&session).as_deref(),
            Some("1 turn left in this session.")
        );
        session.record_turn();
        assert_eq!(budget_notice(&session), None);
    }
}
