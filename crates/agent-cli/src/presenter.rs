//! Terminal rendering of agent events

use std::io::Write;
use std::sync::Mutex;
use std::time::Duration;

use agent_core::{AgentEvent, AgentObserver};
use tokio::task::JoinHandle;

const RESET: &str = "\x1b[0m";
const DIM: &str = "\x1b[90m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";

const THINKING_TICK: Duration = Duration::from_millis(400);

/// Prints progress and replies to stdout.
///
/// While a provider request is in flight a small animation runs on a
/// background task; any later event stops it.
#[derive(Default)]
pub struct Presenter {
    thinking: Mutex<Option<JoinHandle<()>>>,
}

impl Presenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn banner(&self, model: &str, tools: &[&str]) {
        println!("{CYAN}Coding agent{RESET} {DIM}({model}){RESET}");
        println!("{DIM}Tools: {}{RESET}", tools.join(", "));
        println!("{DIM}Type 'exit' or 'quit' to leave.{RESET}");
    }

    pub fn prompt(&self) {
        print!("\n{CYAN}--> {RESET}");
        flush();
    }

    pub fn notice(&self, text: &str) {
        println!("{DIM}{text}{RESET}");
    }

    /// Stop the thinking animation if it is running
    pub fn stop_thinking(&self) {
        let handle = match self.thinking.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(handle) = handle {
            handle.abort();
            println!();
        }
    }

    fn start_thinking(&self) {
        // Only possible inside the runtime; outside it just skip the animation.
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            return;
        };

        print!("\n{DIM}/[-_-]\\ hm");
        flush();
        let handle = runtime.spawn(async {
            let mut ticks = tokio::time::interval(THINKING_TICK);
            ticks.tick().await;
            loop {
                ticks.tick().await;
                print!("m");
                flush();
            }
        });

        if let Ok(mut guard) = self.thinking.lock() {
            if let Some(previous) = guard.replace(handle) {
                previous.abort();
            }
        }
    }
}

impl AgentObserver for Presenter {
    fn on_event(&self, event: &AgentEvent) {
        self.stop_thinking();
        match event {
            AgentEvent::Started { .. } => self.start_thinking(),
            AgentEvent::ToolInvoked { name, .. } => {
                println!("{YELLOW}[°o°]/ Calling tool {name}...{RESET}");
            }
            AgentEvent::Responded { text } => {
                println!("{GREEN}[°_°]{RESET} {text}");
            }
            AgentEvent::Errored { message } => {
                println!("{RED}\\[°x°]/ {message}{RESET}");
            }
        }
    }
}

impl Drop for Presenter {
    fn drop(&mut self) {
        if let Ok(mut guard) = self.thinking.lock() {
            if let Some(handle) = guard.take() {
                handle.abort();
            }
        }
    }
}

fn flush() {
    let _ = std::io::stdout().flush();
}
