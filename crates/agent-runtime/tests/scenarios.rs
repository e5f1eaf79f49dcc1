//! End-to-end turns through the OpenAI adapter with the coding tools.
//!
//! The network is replaced by a scripted transport that records every
//! request it receives.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use agent_core::{Agent, AgentBuilder, AgentEvent, Role};
use agent_runtime::openai::types::{ChatRequest, ChatResponse};
use agent_runtime::openai::{OpenAiService, Transport};
use agent_runtime::{AgentError, Result};
use async_trait::async_trait;
use serde_json::{Value, json};

#[derive(Default)]
struct FakeTransport {
    replies: Mutex<VecDeque<ChatResponse>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl FakeTransport {
    fn scripted(replies: Vec<Value>) -> Arc<Self> {
        let replies = replies
            .into_iter()
            .map(|v| serde_json::from_value(v).unwrap())
            .collect();
        Arc::new(Self {
            replies: Mutex::new(replies),
            requests: Mutex::default(),
        })
    }

    fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| AgentError::Transport("connection refused".into()))
    }
}

fn stop(content: Value) -> Value {
    json!({
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
}

fn tool_calls(calls: &[(&str, &str, Value)]) -> Value {
    let calls: Vec<Value> = calls
        .iter()
        .map(|(id, name, args)| {
            json!({
                "id": id,
                "type": "function",
                "function": {"name": name, "arguments": args.to_string()}
            })
        })
        .collect();
    json!({
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": null, "tool_calls": calls},
            "finish_reason": "tool_calls"
        }]
    })
}

type Events = Arc<Mutex<Vec<AgentEvent>>>;

fn agent(transport: Arc<FakeTransport>) -> (Agent<OpenAiService>, Events) {
    let events: Events = Arc::default();
    let sink = Arc::clone(&events);

    let service = OpenAiService::with_transport("gpt-test", transport);
    let agent = AgentBuilder::new()
        .service(Arc::new(service))
        .tools(Arc::new(coding_tools::registry().unwrap()))
        .system_prompt(coding_tools::CODING_AGENT_PROMPT)
        .observer(Arc::new(move |event: &AgentEvent| {
            sink.lock().unwrap().push(event.clone());
        }))
        .build()
        .unwrap();
    (agent, events)
}

fn tool_message_content(message: &Value) -> Value {
    assert_eq!(message["role"], "tool");
    serde_json::from_str(message["content"].as_str().unwrap()).unwrap()
}

#[tokio::test]
async fn lists_directory_then_answers() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("b.txt"), "b").unwrap();
    std::fs::write(dir.path().join("a.txt"), "a").unwrap();
    std::fs::create_dir(dir.path().join("nested")).unwrap();
    let dir_path = dir.path().to_string_lossy().into_owned();

    let transport = FakeTransport::scripted(vec![
        tool_calls(&[("call_1", "list_files", json!({"dirPath": dir_path}))]),
        stop(json!("Found 2 files: a.txt, b.txt")),
    ]);
    let (mut agent, events) = agent(Arc::clone(&transport));

    let outcome = agent.run_turn("What files are in the output dir?").await.unwrap();
    assert_eq!(outcome.reply, "Found 2 files: a.txt, b.txt");
    assert_eq!(outcome.cycles, 2);
    assert_eq!(outcome.tool_calls, 1);

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);

    let first = &requests[0];
    assert_eq!(first.model, "gpt-test");
    assert_eq!(first.tools.len(), 4);
    assert_eq!(first.messages[0]["role"], "system");
    assert_eq!(first.messages[0]["content"], coding_tools::CODING_AGENT_PROMPT);
    assert_eq!(first.messages[1]["role"], "user");

    let second = &requests[1].messages;
    assert_eq!(second.len(), 4);
    assert_eq!(second[2]["role"], "assistant");
    assert_eq!(second[2]["tool_calls"][0]["id"], "call_1");
    assert_eq!(second[3]["tool_call_id"], "call_1");
    assert_eq!(
        tool_message_content(&second[3]),
        json!({"result": ["a.txt", "b.txt"]})
    );

    let context = agent.context().messages();
    assert_eq!(context.len(), 2);
    assert_eq!(context[0].role, Role::User);
    assert_eq!(context[0].text(), "What files are in the output dir?");
    assert_eq!(context[1].role, Role::Assistant);
    assert_eq!(context[1].text(), "Found 2 files: a.txt, b.txt");

    let events = events.lock().unwrap();
    assert_eq!(
        *events,
        vec![
            AgentEvent::Started { cycle: 1 },
            AgentEvent::ToolInvoked {
                call_id: "call_1".into(),
                name: "list_files".into()
            },
            AgentEvent::Started { cycle: 2 },
            AgentEvent::Responded {
                text: "Found 2 files: a.txt, b.txt".into()
            },
        ]
    );
}

#[tokio::test]
async fn null_content_is_an_empty_reply() {
    let transport = FakeTransport::scripted(vec![stop(Value::Null)]);
    let (mut agent, events) = agent(Arc::clone(&transport));

    let outcome = agent.run_turn("hello").await.unwrap();
    assert_eq!(outcome.reply, "");
    assert_eq!(outcome.cycles, 1);
    assert_eq!(outcome.tool_calls, 0);

    let context = agent.context().messages();
    assert_eq!(context.len(), 2);
    assert_eq!(context[1].role, Role::Assistant);
    assert_eq!(context[1].text(), "");

    assert_eq!(
        events.lock().unwrap().last(),
        Some(&AgentEvent::Responded { text: String::new() })
    );
}

#[tokio::test]
async fn empty_choices_do_not_repeat_previous_answer() {
    let transport = FakeTransport::scripted(vec![
        stop(json!("first answer")),
        json!({"choices": []}),
    ]);
    let (mut agent, _events) = agent(Arc::clone(&transport));

    agent.run_turn("one").await.unwrap();
    let outcome = agent.run_turn("two").await.unwrap();
    assert_eq!(outcome.reply, "");

    let context: Vec<(Role, &str)> = agent
        .context()
        .messages()
        .iter()
        .map(|m| (m.role, m.text()))
        .collect();
    assert_eq!(
        context,
        vec![(Role::User, "one"), (Role::User, "two"), (Role::Assistant, "")]
    );
}

#[tokio::test]
async fn missing_file_is_reported_and_turn_completes() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.rs").to_string_lossy().into_owned();

    let transport = FakeTransport::scripted(vec![
        tool_calls(&[("call_1", "read_file", json!({"filePath": missing}))]),
        stop(json!("That file does not exist.")),
    ]);
    let (mut agent, events) = agent(Arc::clone(&transport));

    let outcome = agent.run_turn("Show me nope.rs").await.unwrap();
    assert_eq!(outcome.reply, "That file does not exist.");

    let requests = transport.requests();
    let result = tool_message_content(&requests[1].messages[3]);
    assert!(result["error"].as_str().unwrap().contains("read_file"));

    let events = events.lock().unwrap();
    assert!(events.iter().any(|e| matches!(
        e,
        AgentEvent::Errored { message } if message.contains("does not exist")
    )));
    assert!(matches!(events.last(), Some(AgentEvent::Responded { .. })));
}

#[tokio::test]
async fn parallel_calls_are_answered_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("main.rs");
    std::fs::write(&file, "fn main() {}").unwrap();
    let dir_path = dir.path().to_string_lossy().into_owned();
    let file_path = file.to_string_lossy().into_owned();

    let transport = FakeTransport::scripted(vec![
        tool_calls(&[
            ("call_a", "list_files", json!({"dirPath": dir_path})),
            ("call_b", "read_file", json!({"filePath": file_path})),
        ]),
        stop(json!("main.rs has an empty main.")),
    ]);
    let (mut agent, _events) = agent(Arc::clone(&transport));

    let outcome = agent.run_turn("Summarise the project").await.unwrap();
    assert_eq!(outcome.tool_calls, 2);
    assert_eq!(outcome.cycles, 2);

    let messages = &transport.requests()[1].messages;
    assert_eq!(messages.len(), 5);
    assert_eq!(messages[2]["tool_calls"].as_array().unwrap().len(), 2);
    assert_eq!(messages[3]["tool_call_id"], "call_a");
    assert_eq!(messages[4]["tool_call_id"], "call_b");
    assert_eq!(
        tool_message_content(&messages[3]),
        json!({"result": ["main.rs"]})
    );
    assert_eq!(
        tool_message_content(&messages[4]),
        json!({"result": format!("Content of file {file_path}: fn main() {{}}")})
    );
}

#[tokio::test]
async fn created_file_lands_on_disk_and_context_carries_over() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("src").join("lib.rs");
    let file_path = file.to_string_lossy().into_owned();

    let transport = FakeTransport::scripted(vec![
        tool_calls(&[(
            "call_1",
            "create_file",
            json!({"filePath": file_path, "content": "pub fn hi() {}"}),
        )]),
        stop(json!("Created src/lib.rs.")),
        stop(json!("It defines hi().")),
    ]);
    let (mut agent, _events) = agent(Arc::clone(&transport));

    agent.run_turn("Create a lib").await.unwrap();
    assert_eq!(std::fs::read_to_string(&file).unwrap(), "pub fn hi() {}");

    agent.run_turn("What does it define?").await.unwrap();
    let third = &transport.requests()[2].messages;
    let roles: Vec<&str> = third.iter().map(|m| m["role"].as_str().unwrap()).collect();
    assert_eq!(roles, ["system", "user", "assistant", "user"]);
    assert_eq!(third[2]["content"], "Created src/lib.rs.");
    assert_eq!(agent.context().len(), 3);
}

#[tokio::test]
async fn provider_failure_keeps_previous_context() {
    let transport = FakeTransport::scripted(vec![stop(json!("Hi there."))]);
    let (mut agent, events) = agent(Arc::clone(&transport));

    agent.run_turn("hello").await.unwrap();
    let err = agent.run_turn("again").await.unwrap_err();
    assert!(matches!(err, AgentError::Transport(_)));

    let context = agent.context().messages();
    assert_eq!(context.len(), 2);
    assert_eq!(context[1].text(), "Hi there.");
    assert!(matches!(
        events.lock().unwrap().last(),
        Some(AgentEvent::Errored { .. })
    ));
}
