//! Shared test helpers: a scripted in-memory assistant service.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use onchain_agent::error::{AgentError, Result};
use onchain_agent::provider::AssistantService;
use onchain_agent::types::*;

/// What the next run state handed out by the fake looks like.
#[derive(Debug, Clone)]
pub enum Step {
    Status(RunStatus),
    Action(Vec<ToolCall>),
    Fail(Option<String>),
    /// Completed, after appending an assistant message.
    Reply(String),
    /// Completed, after appending an assistant message where `{outputs}` is
    /// replaced with the most recently submitted outputs.
    ReplyWithOutputs(String),
}

#[derive(Default)]
struct State {
    next_id: u32,
    steps: VecDeque<Step>,
    threads: HashMap<String, Vec<ThreadMessage>>,
    calls: Vec<String>,
    submissions: Vec<Vec<ToolOutput>>,
    fail_create_run: Option<String>,
}

/// In-memory `AssistantService` that plays back queued run steps.
///
/// `create_run`, `retrieve_run` and `submit_tool_outputs` each consume the
/// next step; an empty queue yields a completed run.
#[derive(Default)]
pub struct FakeService {
    state: Mutex<State>,
}

pub fn tool_call(id: &str, name: &str, arguments: serde_json::Value) -> ToolCall {
    ToolCall {
        id: id.to_string(),
        name: name.to_string(),
        arguments: arguments.to_string(),
    }
}

impl FakeService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_steps(steps: impl IntoIterator<Item = Step>) -> Self {
        let service = Self::new();
        service.state.lock().unwrap().steps.extend(steps);
        service
    }

    pub fn fail_create_run(&self, message: &str) {
        self.state.lock().unwrap().fail_create_run = Some(message.to_string());
    }

    /// Every service method called, in order, by name.
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == call).count()
    }

    pub fn submissions(&self) -> Vec<Vec<ToolOutput>> {
        self.state.lock().unwrap().submissions.clone()
    }

    /// Thread messages, oldest first.
    pub fn messages(&self, thread_id: &str) -> Vec<ThreadMessage> {
        self.state
            .lock()
            .unwrap()
            .threads
            .get(thread_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn run(thread_id: &str, id: &str, status: RunStatus) -> Run {
        Run {
            id: id.to_string(),
            thread_id: thread_id.to_string(),
            assistant_id: "asst_1".to_string(),
            status,
            required_action: None,
            last_error: None,
        }
    }
}

impl State {
    fn id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}_{}", self.next_id)
    }

    fn push_message(&mut self, thread_id: &str, role: MessageRole, content: &str) -> ThreadMessage {
        let message = ThreadMessage {
            id: self.id("msg"),
            role,
            content: content.to_string(),
            created_at: Utc::now(),
        };
        self.threads
            .entry(thread_id.to_string())
            .or_default()
            .push(message.clone());
        message
    }

    fn advance(&mut self, thread_id: &str, run_id: &str) -> Run {
        let mut run = FakeService::run(thread_id, run_id, RunStatus::Completed);
        match self.steps.pop_front() {
            None => {}
            Some(Step::Status(status)) => run.status = status,
            Some(Step::Action(tool_calls)) => {
                run.status = RunStatus::RequiresAction;
                run.required_action = Some(RequiredAction::SubmitToolOutputs { tool_calls });
            }
            Some(Step::Fail(message)) => {
                run.status = RunStatus::Failed;
                run.last_error = message.map(|message| LastError {
                    code: "server_error".to_string(),
                    message,
                });
            }
            Some(Step::Reply(text)) => {
                self.push_message(thread_id, MessageRole::Assistant, &text);
            }
            Some(Step::ReplyWithOutputs(template)) => {
                let outputs = self
                    .submissions
                    .last()
                    .map(|outs| {
                        outs.iter()
                            .map(|o| o.output.as_str())
                            .collect::<Vec<_>>()
                            .join(", ")
                    })
                    .unwrap_or_default();
                let text = template.replace("{outputs}", &outputs);
                self.push_message(thread_id, MessageRole::Assistant, &text);
            }
        }
        run
    }
}

#[async_trait]
impl AssistantService for FakeService {
    async fn create_assistant(&self, spec: &AssistantSpec) -> Result<Assistant> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("create_assistant".into());
        Ok(Assistant {
            id: "asst_1".to_string(),
            name: Some(spec.name.clone()),
            model: spec.model.clone(),
        })
    }

    async fn delete_assistant(&self, _assistant_id: &str) -> Result<()> {
        self.state.lock().unwrap().calls.push("delete_assistant".into());
        Ok(())
    }

    async fn create_thread(&self, initial_message: Option<&str>) -> Result<Thread> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("create_thread".into());
        let id = state.id("thread");
        state.threads.insert(id.clone(), Vec::new());
        if let Some(text) = initial_message {
            state.push_message(&id, MessageRole::User, text);
        }
        Ok(Thread { id })
    }

    async fn add_message(
        &self,
        thread_id: &str,
        role: MessageRole,
        content: &str,
    ) -> Result<ThreadMessage> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("add_message".into());
        Ok(state.push_message(thread_id, role, content))
    }

    async fn create_run(&self, thread_id: &str, _assistant_id: &str) -> Result<Run> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("create_run".into());
        if let Some(message) = state.fail_create_run.clone() {
            return Err(AgentError::api(500, message));
        }
        let run_id = state.id("run");
        Ok(state.advance(thread_id, &run_id))
    }

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("retrieve_run".into());
        Ok(state.advance(thread_id, run_id))
    }

    async fn submit_tool_outputs(
        &self,
        thread_id: &str,
        run_id: &str,
        outputs: &[ToolOutput],
    ) -> Result<Run> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("submit_tool_outputs".into());
        state.submissions.push(outputs.to_vec());
        Ok(state.advance(thread_id, run_id))
    }

    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("list_messages".into());
        let mut messages = state.threads.get(thread_id).cloned().unwrap_or_default();
        messages.reverse();
        Ok(messages)
    }
}
