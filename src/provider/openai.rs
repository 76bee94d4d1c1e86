//! OpenAI Assistants (v2) API client.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::config::{AgentConfig, DEFAULT_BASE_URL};
use crate::error::{AgentError, Result};
use crate::types::*;

use super::http::{assistants_headers, build_client, status_to_error};
use super::AssistantService;

pub struct OpenAiAssistants {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl OpenAiAssistants {
    /// A missing key is accepted here; each call then fails with
    /// [`AgentError::Authentication`].
    pub fn new(api_key: Option<String>, base_url: Option<String>) -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            api_key,
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
        })
    }

    pub fn from_config(config: &AgentConfig) -> Result<Self> {
        Self::new(config.api_key.clone(), Some(config.base_url.clone()))
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| AgentError::Authentication("OPENAI_API_KEY is not set".to_string()))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T> {
        let resp = request
            .headers(assistants_headers(self.api_key()?))
            .send()
            .await?;

        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body_text));
        }

        Ok(resp.json().await?)
    }
}

#[async_trait]
impl AssistantService for OpenAiAssistants {
    async fn create_assistant(&self, spec: &AssistantSpec) -> Result<Assistant> {
        let tools: Vec<serde_json::Value> = spec
            .tools
            .iter()
            .map(|t| {
                serde_json::json!({
                    "type": "function",
                    "function": {
                        "name": t.name,
                        "description": t.description,
                        "parameters": t.parameters,
                    }
                })
            })
            .collect();
        let body = serde_json::json!({
            "name": spec.name,
            "instructions": spec.instructions,
            "model": spec.model,
            "tools": tools,
        });

        debug!(name = %spec.name, model = %spec.model, "creating assistant");
        let data: OpenAiAssistant = self
            .send(self.client.post(self.url("/assistants")).json(&body))
            .await?;

        Ok(Assistant {
            id: data.id,
            name: data.name,
            model: data.model,
        })
    }

    async fn delete_assistant(&self, assistant_id: &str) -> Result<()> {
        debug!(assistant_id, "deleting assistant");
        let data: OpenAiDeleted = self
            .send(
                self.client
                    .delete(self.url(&format!("/assistants/{assistant_id}"))),
            )
            .await?;
        if !data.deleted {
            return Err(AgentError::InvalidState(format!(
                "assistant {assistant_id} was not deleted"
            )));
        }
        Ok(())
    }

    async fn create_thread(&self, initial_message: Option<&str>) -> Result<Thread> {
        let body = match initial_message {
            Some(text) => serde_json::json!({
                "messages": [{ "role": "user", "content": text }],
            }),
            None => serde_json::json!({}),
        };

        let data: OpenAiThread = self
            .send(self.client.post(self.url("/threads")).json(&body))
            .await?;
        debug!(thread_id = %data.id, seeded = initial_message.is_some(), "created thread");
        Ok(Thread { id: data.id })
    }

    async fn add_message(
        &self,
        thread_id: &str,
        role: MessageRole,
        content: &str,
    ) -> Result<ThreadMessage> {
        let body = serde_json::json!({ "role": role, "content": content });
        let data: OpenAiMessage = self
            .send(
                self.client
                    .post(self.url(&format!("/threads/{thread_id}/messages")))
                    .json(&body),
            )
            .await?;
        Ok(data.into())
    }

    async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<Run> {
        let body = serde_json::json!({ "assistant_id": assistant_id });
        let data: OpenAiRun = self
            .send(
                self.client
                    .post(self.url(&format!("/threads/{thread_id}/runs")))
                    .json(&body),
            )
            .await?;
        debug!(run_id = %data.id, status = %data.status, "created run");
        Ok(data.into())
    }

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run> {
        let data: OpenAiRun = self
            .send(
                self.client
                    .get(self.url(&format!("/threads/{thread_id}/runs/{run_id}"))),
            )
            .await?;
        Ok(data.into())
    }

    async fn submit_tool_outputs(
        &self,
        thread_id: &str,
        run_id: &str,
        outputs: &[ToolOutput],
    ) -> Result<Run> {
        let body = serde_json::json!({ "tool_outputs": outputs });
        debug!(run_id, count = outputs.len(), "submitting tool outputs");
        let data: OpenAiRun = self
            .send(
                self.client
                    .post(self.url(&format!(
                        "/threads/{thread_id}/runs/{run_id}/submit_tool_outputs"
                    )))
                    .json(&body),
            )
            .await?;
        Ok(data.into())
    }

    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>> {
        let data: OpenAiList<OpenAiMessage> = self
            .send(
                self.client
                    .get(self.url(&format!("/threads/{thread_id}/messages")))
                    .query(&[("order", "desc")]),
            )
            .await?;
        Ok(data.data.into_iter().map(ThreadMessage::from).collect())
    }
}

// ============================================================================
// OpenAI API types
// ============================================================================

#[derive(Deserialize)]
struct OpenAiAssistant {
    id: String,
    name: Option<String>,
    model: String,
}

#[derive(Deserialize)]
struct OpenAiDeleted {
    deleted: bool,
}

#[derive(Deserialize)]
struct OpenAiThread {
    id: String,
}

#[derive(Deserialize)]
struct OpenAiList<T> {
    data: Vec<T>,
}

#[derive(Deserialize)]
struct OpenAiMessage {
    id: String,
    role: MessageRole,
    #[serde(default)]
    content: Vec<OpenAiContent>,
    #[serde(default)]
    created_at: i64,
}

#[derive(Deserialize)]
struct OpenAiContent {
    #[serde(rename = "type")]
    kind: String,
    text: Option<OpenAiText>,
}

#[derive(Deserialize)]
struct OpenAiText {
    value: String,
}

impl From<OpenAiMessage> for ThreadMessage {
    fn from(m: OpenAiMessage) -> Self {
        let content = m
            .content
            .into_iter()
            .filter(|part| part.kind == "text")
            .filter_map(|part| part.text.map(|t| t.value))
            .collect::<Vec<_>>()
            .join("");
        ThreadMessage {
            id: m.id,
            role: m.role,
            content,
            created_at: DateTime::<Utc>::from_timestamp(m.created_at, 0).unwrap_or_default(),
        }
    }
}

#[derive(Deserialize)]
struct OpenAiRun {
    id: String,
    thread_id: String,
    assistant_id: String,
    status: RunStatus,
    required_action: Option<OpenAiRequiredAction>,
    last_error: Option<OpenAiLastError>,
}

#[derive(Deserialize)]
struct OpenAiRequiredAction {
    submit_tool_outputs: Option<OpenAiSubmitToolOutputs>,
}

#[derive(Deserialize)]
struct OpenAiSubmitToolOutputs {
    tool_calls: Vec<OpenAiToolCall>,
}

#[derive(Deserialize)]
struct OpenAiToolCall {
    id: String,
    function: OpenAiFunction,
}

#[derive(Deserialize)]
struct OpenAiFunction {
    name: String,
    #[serde(default)]
    arguments: String,
}

#[derive(Deserialize)]
struct OpenAiLastError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

impl From<OpenAiRun> for Run {
    fn from(r: OpenAiRun) -> Self {
        let required_action = r
            .required_action
            .and_then(|a| a.submit_tool_outputs)
            .map(|s| RequiredAction::SubmitToolOutputs {
                tool_calls: s
                    .tool_calls
                    .into_iter()
                    .map(|tc| ToolCall {
                        id: tc.id,
                        name: tc.function.name,
                        arguments: tc.function.arguments,
                    })
                    .collect(),
            });
        Run {
            id: r.id,
            thread_id: r.thread_id,
            assistant_id: r.assistant_id,
            status: r.status,
            required_action,
            last_error: r.last_error.map(|e| LastError {
                code: e.code,
                message: e.message,
            }),
        }
    }
}
