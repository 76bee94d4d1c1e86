//! Wire format of the Assistants v2 client against a mock server.

use onchain_agent::error::AgentError;
use onchain_agent::provider::{AssistantService, OpenAiAssistants};
use onchain_agent::types::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> OpenAiAssistants {
    OpenAiAssistants::new(Some("test-key".to_string()), Some(server.uri())).unwrap()
}

fn run_json(status: &str) -> serde_json::Value {
    json!({
        "id": "run_1",
        "object": "thread.run",
        "thread_id": "thread_1",
        "assistant_id": "asst_1",
        "status": status,
        "required_action": null,
        "last_error": null
    })
}

#[tokio::test]
async fn create_assistant_sends_function_tools() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/assistants"))
        .and(header("authorization", "Bearer test-key"))
        .and(header("openai-beta", "assistants=v2"))
        .and(body_json(json!({
            "name": "Onchain Agent",
            "instructions": "Read wallets.",
            "model": "gpt-4o-mini",
            "tools": [{
                "type": "function",
                "function": {
                    "name": "get_balance",
                    "description": "Get the ETH balance of a wallet address",
                    "parameters": {"type": "object", "properties": {}, "required": []}
                }
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "asst_1",
            "object": "assistant",
            "name": "Onchain Agent",
            "model": "gpt-4o-mini"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let spec = AssistantSpec::builder()
        .name("Onchain Agent")
        .instructions("Read wallets.")
        .model("gpt-4o-mini")
        .tools(vec![ToolDescriptor {
            name: "get_balance".into(),
            description: "Get the ETH balance of a wallet address".into(),
            parameters: json!({"type": "object", "properties": {}, "required": []}),
        }])
        .build();
    let assistant = client(&server).create_assistant(&spec).await.unwrap();

    assert_eq!(assistant.id, "asst_1");
    assert_eq!(assistant.name.as_deref(), Some("Onchain Agent"));
}

#[tokio::test]
async fn create_thread_seeds_first_user_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/threads"))
        .and(body_json(json!({
            "messages": [{"role": "user", "content": "hello"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "thread_1",
            "object": "thread"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let thread = client(&server).create_thread(Some("hello")).await.unwrap();
    assert_eq!(thread.id, "thread_1");
}

#[tokio::test]
async fn add_message_posts_role_and_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/threads/thread_1/messages"))
        .and(body_json(json!({"role": "assistant", "content": "noted"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "msg_1",
            "role": "assistant",
            "created_at": 1_700_000_000,
            "content": [{"type": "text", "text": {"value": "noted", "annotations": []}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let message = client(&server)
        .add_message("thread_1", MessageRole::Assistant, "noted")
        .await
        .unwrap();
    assert_eq!(message.content, "noted");
    assert!(message.is_assistant());
}

#[tokio::test]
async fn run_lifecycle_endpoints() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/threads/thread_1/runs"))
        .and(body_json(json!({"assistant_id": "asst_1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(run_json("queued")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/threads/thread_1/runs/run_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(run_json("in_progress")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/threads/thread_1/runs/run_1/submit_tool_outputs"))
        .and(body_json(json!({
            "tool_outputs": [{"tool_call_id": "call_1", "output": "1.5"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(run_json("queued")))
        .expect(1)
        .mount(&server)
        .await;

    let service = client(&server);
    let run = service.create_run("thread_1", "asst_1").await.unwrap();
    assert_eq!(run.status, RunStatus::Queued);

    let run = service.retrieve_run("thread_1", "run_1").await.unwrap();
    assert_eq!(run.status, RunStatus::InProgress);

    let outputs = [ToolOutput {
        tool_call_id: "call_1".into(),
        output: "1.5".into(),
    }];
    let run = service
        .submit_tool_outputs("thread_1", "run_1", &outputs)
        .await
        .unwrap();
    assert_eq!(run.status, RunStatus::Queued);
}

#[tokio::test]
async fn failed_run_carries_last_error() {
    let server = MockServer::start().await;
    let mut body = run_json("failed");
    body["last_error"] = json!({"code": "rate_limit_exceeded", "message": "Quota exceeded"});
    Mock::given(method("GET"))
        .and(path("/threads/thread_1/runs/run_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let run = client(&server).retrieve_run("thread_1", "run_1").await.unwrap();

    assert_eq!(run.status, RunStatus::Failed);
    let last_error = run.last_error.unwrap();
    assert_eq!(last_error.code, "rate_limit_exceeded");
    assert_eq!(last_error.message, "Quota exceeded");
}

#[tokio::test]
async fn list_messages_asks_for_newest_first() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/threads/thread_1/messages"))
        .and(query_param("order", "desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "data": [
                {"id": "msg_2", "role": "assistant", "created_at": 2,
                 "content": [{"type": "text", "text": {"value": "0.5 ETH", "annotations": []}}]},
                {"id": "msg_1", "role": "user", "created_at": 1,
                 "content": [{"type": "text", "text": {"value": "balance?", "annotations": []}}]}
            ],
            "has_more": false
        })))
        .expect(1)
        .mount(&server)
        .await;

    let messages = client(&server).list_messages("thread_1").await.unwrap();

    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, MessageRole::Assistant);
    assert_eq!(messages[0].content, "0.5 ETH");
}

#[tokio::test]
async fn delete_assistant_checks_confirmation() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/assistants/asst_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "asst_1",
            "object": "assistant.deleted",
            "deleted": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    client(&server).delete_assistant("asst_1").await.unwrap();
}

#[tokio::test]
async fn api_errors_are_mapped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/threads/thread_x/runs/run_1"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"message": "No thread found with id 'thread_x'.", "type": "invalid_request_error"}
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/threads"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"message": "Incorrect API key provided"}
        })))
        .mount(&server)
        .await;

    let service = client(&server);
    let err = service.retrieve_run("thread_x", "run_1").await.unwrap_err();
    assert!(
        matches!(err, AgentError::Api { status: 404, ref message } if message.contains("thread_x"))
    );

    let err = service.create_thread(None).await.unwrap_err();
    assert!(matches!(err, AgentError::Authentication(ref m) if m == "Incorrect API key provided"));
}
