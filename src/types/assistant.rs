//! Assistant configuration and handles.

use bon::Builder;
use serde::{Deserialize, Serialize};

/// A callable tool as advertised to the assistant service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    /// JSON Schema object describing the parameters.
    pub parameters: serde_json::Value,
}

/// Everything needed to create an assistant. Immutable once sent.
///
/// ```
/// use onchain_agent::types::AssistantSpec;
///
/// let spec = AssistantSpec::builder()
///     .name("Onchain Agent")
///     .instructions("Answer questions about wallets.")
///     .model("gpt-4o-mini")
///     .build();
/// assert!(spec.tools.is_empty());
/// ```
#[derive(Debug, Clone, Builder, Serialize, Deserialize, PartialEq)]
pub struct AssistantSpec {
    #[builder(into)]
    pub name: String,
    #[builder(into)]
    pub instructions: String,
    #[builder(into)]
    pub model: String,
    #[builder(default)]
    pub tools: Vec<ToolDescriptor>,
}

/// Handle to an assistant created on the service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Assistant {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub model: String,
}
