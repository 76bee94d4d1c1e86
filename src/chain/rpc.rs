//! `eth_getBalance` over Ethereum JSON-RPC.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::{AgentError, Result};
use crate::provider::http::build_client;

use super::{Address, BalanceSource};

/// Balance reader backed by a JSON-RPC node.
pub struct JsonRpcBalanceSource {
    client: reqwest::Client,
    url: String,
}

impl JsonRpcBalanceSource {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            url: url.into(),
        })
    }
}

#[derive(Deserialize)]
struct RpcResponse {
    result: Option<String>,
    error: Option<RpcError>,
}

#[derive(Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

#[async_trait]
impl BalanceSource for JsonRpcBalanceSource {
    async fn native_balance(&self, address: &Address) -> Result<u128> {
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "eth_getBalance",
            "params": [address.as_str(), "latest"],
        });

        debug!(%address, url = %self.url, "eth_getBalance");

        let resp = self.client.post(&self.url).json(&body).send().await?;
        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(AgentError::api(status, body_text));
        }

        let data: RpcResponse = resp.json().await?;
        if let Some(err) = data.error {
            return Err(AgentError::Rpc {
                code: err.code,
                message: err.message,
            });
        }
        let quantity = data
            .result
            .ok_or_else(|| AgentError::InvalidState("eth_getBalance returned no result".into()))?;
        parse_quantity(&quantity)
    }
}

/// Parse a JSON-RPC hex quantity (`0x1bc16d674ec80000`).
pub fn parse_quantity(raw: &str) -> Result<u128> {
    let digits = raw
        .strip_prefix("0x")
        .ok_or_else(|| AgentError::InvalidState(format!("quantity without 0x prefix: {raw}")))?;
    if digits.is_empty() {
        return Ok(0);
    }
    u128::from_str_radix(digits, 16)
        .map_err(|e| AgentError::InvalidState(format!("bad quantity {raw}: {e}")))
}
