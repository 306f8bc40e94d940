use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Client;
use serde_json::{Value, json};

use crate::error::{Error, Result};
use crate::fetch::user_agent;
use crate::rpc::{JSONRPC_VERSION, METHOD_INSPECT, METHOD_STATUS};

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8787/rpc";

/// Minimal RPC caller for exercising a running endpoint.
#[derive(Debug, Clone)]
pub struct RpcClient {
    client: Client,
    endpoint: String,
}

impl RpcClient {
    pub fn new(endpoint: &str) -> Result<Self> {
        let client = Client::builder().user_agent(user_agent()).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    /// Returns the whole response envelope, including RPC-level errors.
    pub async fn call(&self, method: &str, params: Value) -> Result<Value> {
        let request = json!({
            "jsonrpc": JSONRPC_VERSION,
            "id": 1,
            "method": method,
            "params": params,
        });

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        // The endpoint answers some transport errors (400, 413) with an envelope too.
        match serde_json::from_slice(&body) {
            Ok(envelope) => Ok(envelope),
            Err(_) if !status.is_success() => Err(Error::UpstreamStatus {
                status: status.as_u16(),
            }),
            Err(e) => Err(Error::Json(e)),
        }
    }

    pub async fn status(&self) -> Result<Value> {
        self.call(METHOD_STATUS, json!({})).await
    }

    pub async fn inspect_url(&self, url: &str) -> Result<Value> {
        self.call(METHOD_INSPECT, json!({ "url": url })).await
    }

    pub async fn inspect_data(&self, data: &str) -> Result<Value> {
        self.call(METHOD_INSPECT, json!({ "data": data })).await
    }

    pub async fn inspect_file(&self, path: &Path) -> Result<Value> {
        let bytes = tokio::fs::read(path).await?;
        self.inspect_data(&STANDARD.encode(bytes)).await
    }
}
