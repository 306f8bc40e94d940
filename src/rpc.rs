//! JSON RPC envelope handling and the `inspect` / `status` methods.
//!
//! Requests look like `{"jsonrpc": "2.0", "id": 1, "method": "inspect",
//! "params": {"url": "https://..."}}`. Every failure past body parsing is
//! reported inside the envelope rather than as a transport error.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::config::ServerConfig;
use crate::error::{self, Error, Result};
use crate::fetch::Fetcher;
use crate::inspect::inspect_with_hint;
use crate::payload::decode_payload;
use crate::types::InspectionResult;

pub const JSONRPC_VERSION: &str = "2.0";
pub const SERVICE_NAME: &str = env!("CARGO_PKG_NAME");

pub const METHOD_INSPECT: &str = "inspect";
pub const METHOD_STATUS: &str = "status";

#[derive(Debug, Clone, Deserialize)]
pub struct RpcRequest {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    #[serde(default)]
    pub id: Value,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpcErrorBody {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpcResponse {
    pub jsonrpc: &'static str,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcErrorBody>,
}

impl RpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Value, err: &Error) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            result: None,
            error: Some(RpcErrorBody {
                code: err.rpc_code(),
                message: err.to_string(),
            }),
        }
    }

    pub fn is_parse_error(&self) -> bool {
        self.error
            .as_ref()
            .is_some_and(|e| e.code == error::PARSE_ERROR)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct InspectParams {
    url: Option<String>,
    data: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub service: &'static str,
    pub version: &'static str,
    pub uptime_secs: u64,
    pub requests: u64,
    pub bindings: Vec<String>,
}

pub struct RpcService {
    config: ServerConfig,
    fetcher: Fetcher,
    started: Instant,
    requests: AtomicU64,
}

impl RpcService {
    pub fn new(config: ServerConfig) -> Result<Self> {
        let fetcher = Fetcher::new(config.fetch_timeout, config.max_image_bytes)?;
        Ok(Self {
            config,
            fetcher,
            started: Instant::now(),
            requests: AtomicU64::new(0),
        })
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn requests_handled(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    /// Decodes a raw request body and dispatches it.
    pub async fn handle_body(&self, body: &[u8]) -> RpcResponse {
        match parse_request(body) {
            Ok(request) => self.dispatch(request).await,
            Err((id, err)) => {
                debug!(error = %err, "rejected RPC envelope");
                RpcResponse::failure(id, &err)
            }
        }
    }

    pub async fn dispatch(&self, request: RpcRequest) -> RpcResponse {
        self.requests.fetch_add(1, Ordering::Relaxed);
        debug!(method = %request.method, "dispatching RPC request");

        let outcome = match request.method.as_str() {
            METHOD_INSPECT => self.inspect(request.params).await.and_then(to_json),
            METHOD_STATUS => to_json(self.status()),
            other => Err(Error::MethodNotFound(other.to_string())),
        };

        match outcome {
            Ok(result) => RpcResponse::success(request.id, result),
            Err(err) => {
                if err.rpc_code() == error::FETCH_ERROR {
                    warn!(error = %err, "inspect fetch failed");
                }
                RpcResponse::failure(request.id, &err)
            }
        }
    }

    pub async fn inspect(&self, params: Value) -> Result<InspectionResult> {
        let params: InspectParams = parse_params(params)?;

        match (params.url, params.data) {
            (Some(url), None) => {
                let fetched = self.fetcher.fetch(&url).await?;
                Ok(inspect_with_hint(
                    &fetched.bytes,
                    fetched.content_type.as_deref(),
                ))
            }
            (None, Some(data)) => {
                let decoded = decode_payload(&data)?;
                Ok(inspect_with_hint(
                    &decoded.bytes,
                    decoded.media_type.as_deref(),
                ))
            }
            _ => Err(Error::InvalidParams(
                "expected exactly one of `url` or `data`".to_string(),
            )),
        }
    }

    pub fn status(&self) -> StatusReport {
        StatusReport {
            service: SERVICE_NAME,
            version: env!("CARGO_PKG_VERSION"),
            uptime_secs: self.started.elapsed().as_secs(),
            requests: self.requests_handled(),
            bindings: self.config.bindings.clone(),
        }
    }
}

/// On failure returns the request id (when one could be recovered) with the error.
pub fn parse_request(body: &[u8]) -> std::result::Result<RpcRequest, (Value, Error)> {
    let value: Value = serde_json::from_slice(body).map_err(|e| (Value::Null, Error::Json(e)))?;

    let Value::Object(object) = value else {
        return Err((
            Value::Null,
            Error::InvalidRequest("request must be a JSON object".to_string()),
        ));
    };

    let id = object.get("id").cloned().unwrap_or(Value::Null);

    let request: RpcRequest = serde_json::from_value(Value::Object(object))
        .map_err(|e| (id.clone(), Error::InvalidRequest(e.to_string())))?;

    if let Some(version) = request.jsonrpc.as_deref() {
        if version != JSONRPC_VERSION {
            return Err((
                id,
                Error::InvalidRequest(format!("unsupported jsonrpc version {version:?}")),
            ));
        }
    }

    Ok(request)
}

fn parse_params<T>(params: Value) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    let params = match params {
        Value::Null => Value::Object(Map::new()),
        Value::Object(_) => params,
        _ => {
            return Err(Error::InvalidParams(
                "params must be a JSON object".to_string(),
            ));
        }
    };

    serde_json::from_value(params).map_err(|e| Error::InvalidParams(e.to_string()))
}

fn to_json<T: Serialize>(value: T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}
