use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::header::{self, HeaderValue};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::error::{Error, Result};
use crate::rpc::{RpcResponse, RpcService};

pub const RPC_PATHS: [&str; 2] = ["/rpc", "/"];

const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);
const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(100);
const INITIAL_BODY_CAPACITY: usize = 64 * 1024;

pub async fn bind(config: &ServerConfig) -> Result<TcpListener> {
    Ok(TcpListener::bind(config.bind).await?)
}

/// Accepts connections until `shutdown` resolves, then asks open connections
/// to finish their current exchange and waits for them for a bounded time.
pub async fn serve<F>(listener: TcpListener, service: Arc<RpcService>, shutdown: F) -> Result<()>
where
    F: Future<Output = ()>,
{
    info!(addr = %listener.local_addr()?, "RPC endpoint listening");

    let (stop_tx, stop_rx) = watch::channel(false);
    let mut connections = JoinSet::new();
    tokio::pin!(shutdown);

    loop {
        while connections.try_join_next().is_some() {}

        tokio::select! {
            accepted = listener.accept() => {
                let (stream, peer) = match accepted {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!(error = %e, "accept failed");
                        tokio::time::sleep(ACCEPT_RETRY_DELAY).await;
                        continue;
                    }
                };

                let service = service.clone();
                let mut stop_rx = stop_rx.clone();

                connections.spawn(async move {
                    let handler = service_fn(move |req| {
                        let service = service.clone();
                        async move { Ok::<_, Infallible>(route(&service, req).await) }
                    });

                    let conn = http1::Builder::new().serve_connection(TokioIo::new(stream), handler);
                    tokio::pin!(conn);

                    let result = tokio::select! {
                        res = conn.as_mut() => res,
                        _ = stop_rx.changed() => {
                            conn.as_mut().graceful_shutdown();
                            conn.await
                        }
                    };

                    if let Err(e) = result {
                        debug!(%peer, error = %e, "connection ended with error");
                    }
                });
            }
            _ = &mut shutdown => {
                info!("shutting down RPC endpoint");
                break;
            }
        }
    }

    let _ = stop_tx.send(true);
    let drain = async { while connections.join_next().await.is_some() {} };
    if tokio::time::timeout(DRAIN_TIMEOUT, drain).await.is_err() {
        warn!("connections still open after drain timeout");
    }

    Ok(())
}

async fn route(service: &RpcService, req: Request<Incoming>) -> Response<Full<Bytes>> {
    if !RPC_PATHS.contains(&req.uri().path()) {
        return plain(StatusCode::NOT_FOUND, "not found");
    }

    if req.method() != Method::POST {
        let mut response = plain(StatusCode::METHOD_NOT_ALLOWED, "method not allowed");
        response
            .headers_mut()
            .insert(header::ALLOW, HeaderValue::from_static("POST"));
        return response;
    }

    let limit = service.config().max_request_bytes;
    let body = match read_body(req, limit).await {
        Ok(Some(body)) => body,
        Ok(None) => {
            let err = Error::InvalidRequest(format!("request body exceeds {limit} bytes"));
            return json(
                StatusCode::PAYLOAD_TOO_LARGE,
                &RpcResponse::failure(serde_json::Value::Null, &err),
            );
        }
        Err(e) => {
            debug!(error = %e, "failed to read request body");
            return plain(StatusCode::BAD_REQUEST, "unreadable request body");
        }
    };

    let response = service.handle_body(&body).await;
    let status = if response.is_parse_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::OK
    };

    json(status, &response)
}

/// `Ok(None)` when the body is larger than `limit`.
async fn read_body(
    req: Request<Incoming>,
    limit: usize,
) -> std::result::Result<Option<Vec<u8>>, hyper::Error> {
    let declared = req
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<usize>().ok());

    if declared.is_some_and(|len| len > limit) {
        return Ok(None);
    }

    let mut body = req.into_body();
    let mut bytes = Vec::with_capacity(initial_capacity(declared));

    while let Some(frame) = body.frame().await {
        let Ok(chunk) = frame?.into_data() else {
            continue;
        };

        if bytes.len() + chunk.len() > limit {
            return Ok(None);
        }

        bytes.extend_from_slice(&chunk);
    }

    Ok(Some(bytes))
}

/// Content-Length is client-controlled, so it only sizes the first allocation
/// up to a small bound.
fn initial_capacity(declared: Option<usize>) -> usize {
    declared.unwrap_or(0).min(INITIAL_BODY_CAPACITY)
}

fn json(status: StatusCode, body: &RpcResponse) -> Response<Full<Bytes>> {
    match serde_json::to_vec(body) {
        Ok(encoded) => {
            let mut response = Response::new(Full::new(Bytes::from(encoded)));
            *response.status_mut() = status;
            response.headers_mut().insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            );
            response
        }
        Err(e) => {
            warn!(error = %e, "failed to encode RPC response");
            plain(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
        }
    }
}

fn plain(status: StatusCode, message: &'static str) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from_static(message.as_bytes())));
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_length_does_not_size_buffer() {
        assert_eq!(initial_capacity(None), 0);
        assert_eq!(initial_capacity(Some(512)), 512);
        assert_eq!(
            initial_capacity(Some(16 * 1024 * 1024 - 1)),
            INITIAL_BODY_CAPACITY
        );
    }

    #[test]
    fn accept_retry_waits() {
        assert!(ACCEPT_RETRY_DELAY >= Duration::from_millis(10));
        assert!(ACCEPT_RETRY_DELAY < DRAIN_TIMEOUT);
    }
}
