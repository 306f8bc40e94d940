use thiserror::Error;

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const INTERNAL_ERROR: i64 = -32603;
pub const PAYLOAD_ERROR: i64 = -32001;
pub const FETCH_ERROR: i64 = -32002;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Invalid base64 payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("Malformed data URI: {0}")]
    MalformedDataUri(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Upstream returned HTTP {status}")]
    UpstreamStatus { status: u16 },

    #[error("Response body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid value {value:?} for {key}")]
    Config { key: String, value: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Error code carried in the RPC error envelope.
    pub fn rpc_code(&self) -> i64 {
        match self {
            Error::Json(_) => PARSE_ERROR,
            Error::InvalidRequest(_) => INVALID_REQUEST,
            Error::MethodNotFound(_) => METHOD_NOT_FOUND,
            Error::InvalidParams(_) => INVALID_PARAMS,
            Error::InvalidBase64(_) | Error::MalformedDataUri(_) => PAYLOAD_ERROR,
            Error::InvalidUrl(_) | Error::UnsupportedScheme(_) => INVALID_PARAMS,
            Error::UpstreamStatus { .. } | Error::BodyTooLarge { .. } | Error::Http(_) => {
                FETCH_ERROR
            }
            Error::Config { .. } | Error::Io(_) => INTERNAL_ERROR,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
