pub mod client;
pub mod config;
pub mod error;
pub mod fetch;
pub mod formats;
pub mod inspect;
pub mod local;
pub mod payload;
pub mod rpc;
pub mod server;
pub mod telemetry;
pub mod types;

pub use config::ServerConfig;
pub use error::{Error, Result};
pub use inspect::{inspect, inspect_with_hint, parse};
pub use rpc::RpcService;
pub use types::{Dimensions, Format, InspectionResult, ParseResult};
