use anyhow::{Context, Result};
use clap::{ArgGroup, Args, Parser, Subcommand};
use serde_json::json;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use imgsniff::client::{DEFAULT_ENDPOINT, RpcClient};
use imgsniff::local::inspect_files;
use imgsniff::{Error, RpcService, ServerConfig, server, telemetry};

#[derive(Parser, Debug)]
#[command(name = "imgsniff")]
#[command(author, version, about = "Image header sniffing service", long_about = None)]
struct Cli {
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the RPC endpoint
    Serve(ServeArgs),
    /// Inspect local files without a server
    Inspect {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Send a request to a running endpoint
    Call {
        #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
        endpoint: String,

        #[command(subcommand)]
        method: CallMethod,
    },
}

#[derive(Args, Debug)]
struct ServeArgs {
    #[arg(short, long)]
    bind: Option<SocketAddr>,

    #[arg(long)]
    max_request_bytes: Option<usize>,

    #[arg(long)]
    max_image_bytes: Option<usize>,

    /// Seconds
    #[arg(long)]
    fetch_timeout: Option<u64>,
}

#[derive(Subcommand, Debug)]
enum CallMethod {
    Status,
    #[command(group(ArgGroup::new("source").required(true).args(["url", "data", "file"])))]
    Inspect {
        #[arg(long)]
        url: Option<String>,

        /// Base64 or data URI
        #[arg(long)]
        data: Option<String>,

        /// Local file, sent base64-encoded
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init(cli.verbose);

    match cli.command {
        Command::Serve(args) => run_server(args),
        Command::Inspect { files } => run_local_inspect(&files),
        Command::Call { endpoint, method } => run_call(&endpoint, method),
    }
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")
}

fn run_server(args: ServeArgs) -> Result<()> {
    let mut config = ServerConfig::from_env().context("Invalid environment configuration")?;

    if let Some(bind) = args.bind {
        config = config.with_bind(bind);
    }
    if let Some(bytes) = args.max_request_bytes {
        config = config.with_max_request_bytes(bytes);
    }
    if let Some(bytes) = args.max_image_bytes {
        config = config.with_max_image_bytes(bytes);
    }
    if let Some(secs) = args.fetch_timeout {
        config = config.with_fetch_timeout(Duration::from_secs(secs));
    }

    runtime()?.block_on(async move {
        let listener = server::bind(&config)
            .await
            .with_context(|| format!("Failed to bind {}", config.bind))?;
        let service = Arc::new(RpcService::new(config).context("Failed to build RPC service")?);

        let shutdown = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
        };

        server::serve(listener, service, shutdown)
            .await
            .context("RPC endpoint failed")
    })
}

fn run_local_inspect(files: &[PathBuf]) -> Result<()> {
    let mut failed = 0usize;

    for report in inspect_files(files) {
        let line = match report.outcome {
            Ok(result) => json!({ "path": report.path, "result": result }),
            Err(e) => {
                failed += 1;
                json!({ "path": report.path, "error": e.to_string() })
            }
        };
        println!("{line}");
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {} files could not be read", files.len());
    }

    Ok(())
}

fn run_call(endpoint: &str, method: CallMethod) -> Result<()> {
    let client = RpcClient::new(endpoint).context("Failed to build HTTP client")?;

    let response = runtime()?.block_on(async {
        match method {
            CallMethod::Status => client.status().await,
            CallMethod::Inspect {
                url: Some(url), ..
            } => client.inspect_url(&url).await,
            CallMethod::Inspect {
                data: Some(data), ..
            } => client.inspect_data(&data).await,
            CallMethod::Inspect {
                file: Some(path), ..
            } => client.inspect_file(&path).await,
            CallMethod::Inspect { .. } => Err(Error::InvalidParams(
                "one of --url, --data or --file is required".to_string(),
            )),
        }
        .with_context(|| format!("Request to {endpoint} failed"))
    })?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
