use clap::{Parser, ValueEnum};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use sparsedb_core::config;
use sparsedb_core::store::{MemoryIndex, PineconeConfig, PineconeIndex, VectorStore};
use sparsedb_server::api::create_router;
use sparsedb_server::api::handlers::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Backend {
    /// In-process index; contents are lost on exit
    Memory,
    /// Remote Pinecone-compatible index
    Pinecone,
}

#[derive(Parser)]
#[command(name = "sparsedb", about = "Sparse BM25 retrieval server")]
struct Args {
    /// Address to bind
    #[arg(long, env = "SPARSEDB_HOST", default_value = config::DEFAULT_HOST)]
    host: String,

    /// Port to listen on
    #[arg(short, long, env = "SPARSEDB_PORT", default_value_t = config::DEFAULT_PORT)]
    port: u16,

    /// Backing sparse index
    #[arg(long, env = "SPARSEDB_BACKEND", value_enum, default_value_t = Backend::Memory)]
    backend: Backend,

    /// Pinecone index host; falls back to PINECONE_HOST
    #[arg(long)]
    pinecone_host: Option<String>,

    /// Pinecone API key; falls back to PINECONE_API_KEY
    #[arg(long)]
    pinecone_api_key: Option<String>,

    /// Records per upsert call when a request does not specify one
    #[arg(long, env = "SPARSEDB_UPLOAD_BATCH_SIZE", default_value_t = config::DEFAULT_UPLOAD_BATCH_SIZE)]
    upload_batch_size: usize,

    /// Per-request timeout in seconds
    #[arg(long, env = "SPARSEDB_REQUEST_TIMEOUT_SECS", default_value_t = config::REQUEST_TIMEOUT_SECS)]
    request_timeout_secs: u64,
}

fn build_store(args: &Args) -> Result<VectorStore, Box<dyn std::error::Error>> {
    match args.backend {
        Backend::Memory => {
            tracing::warn!("Using in-memory index; data is not persisted");
            Ok(VectorStore::new(MemoryIndex::new()))
        }
        Backend::Pinecone => {
            let config = match (&args.pinecone_host, &args.pinecone_api_key) {
                (Some(host), Some(api_key)) => PineconeConfig::new(host.clone(), api_key.clone()),
                (None, None) => PineconeConfig::from_env()?,
                _ => {
                    return Err(
                        "--pinecone-host and --pinecone-api-key must be provided together".into(),
                    )
                }
            };
            let index = PineconeIndex::new(config)?;
            tracing::info!(base_url = index.base_url(), "Using Pinecone index");
            Ok(VectorStore::new(index))
        }
    }
}

// The blocking index client must be built and dropped outside the async runtime.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("sparsedb_server=info".parse()?)
                .add_directive("sparsedb_core=info".parse()?),
        )
        .init();

    let args = Args::parse();

    if args.port == 0 {
        eprintln!("Error: port must be > 0");
        std::process::exit(1);
    }
    if args.upload_batch_size == 0 {
        eprintln!("Error: upload batch size must be > 0");
        std::process::exit(1);
    }

    let store = Arc::new(build_store(&args)?);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(serve(args, store.clone()))?;
    drop(runtime);
    drop(store);
    Ok(())
}

async fn serve(args: Args, store: Arc<VectorStore>) -> Result<(), Box<dyn std::error::Error>> {
    let prometheus_handle =
        metrics_exporter_prometheus::PrometheusBuilder::new().install_recorder()?;

    let state = AppState {
        store,
        prometheus_handle,
        upload_batch_size: args.upload_batch_size,
        request_timeout: Duration::from_secs(args.request_timeout_secs),
    };
    let app = create_router(state);

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        addr = %addr,
        backend = ?args.backend,
        upload_batch_size = args.upload_batch_size,
        request_timeout_secs = args.request_timeout_secs,
        "sparsedb ready"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_signal())
        .await?;
    tracing::info!("Server stopped");
    Ok(())
}

async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT"),
        _ = terminate => tracing::info!("Received SIGTERM"),
    }

    tracing::info!("Shutting down gracefully, draining in-flight requests...");
}
