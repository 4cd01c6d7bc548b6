use clap::Parser;
use modelplane_lib::config::AppConfig;
use modelplane_lib::logging::init_logging;
use modelplane_lib::observability::DataPlaneMetrics;
use modelplane_lib::registry::{ImplementationRegistry, ModelHooks, MultiModelRegistry};
use modelplane_lib::server::{router, ServerState};
use std::net::SocketAddr;
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "modelplane",
    about = "Multi-model inference server core",
    version = "0.2.0",
    author = "Cason Adams"
)]
struct Cli {
    /// Override the configured host.
    #[arg(long)]
    host: Option<String>,

    /// Override the configured port.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() {
    init_logging();

    let cli = Cli::parse();
    let mut config = AppConfig::load_or_default();
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    let registry = Arc::new(MultiModelRegistry::new(ModelHooks::default()));
    let metrics = Arc::new(DataPlaneMetrics::new());
    let implementations = Arc::new(ImplementationRegistry::new());

    let state = ServerState::new(
        registry,
        metrics,
        implementations,
        "modelplane",
        env!("CARGO_PKG_VERSION"),
    );

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .expect("invalid host/port in configuration");

    tracing::info!(%addr, "starting modelplane data plane");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {addr}: {e}"));

    axum::serve(listener, router(state))
        .await
        .unwrap_or_else(|e| panic!("server error: {e}"));
}
