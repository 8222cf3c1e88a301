use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use locale_gate::grpc::{self, GreeterUpstream};
use locale_gate::i18n::I18n;
use locale_gate::logging;
use locale_gate::timezone::TimezoneResolver;
use locale_gate::{AppState, build_router};

#[derive(Parser, Debug)]
#[command(name = "locale-gate", version, about = "Localized greeting server")]
struct Args {
    /// Path to config.toml (defaults to conf/config.toml or ./config.toml)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load .env file if present
    let _ = dotenvy::dotenv();

    let config = logging::load_config(args.config.as_deref())?;
    let _guard = logging::init_logging(&config.logging)?;

    tracing::info!("Starting locale-gate {}", env!("CARGO_PKG_VERSION"));

    let i18n = I18n::load(&config.i18n).context("Failed to load message bundle")?;
    let timezones = TimezoneResolver::new(&config.timezone.default)
        .context("Failed to configure default timezone")?;
    tracing::info!("Default timezone: {}", timezones.default_timezone());

    let i18n = Arc::new(i18n);
    let greeter = GreeterUpstream::new(config.grpc_upstream()?);
    let app = build_router(AppState::new(i18n.clone(), timezones, greeter));

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;
    let grpc_addr: SocketAddr = format!("{}:{}", config.grpc.host, config.grpc.port)
        .parse()
        .context("Invalid gRPC address")?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("API documentation available at http://{}/swagger-ui", addr);
    tracing::info!("gRPC Greeter listening on {}", grpc_addr);
    tracing::info!("/hello-with-grpc/ calls {}", config.grpc.upstream);

    let http = async {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("HTTP server failed")
    };
    let grpc_server = async {
        tonic::transport::Server::builder()
            .add_service(grpc::greeter_service(i18n, timezones))
            .serve_with_shutdown(grpc_addr, shutdown_signal())
            .await
            .context("gRPC server failed")
    };
    tokio::try_join!(http, grpc_server)?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received");
}
