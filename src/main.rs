use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tabviz_core::config::Config;

#[derive(Parser)]
#[command(name = "tabviz", about = "Table-to-chart-image relay server")]
struct Cli {
    /// Path to a TOML config file layered over the built-in defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Listen address override, e.g. 127.0.0.1:9000.
    #[arg(long)]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut cfg = Config::load(cli.config.as_deref())?;
    if let Some(listen) = cli.listen {
        cfg.server.listen = listen;
    }

    let addr: std::net::SocketAddr = cfg.server.listen.parse()?;
    let app = tabviz::server::router(Arc::new(cfg));

    tracing::info!(%addr, "tabviz listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
