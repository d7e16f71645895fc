use clap::Parser;
use tracing::info;

use estuary::config::Args;
use estuary::irc::server::IrcServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let server = IrcServer::bind(("0.0.0.0", args.port), args.password).await?;
    info!("estuary listening on port {}", args.port);

    tokio::select! {
        res = server.run() => res,
        _ = tokio::signal::ctrl_c() => {
            info!("shutting down");
            Ok(())
        }
    }
}
