use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info};

use character_service::{
    cli::{Cli, Command, ServerArgs},
    client,
    server::Server,
};

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}

/// Binds the listener and serves until ctrl-c. The `listening on <addr>`
/// line is what callers using port 0 read to find the real address.
async fn serve(args: ServerArgs) -> Result<()> {
    let listener = TcpListener::bind(args.listen)
        .await
        .with_context(|| format!("failed to bind {}", args.listen))?;
    let server = Server::new(listener);
    info!("listening on {}", server.local_addr()?);

    server.run_until_ctrl_c().await.inspect_err(|err| {
        error!("server exited with error: {err:#}");
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    match Cli::parse().command {
        Command::Server(args) => serve(args).await,
        Command::Client(args) => client::run(args).await,
    }
}
