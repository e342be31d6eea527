use std::net::SocketAddr;

use clap::{Args, Parser, Subcommand};
use reqwest::Url;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the character API over HTTP.
    Server(ServerArgs),
    /// Run the demonstration scenario against a running server.
    Client(ClientArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ServerArgs {
    /// Socket address the server should bind to. Use port 0 for an ephemeral port.
    #[arg(long, default_value = "0.0.0.0:8000")]
    pub listen: SocketAddr,
}

#[derive(Args, Debug, Clone)]
pub struct ClientArgs {
    /// Base URL of the character server.
    #[arg(long, default_value = "http://127.0.0.1:8000")]
    pub server: Url,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_defaults_to_port_8000() {
        let cli = Cli::try_parse_from(["character-service", "server"]).expect("parse");
        match cli.command {
            Command::Server(args) => assert_eq!(args.listen.port(), 8000),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn client_accepts_custom_server() {
        let cli = Cli::try_parse_from([
            "character-service",
            "client",
            "--server",
            "http://localhost:9000",
        ])
        .expect("parse");
        match cli.command {
            Command::Client(args) => assert_eq!(args.server.port(), Some(9000)),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
