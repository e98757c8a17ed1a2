//! InstaLite chat relay server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin instalite-server
//! cargo run --bin instalite-server -- --host 0.0.0.0 --port 8080 --allowed-origin http://localhost:3000
//! ```

use std::sync::Arc;

use clap::Parser;
use instalite_server::{
    domain::RoomId,
    ui::{AppState, Server, ServerConfig},
};
use instalite_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "instalite-server")]
#[command(about = "Chat presence and relay server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Room joined by the legacy `join` event
    #[arg(long, default_value = "default-room")]
    public_room: String,

    /// Front-end origin allowed by CORS (repeatable)
    #[arg(long = "allowed-origin")]
    allowed_origins: Vec<String>,

    /// Default log level when RUST_LOG is not set
    #[arg(long, default_value = "debug")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    let public_room = match RoomId::new(args.public_room) {
        Ok(id) => id,
        Err(e) => {
            tracing::error!("Invalid --public-room: {}", e);
            std::process::exit(1);
        }
    };

    let mut config = ServerConfig {
        host: args.host,
        port: args.port,
        ..ServerConfig::default()
    };
    if !args.allowed_origins.is_empty() {
        config.allowed_origins = args.allowed_origins;
    }

    tracing::info!("Public room: '{}'", public_room);
    let state = Arc::new(AppState::in_memory(public_room, Arc::new(SystemClock)));

    if let Err(e) = Server::new(state, config).run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
