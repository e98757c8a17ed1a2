//! InstaLite chat client with multi-room and reconnection support.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin instalite-client -- --username alice --user-id 1 --room chat-1
//! cargo run --bin instalite-client -- --username bob --legacy
//! ```

use clap::Parser;

use instalite_client::{ClientConfig, run_client};
use instalite_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "instalite-client")]
#[command(about = "CLI chat client for the InstaLite chat relay", long_about = None)]
struct Args {
    /// Display name
    #[arg(short = 'n', long)]
    username: String,

    /// Account id attached to chat room events
    #[arg(short = 'i', long)]
    user_id: Option<String>,

    /// Room to join on startup (repeatable)
    #[arg(short = 'r', long = "room")]
    rooms: Vec<String>,

    /// Join the shared public room with the legacy events
    #[arg(long)]
    legacy: bool,

    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    let config = ClientConfig {
        url: args.url,
        username: args.username,
        user_id: args.user_id,
        rooms: args.rooms,
        legacy: args.legacy,
    };

    if let Err(e) = run_client(config).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
