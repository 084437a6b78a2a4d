//! Hiroba chat client.
//!
//! Signs in with a username, prints the recent history, then joins the room.
//! Automatically reconnects on disconnection (max 5 attempts with 5 second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroba-client -- --username alice
//! cargo run --bin hiroba-client -- -n bob --url http://127.0.0.1:8080
//! ```

use clap::Parser;

use hiroba_client::run_client;
use hiroba_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "hiroba-client")]
#[command(about = "Chat client for the Hiroba room", long_about = None)]
struct Args {
    /// Display name in the room
    #[arg(short = 'n', long)]
    username: String,

    /// Server base URL
    #[arg(short = 'u', long, default_value = "http://127.0.0.1:8080")]
    url: String,

    /// Number of past messages to print before joining (0 to skip)
    #[arg(long, default_value_t = 20)]
    history: usize,
}

#[tokio::main]
async fn main() {
    setup_logger(env!("CARGO_CRATE_NAME"), env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    if let Err(e) = run_client(args.url, args.username, args.history).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
