//! WebSocket chat server implementation.

mod handler;
mod server;
mod signal;
pub mod state;

pub use handler::websocket::SESSION_COOKIE;
pub use server::Server;
