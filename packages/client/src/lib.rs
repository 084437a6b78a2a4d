//! CLI chat client for Hiroba.
//!
//! Obtains a session, prints recent history, then joins the room over
//! WebSocket and keeps reconnecting when the connection drops.

pub mod api;
pub mod domain;
pub mod error;
pub mod formatter;
pub mod runner;
pub mod session;
pub mod ui;

pub use runner::run_client;
