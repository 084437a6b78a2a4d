//! Single-room WebSocket chat server.
//!
//! Tracks who is online in a connection registry, fans chat events out to
//! every live connection and keeps a consistent presence roster as users
//! join and leave.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
