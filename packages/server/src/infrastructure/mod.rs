//! Infrastructure layer: concrete implementations of the domain ports and
//! the wire formats spoken over HTTP and WebSocket.

pub mod dto;
pub mod message_pusher;
pub mod registry;
pub mod repository;
