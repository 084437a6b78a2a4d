//! Repository 実装（Persistence Port / セッション照会）

pub mod inmemory;

pub use inmemory::{InMemoryMessageRepository, InMemorySessionStore};
