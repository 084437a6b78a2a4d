//! Utilities shared by the Hiroba server and client crates.

pub mod logger;
pub mod time;
