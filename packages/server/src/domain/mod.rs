//! Domain layer for the chat server.
//!
//! Value objects, entities and the ports (traits) the use cases depend on.
//! Concrete implementations live in the infrastructure layer.

pub mod broadcaster;
pub mod entity;
pub mod error;
pub mod registry;
pub mod repository;
pub mod session;
pub mod value_object;

pub use broadcaster::{BroadcastReport, EventBroadcaster};
pub use entity::{AuthenticatedUser, ChatEvent, StoredMessage};
pub use error::{RepositoryError, ValueObjectError};
pub use registry::{Admission, ConnectionHandle, ConnectionRegistry, PusherChannel, SendError};
pub use repository::MessageRepository;
pub use session::{SessionIssuer, SessionStore};
pub use value_object::{ConnectionId, MessageContent, SessionToken, Timestamp, UserId, Username};
