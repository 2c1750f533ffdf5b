mod credential;
pub use credential::*;

mod crypto;
pub use crypto::*;

mod participant;
pub use participant::Participant;

mod notify;
pub use notify::*;

mod registry;
pub use registry::*;

mod message;
pub use message::Message;

mod store;
pub use store::*;

mod gateway;
pub use gateway::*;

mod error;
pub use error::Error;

mod config;
pub use config::*;

mod chat;
pub use chat::SecureChat;
