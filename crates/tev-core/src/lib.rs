//! Event filtering and lazy chat resolution for a chat client.
//!
//! Raw updates go through registered event builders; each builder decides
//! whether an update becomes an event and whether the event's chat passes its
//! allow/deny list. Events resolve their chat on demand through the
//! [`client::ChatClient`] port, which adapter crates implement.

pub mod builder;
pub mod chats;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod domain;
pub mod errors;
pub mod event;
pub mod events;
pub mod logging;
pub mod naming;
pub mod peer;

#[cfg(test)]
mod test_support;

pub use builder::{ChatFilter, EventBuilder, ResolvedBuilder, ResolvedChatFilter};
pub use client::ChatClient;
pub use dispatch::{Dispatcher, ResolvedDispatcher};
pub use errors::{Error, Result};
pub use events::Event;
