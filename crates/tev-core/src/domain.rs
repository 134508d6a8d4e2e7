//! Minimal model of the protocol objects this layer reads.
//!
//! Decoding these from the wire is the client's job; the event layer only needs
//! the handful of fields that identify chats and messages.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A typed reference to a chat: its kind plus the raw (unmarked) id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "_", content = "id")]
pub enum Peer {
    User(i64),
    Chat(i64),
    Channel(i64),
}

impl Peer {
    pub fn raw_id(&self) -> i64 {
        match *self {
            Peer::User(id) | Peer::Chat(id) | Peer::Channel(id) => id,
        }
    }

    pub fn is_channel(&self) -> bool {
        matches!(self, Peer::Channel(_))
    }
}

/// An addressable chat reference, sufficient for further API calls.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "_")]
pub enum InputPeer {
    Empty,
    /// The logged-in account, without its id.
    SelfPeer,
    User { user_id: i64, access_hash: i64 },
    Chat { chat_id: i64 },
    Channel { channel_id: i64, access_hash: i64 },
}

/// Loosely-typed chat reference accepted by builders.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChatRef {
    /// Bare integer. Negative values are already marked, non-negative ones are ambiguous.
    Id(i64),
    Peer(Peer),
    /// The logged-in account ("me").
    Me,
    Username(String),
    Phone(String),
}

impl From<i64> for ChatRef {
    fn from(id: i64) -> Self {
        ChatRef::Id(id)
    }
}

impl From<Peer> for ChatRef {
    fn from(peer: Peer) -> Self {
        ChatRef::Peer(peer)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub first_name: Option<String>,
    pub username: Option<String>,
    pub bot: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    pub title: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub id: i64,
    pub title: String,
    pub username: Option<String>,
    /// Broadcast channel (as opposed to a megagroup).
    pub broadcast: bool,
}

/// Full metadata record of a chat.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "_")]
pub enum Entity {
    User(User),
    Chat(Chat),
    Channel(Channel),
}

impl Entity {
    pub fn peer(&self) -> Peer {
        match self {
            Entity::User(u) => Peer::User(u.id),
            Entity::Chat(c) => Peer::Chat(c.id),
            Entity::Channel(c) => Peer::Channel(c.id),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: i32,
    pub peer_id: Peer,
    pub from_id: Option<Peer>,
    pub out: bool,
    /// Channel post (broadcast).
    pub post: bool,
    pub text: String,
}

/// A message fetched through the client, with its chat already resolved.
#[derive(Clone, Debug, PartialEq)]
pub struct FetchedMessage {
    pub message: Message,
    pub chat: Option<Entity>,
    pub input_chat: Option<InputPeer>,
}

/// A conversation as listed by the client.
#[derive(Clone, Debug, PartialEq)]
pub struct Dialog {
    /// Canonical (marked) id.
    pub id: i64,
    pub entity: Entity,
    pub input_entity: InputPeer,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "_")]
pub enum UpdateKind {
    NewMessage { message: Message },
    EditMessage { message: Message },
    DeleteMessages { channel_id: Option<i64>, ids: Vec<i32> },
    Other { name: String },
}

/// A raw update plus the entities that came with it, keyed by canonical id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Update {
    pub kind: UpdateKind,
    #[serde(skip)]
    pub entities: HashMap<i64, Entity>,
}

impl Update {
    pub fn new(kind: UpdateKind) -> Self {
        Self {
            kind,
            entities: HashMap::new(),
        }
    }

    pub fn with_entities(mut self, entities: impl IntoIterator<Item = Entity>) -> Self {
        for entity in entities {
            // Entities with out-of-range ids can never match a chat peer.
            if let Ok(id) = crate::peer::peer_id(&entity.peer()) {
                self.entities.insert(id, entity);
            }
        }
        self
    }

    pub fn message(&self) -> Option<&Message> {
        match &self.kind {
            UpdateKind::NewMessage { message } | UpdateKind::EditMessage { message } => {
                Some(message)
            }
            _ => None,
        }
    }

    /// The chat this update happened in, when it carries one.
    pub fn chat_peer(&self) -> Option<Peer> {
        match &self.kind {
            UpdateKind::DeleteMessages {
                channel_id: Some(id),
                ..
            } => Some(Peer::Channel(*id)),
            _ => self.message().map(|m| m.peer_id),
        }
    }
}
