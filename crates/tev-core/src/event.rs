//! State shared by every event: the originating chat and its lazily resolved forms.

use std::{collections::HashMap, fmt, sync::Arc};

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::{
    client::ChatClient,
    domain::{ChatRef, Dialog, Entity, InputPeer, Peer, Update},
    errors::Error,
    naming::UNNAMED_EVENT,
    peer::peer_id,
    Result,
};

/// Outcome of a lazily computed field.
///
/// `Failed` only records why the last attempt went wrong; the next access tries again.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Resolution<T> {
    #[default]
    Unresolved,
    Resolved(T),
    Failed(String),
}

impl<T> Resolution<T> {
    pub fn resolved(&self) -> Option<&T> {
        match self {
            Resolution::Resolved(v) => Some(v),
            _ => None,
        }
    }
}

/// Result of matching a message against a builder's pattern.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PatternMatch {
    /// Whole matched text.
    pub text: String,
    /// Capture groups, index 1 onwards.
    pub groups: Vec<Option<String>>,
}

impl PatternMatch {
    pub fn from_captures(caps: &regex::Captures<'_>) -> Self {
        Self {
            text: caps.get(0).map(|m| m.as_str().to_string()).unwrap_or_default(),
            groups: caps
                .iter()
                .skip(1)
                .map(|g| g.map(|m| m.as_str().to_string()))
                .collect(),
        }
    }

    pub fn group(&self, index: usize) -> Option<&str> {
        match index {
            0 => Some(&self.text),
            i => self.groups.get(i - 1).and_then(|g| g.as_deref()),
        }
    }
}

/// Common part of every event.
///
/// Private fields are skipped by the structured form; public ones are rendered.
#[derive(Clone, Serialize)]
pub struct EventCommon {
    #[serde(skip)]
    entities: HashMap<i64, Entity>,
    #[serde(skip)]
    client: Option<Arc<dyn ChatClient>>,
    #[serde(skip)]
    chat_peer: Option<Peer>,
    #[serde(skip)]
    message_id: Option<i32>,
    #[serde(skip)]
    input_chat: Resolution<Option<InputPeer>>,
    #[serde(skip)]
    chat: Resolution<Entity>,
    #[serde(skip)]
    event_name: Arc<str>,

    pub pattern_match: Option<PatternMatch>,
    pub original_update: Option<Update>,

    pub is_private: bool,
    pub is_group: bool,
    pub is_channel: bool,
}

impl EventCommon {
    pub fn new(chat_peer: Option<Peer>, message_id: Option<i32>, broadcast: bool) -> Self {
        let is_private = matches!(chat_peer, Some(Peer::User(_)));
        let is_group = matches!(chat_peer, Some(Peer::Chat(_) | Peer::Channel(_))) && !broadcast;
        let is_channel = matches!(chat_peer, Some(Peer::Channel(_)));

        Self {
            entities: HashMap::new(),
            client: None,
            chat_peer,
            message_id,
            input_chat: Resolution::Unresolved,
            chat: Resolution::Unresolved,
            event_name: Arc::from(UNNAMED_EVENT),
            pattern_match: None,
            original_update: None,
            is_private,
            is_group,
            is_channel,
        }
    }

    /// Entities that arrived with the update, keyed by canonical id.
    pub fn with_entities(mut self, entities: HashMap<i64, Entity>) -> Self {
        self.entities = entities;
        self
    }

    pub fn set_client(&mut self, client: Arc<dyn ChatClient>) {
        self.client = Some(client);
    }

    pub fn client(&self) -> Option<&Arc<dyn ChatClient>> {
        self.client.as_ref()
    }

    pub fn chat_peer(&self) -> Option<Peer> {
        self.chat_peer
    }

    pub fn message_id(&self) -> Option<i32> {
        self.message_id
    }

    /// Canonical id of the chat, without any I/O.
    ///
    /// `None` also for a peer whose raw id has no canonical encoding.
    pub fn chat_id(&self) -> Option<i64> {
        self.chat_peer.as_ref().and_then(|peer| peer_id(peer).ok())
    }

    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    pub(crate) fn set_event_name(&mut self, name: Arc<str>) {
        self.event_name = name;
    }

    pub fn input_chat_state(&self) -> &Resolution<Option<InputPeer>> {
        &self.input_chat
    }

    pub fn chat_state(&self) -> &Resolution<Entity> {
        &self.chat
    }

    /// Addressable reference to the chat the event happened in.
    ///
    /// Resolved on first access: directly through the client, then (when the
    /// client does not know the peer) through the event's message or a dialog
    /// scan. `None` means no strategy found it.
    pub async fn input_chat(&mut self) -> Result<Option<InputPeer>> {
        if let Resolution::Resolved(cached) = &self.input_chat {
            return Ok(cached.clone());
        }

        match self.resolve_input_chat().await {
            Ok(input) => {
                self.input_chat = Resolution::Resolved(input.clone());
                Ok(input)
            }
            Err(e) => {
                self.input_chat = Resolution::Failed(e.to_string());
                Err(e)
            }
        }
    }

    async fn resolve_input_chat(&mut self) -> Result<Option<InputPeer>> {
        let Some(peer) = self.chat_peer else {
            return Ok(None);
        };
        let client = self.client.clone().ok_or(Error::NoClient)?;

        match client.get_input_entity(&ChatRef::Peer(peer)).await {
            Ok(input) => return Ok(Some(input)),
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }

        if let (false, Some(msg_id)) = (peer.is_channel(), self.message_id) {
            debug!(?peer, msg_id, "input chat unknown, fetching message");
            let Some(fetched) = client.get_message(None, msg_id).await? else {
                return Ok(None);
            };
            if let Some(chat) = fetched.chat {
                self.chat = Resolution::Resolved(chat);
            }
            return Ok(fetched.input_chat);
        }

        let target = peer_id(&peer)?;
        debug!(?peer, target, "input chat unknown, scanning dialogs");
        let mut found: Option<Dialog> = None;
        // Keep consuming after a match: the client owns the pagination and
        // expects the walk to run to the end.
        client
            .iter_dialogs(&mut |dialog: Dialog| -> Result<()> {
                if found.is_none() && dialog.id == target {
                    found = Some(dialog);
                }
                Ok(())
            })
            .await?;

        Ok(found.map(|dialog| {
            self.chat = Resolution::Resolved(dialog.entity);
            dialog.input_entity
        }))
    }

    /// Full metadata record of the chat.
    ///
    /// Prefers the entities that came with the update; otherwise makes one
    /// `get_entity` call.
    pub async fn chat(&mut self) -> Result<Option<Entity>> {
        let Some(input) = self.input_chat().await? else {
            return Ok(None);
        };
        if let Resolution::Resolved(chat) = &self.chat {
            return Ok(Some(chat.clone()));
        }

        if let Some(chat) = self.chat_id().and_then(|id| self.entities.get(&id)).cloned() {
            self.chat = Resolution::Resolved(chat.clone());
            return Ok(Some(chat));
        }

        let client = self.client.clone().ok_or(Error::NoClient)?;
        match client.get_entity(&input).await {
            Ok(chat) => {
                self.chat = Resolution::Resolved(chat.clone());
                Ok(Some(chat))
            }
            Err(e) => {
                self.chat = Resolution::Failed(e.to_string());
                Err(e)
            }
        }
    }

    pub fn to_structured_form(&self) -> Result<Map<String, Value>> {
        structured_form(self, &self.event_name)
    }
}

impl fmt::Debug for EventCommon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventCommon")
            .field("event_name", &self.event_name)
            .field("chat_peer", &self.chat_peer)
            .field("message_id", &self.message_id)
            .field("input_chat", &self.input_chat)
            .field("chat", &self.chat)
            .field("has_client", &self.client.is_some())
            .field("pattern_match", &self.pattern_match)
            .field("is_private", &self.is_private)
            .field("is_group", &self.is_group)
            .field("is_channel", &self.is_channel)
            .finish_non_exhaustive()
    }
}

/// Public fields of `event` plus the `"_"` discriminator.
pub fn structured_form<T: Serialize>(event: &T, name: &str) -> Result<Map<String, Value>> {
    let mut map = match serde_json::to_value(event)? {
        Value::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert("value".to_string(), other);
            map
        }
    };
    map.insert("_".to_string(), Value::String(name.to_string()));
    Ok(map)
}

/// Multi-line rendering of a structured form.
pub fn pretty(form: &Map<String, Value>) -> Result<String> {
    Ok(serde_json::to_string_pretty(form)?)
}

/// Single-line (zero indent) rendering of a structured form.
pub fn compact(form: &Map<String, Value>) -> Result<String> {
    Ok(serde_json::to_string(form)?)
}
