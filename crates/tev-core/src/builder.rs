use std::{collections::HashSet, sync::Arc};

use crate::{
    chats::resolve_chats,
    client::ChatClient,
    domain::{ChatRef, Update},
    errors::Error,
    events::Event,
    naming::event_label,
    peer::input_peer_id,
    Result,
};

/// Which chats a builder listens to, as configured by the user.
///
/// `chats: None` means every chat. With `blacklist` set the listed chats are the
/// only ones ignored instead of the only ones handled.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChatFilter {
    pub chats: Option<Vec<ChatRef>>,
    pub blacklist: bool,
}

impl ChatFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chat(mut self, chat: impl Into<ChatRef>) -> Self {
        self.chats.get_or_insert_with(Vec::new).push(chat.into());
        self
    }

    pub fn chats<I, C>(mut self, chats: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<ChatRef>,
    {
        self.chats
            .get_or_insert_with(Vec::new)
            .extend(chats.into_iter().map(Into::into));
        self
    }

    pub fn blacklist(mut self, blacklist: bool) -> Self {
        self.blacklist = blacklist;
        self
    }

    /// Resolve every reference into canonical ids and record our own id.
    pub async fn resolve(&self, client: &dyn ChatClient) -> Result<ResolvedChatFilter> {
        let chats = resolve_chats(client, self.chats.as_deref()).await?;
        let me = client.get_me(true).await?;
        let self_id = input_peer_id(&me).map_err(|e| match e {
            Error::NotFound(_) => Error::NotFound("own identity has no id".to_string()),
            other => other,
        })?;

        Ok(ResolvedChatFilter {
            chats,
            blacklist: self.blacklist,
            self_id,
        })
    }
}

/// Chat filter after resolution; immutable.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedChatFilter {
    pub chats: Option<HashSet<i64>>,
    pub blacklist: bool,
    pub self_id: i64,
}

impl ResolvedChatFilter {
    /// Whether an event from `chat_id` gets through.
    ///
    /// Events without a chat never pass an active filter, whitelist or blacklist.
    pub fn passes(&self, chat_id: Option<i64>) -> bool {
        let Some(chats) = &self.chats else {
            return true;
        };
        let Some(chat_id) = chat_id else {
            return false;
        };
        chats.contains(&chat_id) != self.blacklist
    }
}

/// An event family: turns matching updates into events.
pub trait EventBuilder: Send + Sync {
    /// Family name used in diagnostics, e.g. `NewMessage`.
    fn family(&self) -> &'static str;

    /// Whether the family declares its own inner event type.
    fn has_inner_event(&self) -> bool {
        true
    }

    fn chat_filter(&self) -> &ChatFilter;

    /// Build an event for `update` if this family applies. Must not do I/O.
    fn build(&self, update: &Update, self_id: i64) -> Option<Event>;
}

/// A builder whose chat filter has been resolved against a client.
pub struct ResolvedBuilder {
    builder: Box<dyn EventBuilder>,
    filter: ResolvedChatFilter,
    label: Arc<str>,
}

impl ResolvedBuilder {
    pub async fn resolve(builder: Box<dyn EventBuilder>, client: &dyn ChatClient) -> Result<Self> {
        let filter = builder.chat_filter().resolve(client).await?;
        let label = event_label(builder.family(), builder.has_inner_event());
        Ok(Self {
            builder,
            filter,
            label,
        })
    }

    pub fn family(&self) -> &'static str {
        self.builder.family()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn filter(&self) -> &ResolvedChatFilter {
        &self.filter
    }

    pub fn build(&self, update: &Update) -> Option<Event> {
        let mut event = self.builder.build(update, self.filter.self_id)?;
        event.common_mut().set_event_name(self.label.clone());
        Some(event)
    }

    /// The event back if it passes the chat filter.
    pub fn filter_event(&self, event: Event) -> Option<Event> {
        self.filter.passes(event.chat_id()).then_some(event)
    }
}
