use regex::Regex;
use serde::Serialize;

use crate::{
    builder::{ChatFilter, EventBuilder},
    domain::{Message, Peer, Update, UpdateKind},
    event::{EventCommon, PatternMatch},
    events::Event,
    Result,
};

/// Which side of the conversation a message must come from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Both,
    Incoming,
    Outgoing,
}

/// New messages, optionally restricted by direction and a text pattern.
#[derive(Clone, Debug, Default)]
pub struct NewMessage {
    filter: ChatFilter,
    direction: Direction,
    pattern: Option<Regex>,
}

impl NewMessage {
    pub fn new(filter: ChatFilter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    /// Only messages sent by others.
    pub fn incoming(mut self) -> Self {
        self.direction = Direction::Incoming;
        self
    }

    /// Only messages sent by us.
    pub fn outgoing(mut self) -> Self {
        self.direction = Direction::Outgoing;
        self
    }

    /// Require the text to match `pattern` from its first character.
    pub fn pattern(mut self, pattern: &str) -> Result<Self> {
        self.pattern = Some(Regex::new(&format!(r"\A(?:{pattern})"))?);
        Ok(self)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    fn accepts_direction(&self, message: &Message, self_id: i64) -> bool {
        let out = message.out || message.from_id == Some(Peer::User(self_id));
        match self.direction {
            Direction::Both => true,
            Direction::Incoming => !out,
            Direction::Outgoing => out,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct NewMessageEvent {
    #[serde(flatten)]
    pub common: EventCommon,
    pub message: Message,
}

impl EventBuilder for NewMessage {
    fn family(&self) -> &'static str {
        "NewMessage"
    }

    fn chat_filter(&self) -> &ChatFilter {
        &self.filter
    }

    fn build(&self, update: &Update, self_id: i64) -> Option<Event> {
        let UpdateKind::NewMessage { message } = &update.kind else {
            return None;
        };
        if !self.accepts_direction(message, self_id) {
            return None;
        }

        let pattern_match = match &self.pattern {
            Some(re) => Some(PatternMatch::from_captures(&re.captures(&message.text)?)),
            None => None,
        };

        let mut common = EventCommon::new(Some(message.peer_id), Some(message.id), message.post)
            .with_entities(update.entities.clone());
        common.pattern_match = pattern_match;

        Some(Event::NewMessage(NewMessageEvent {
            common,
            message: message.clone(),
        }))
    }
}
