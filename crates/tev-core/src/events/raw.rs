use serde::Serialize;

use crate::{
    builder::{ChatFilter, EventBuilder},
    domain::Update,
    event::EventCommon,
    events::Event,
};

/// Every update, unfiltered by kind.
#[derive(Clone, Debug, Default)]
pub struct Raw {
    filter: ChatFilter,
}

impl Raw {
    pub fn new(filter: ChatFilter) -> Self {
        Self { filter }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct RawEvent {
    #[serde(flatten)]
    pub common: EventCommon,
}

impl EventBuilder for Raw {
    fn family(&self) -> &'static str {
        "Raw"
    }

    fn chat_filter(&self) -> &ChatFilter {
        &self.filter
    }

    fn build(&self, update: &Update, _self_id: i64) -> Option<Event> {
        let message = update.message();
        let common = EventCommon::new(
            update.chat_peer(),
            message.map(|m| m.id),
            message.is_some_and(|m| m.post),
        )
        .with_entities(update.entities.clone());

        Some(Event::Raw(RawEvent { common }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Peer, UpdateKind};

    #[test]
    fn builds_for_updates_without_a_chat() {
        let update = Update::new(UpdateKind::Other {
            name: "updateConfig".to_string(),
        });
        let event = Raw::default().build(&update, 1).unwrap();
        assert_eq!(event.chat_id(), None);
        assert_eq!(event.common().message_id(), None);
    }

    #[test]
    fn deleted_channel_messages_carry_the_channel() {
        let update = Update::new(UpdateKind::DeleteMessages {
            channel_id: Some(4),
            ids: vec![1, 2],
        });
        let event = Raw::default().build(&update, 1).unwrap();
        assert_eq!(event.common().chat_peer(), Some(Peer::Channel(4)));
        assert!(event.common().is_channel);
    }
}
