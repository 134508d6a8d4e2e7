//! Concrete event families.

use std::fmt;

use serde_json::{Map, Value};

use crate::{
    domain::{Entity, InputPeer},
    event::{compact, pretty, structured_form, EventCommon},
    Result,
};

pub mod new_message;
pub mod raw;

pub use new_message::{NewMessage, NewMessageEvent};
pub use raw::{Raw, RawEvent};

/// An event produced by one of the families.
#[derive(Clone, Debug)]
pub enum Event {
    Raw(RawEvent),
    NewMessage(NewMessageEvent),
}

impl Event {
    pub fn common(&self) -> &EventCommon {
        match self {
            Event::Raw(e) => &e.common,
            Event::NewMessage(e) => &e.common,
        }
    }

    pub fn common_mut(&mut self) -> &mut EventCommon {
        match self {
            Event::Raw(e) => &mut e.common,
            Event::NewMessage(e) => &mut e.common,
        }
    }

    pub fn chat_id(&self) -> Option<i64> {
        self.common().chat_id()
    }

    pub async fn input_chat(&mut self) -> Result<Option<InputPeer>> {
        self.common_mut().input_chat().await
    }

    pub async fn chat(&mut self) -> Result<Option<Entity>> {
        self.common_mut().chat().await
    }

    /// Public fields of the event plus its `"_"` family label.
    pub fn to_structured_form(&self) -> Result<Map<String, Value>> {
        let name = self.common().event_name();
        match self {
            Event::Raw(e) => structured_form(e, name),
            Event::NewMessage(e) => structured_form(e, name),
        }
    }

    /// Zero-indent rendering of the structured form.
    pub fn stringify(&self) -> Result<String> {
        compact(&self.to_structured_form()?)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self
            .to_structured_form()
            .and_then(|form| pretty(&form))
            .map_err(|_| fmt::Error)?;
        f.write_str(&rendered)
    }
}
