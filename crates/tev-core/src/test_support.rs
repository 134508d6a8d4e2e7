//! Hand-rolled `ChatClient` fake shared by the unit tests.

use std::{
    collections::{HashMap, HashSet},
    sync::Mutex,
};

use async_trait::async_trait;

use crate::{
    client::ChatClient,
    domain::{ChatRef, Dialog, Entity, FetchedMessage, InputPeer},
    errors::Error,
    peer::input_peer_id,
    Result,
};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Calls {
    pub get_input_entity: usize,
    pub get_me: usize,
    pub get_message: usize,
    pub iter_dialogs: usize,
    pub dialogs_yielded: usize,
    pub get_entity: usize,
}

#[derive(Default)]
pub struct FakeClient {
    pub me: i64,
    pub input_entities: HashMap<ChatRef, InputPeer>,
    pub network_failures: HashSet<ChatRef>,
    pub messages: HashMap<i32, FetchedMessage>,
    pub dialogs: Vec<Dialog>,
    pub entities: HashMap<i64, Entity>,
    pub entity_failures: HashSet<i64>,
    pub calls: Mutex<Calls>,
}

impl FakeClient {
    pub fn new(me: i64) -> Self {
        Self {
            me,
            ..Self::default()
        }
    }

    pub fn with_input(mut self, chat: impl Into<ChatRef>, peer: InputPeer) -> Self {
        self.input_entities.insert(chat.into(), peer);
        self
    }

    pub fn calls(&self) -> Calls {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatClient for FakeClient {
    async fn get_input_entity(&self, chat: &ChatRef) -> Result<InputPeer> {
        self.calls.lock().unwrap().get_input_entity += 1;
        if self.network_failures.contains(chat) {
            return Err(Error::Network("connection reset".to_string()));
        }
        self.input_entities
            .get(chat)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("{chat:?}")))
    }

    async fn get_me(&self, input_peer: bool) -> Result<InputPeer> {
        assert!(input_peer);
        self.calls.lock().unwrap().get_me += 1;
        Ok(InputPeer::User {
            user_id: self.me,
            access_hash: 0,
        })
    }

    async fn get_message(
        &self,
        _chat: Option<&InputPeer>,
        id: i32,
    ) -> Result<Option<FetchedMessage>> {
        self.calls.lock().unwrap().get_message += 1;
        Ok(self.messages.get(&id).cloned())
    }

    async fn iter_dialogs(
        &self,
        on_dialog: &mut (dyn FnMut(Dialog) -> Result<()> + Send),
    ) -> Result<()> {
        self.calls.lock().unwrap().iter_dialogs += 1;
        for dialog in self.dialogs.iter().cloned() {
            self.calls.lock().unwrap().dialogs_yielded += 1;
            on_dialog(dialog)?;
        }
        Ok(())
    }

    async fn get_entity(&self, peer: &InputPeer) -> Result<Entity> {
        self.calls.lock().unwrap().get_entity += 1;
        let id = input_peer_id(peer)?;
        if self.entity_failures.contains(&id) {
            return Err(Error::Network("flood wait".to_string()));
        }
        self.entities
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("{peer:?}")))
    }
}
