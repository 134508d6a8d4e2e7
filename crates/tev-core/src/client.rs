use async_trait::async_trait;

use crate::{
    domain::{ChatRef, Dialog, Entity, FetchedMessage, InputPeer},
    Result,
};

/// Port to the chat client that owns the connection and the entity cache.
///
/// Implementations report unresolvable references as `Error::NotFound`; every
/// other failure should be `Error::Network`.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Turn any chat reference into an addressable one.
    async fn get_input_entity(&self, chat: &ChatRef) -> Result<InputPeer>;

    /// The logged-in account, as an addressable reference when `input_peer` is set.
    async fn get_me(&self, input_peer: bool) -> Result<InputPeer>;

    /// Fetch a single message by id, with its chat already resolved.
    async fn get_message(&self, chat: Option<&InputPeer>, id: i32)
        -> Result<Option<FetchedMessage>>;

    /// Walk the whole dialog list, handing every dialog to `on_dialog`.
    ///
    /// The client drives the iteration (including pagination) to the end, so
    /// callers cannot leave it half-consumed. An error from the callback stops
    /// the walk and is returned.
    async fn iter_dialogs(
        &self,
        on_dialog: &mut (dyn FnMut(Dialog) -> Result<()> + Send),
    ) -> Result<()>;

    /// Fetch the full metadata record of a chat.
    async fn get_entity(&self, peer: &InputPeer) -> Result<Entity>;
}
