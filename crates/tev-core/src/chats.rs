use std::collections::HashSet;

use tracing::debug;

use crate::{
    client::ChatClient,
    domain::{ChatRef, InputPeer},
    errors::Error,
    peer::{input_peer_id, normalize, peer_id},
    Result,
};

/// Turn the configured chat references into a set of canonical ids.
///
/// `None` means "no filter". Integers and typed peers are handled locally;
/// everything else goes through the client, and the first failed lookup fails
/// the whole set.
pub async fn resolve_chats(
    client: &dyn ChatClient,
    chats: Option<&[ChatRef]>,
) -> Result<Option<HashSet<i64>>> {
    let Some(chats) = chats else {
        return Ok(None);
    };

    let mut result = HashSet::new();
    for chat in chats {
        match chat {
            ChatRef::Id(id) => result.extend(normalize(*id)?.as_slice()),
            ChatRef::Peer(peer) => {
                result.insert(peer_id(peer)?);
            }
            other => {
                let id = resolve_remote(client, other).await?;
                result.insert(id);
            }
        }
    }

    debug!(configured = chats.len(), resolved = result.len(), "resolved chat filter");
    Ok(Some(result))
}

async fn resolve_remote(client: &dyn ChatClient, chat: &ChatRef) -> Result<i64> {
    let mut input = client.get_input_entity(chat).await?;
    if input == InputPeer::SelfPeer {
        input = client.get_me(true).await?;
    }
    input_peer_id(&input).map_err(|e| match e {
        Error::NotFound(_) => Error::NotFound(format!("{chat:?} has no chat id")),
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{domain::Peer, test_support::FakeClient};

    #[tokio::test]
    async fn absent_chats_mean_no_filter() {
        let client = FakeClient::new(1);
        assert_eq!(resolve_chats(&client, None).await.unwrap(), None);
        assert_eq!(client.calls().get_input_entity, 0);
    }

    #[tokio::test]
    async fn marked_id_is_used_verbatim() {
        let client = FakeClient::new(1);
        let set = resolve_chats(&client, Some(&[ChatRef::Id(-100)]))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(set, HashSet::from([-100]));
    }

    #[tokio::test]
    async fn raw_id_expands_to_every_kind() {
        let client = FakeClient::new(1);
        let set = resolve_chats(&client, Some(&[ChatRef::Id(42)]))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(set, HashSet::from([42, -42, -1_000_000_000_042]));
        assert_eq!(client.calls().get_input_entity, 0);
    }

    #[tokio::test]
    async fn typed_peers_and_lookups_are_unioned() {
        let client = FakeClient::new(1).with_input(
            ChatRef::Username("rustlang".to_string()),
            InputPeer::Channel {
                channel_id: 5,
                access_hash: 9,
            },
        );
        let chats = [
            ChatRef::Peer(Peer::Chat(3)),
            ChatRef::Username("rustlang".to_string()),
            ChatRef::Id(-7),
        ];
        let set = resolve_chats(&client, Some(&chats)).await.unwrap().unwrap();
        assert_eq!(set, HashSet::from([-3, -1_000_000_000_005, -7]));
        assert_eq!(client.calls().get_input_entity, 1);
    }

    #[tokio::test]
    async fn self_marker_is_replaced_by_own_identity() {
        let client = FakeClient::new(555).with_input(ChatRef::Me, InputPeer::SelfPeer);
        let set = resolve_chats(&client, Some(&[ChatRef::Me]))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(set, HashSet::from([555]));
        assert_eq!(client.calls().get_me, 1);
    }

    #[tokio::test]
    async fn one_failed_lookup_fails_the_whole_set() {
        let client = FakeClient::new(1);
        let chats = [ChatRef::Id(1), ChatRef::Username("missing".to_string())];
        let err = resolve_chats(&client, Some(&chats)).await.unwrap_err();
        assert!(err.is_not_found());

        let mut client = FakeClient::new(1);
        client
            .network_failures
            .insert(ChatRef::Phone("+100".to_string()));
        let err = resolve_chats(&client, Some(&[ChatRef::Phone("+100".to_string())]))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Network(_)));
    }

    #[tokio::test]
    async fn out_of_range_ids_fail_instead_of_overflowing() {
        let client = FakeClient::new(1);
        for chat in [
            ChatRef::Id(9_223_372_036_854_775_000),
            ChatRef::Peer(Peer::Channel(i64::MAX)),
            ChatRef::Peer(Peer::Chat(i64::MIN)),
        ] {
            let err = resolve_chats(&client, Some(&[chat])).await.unwrap_err();
            assert!(matches!(err, Error::InvalidPeerId(_)));
        }
        assert_eq!(client.calls().get_input_entity, 0);
    }
}
