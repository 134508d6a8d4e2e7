//! Canonical ("marked") peer ids.
//!
//! Users keep their raw id, basic groups are negated, and channels are negated
//! after adding [`CHANNEL_OFFSET`]. The same raw number can name a user, a group
//! and a channel, so a bare non-negative integer is ambiguous until a kind is
//! known.

use crate::{
    domain::{InputPeer, Peer},
    errors::Error,
    Result,
};

/// Offset added to channel ids before negation.
pub const CHANNEL_OFFSET: i64 = 1_000_000_000_000;

/// Largest raw id whose channel encoding still fits in an `i64`.
pub const MAX_RAW_ID: i64 = i64::MAX - CHANNEL_OFFSET;

fn check_raw_id(raw: i64) -> Result<i64> {
    if (0..=MAX_RAW_ID).contains(&raw) {
        Ok(raw)
    } else {
        Err(Error::InvalidPeerId(format!(
            "raw id {raw} outside 0..={MAX_RAW_ID}"
        )))
    }
}

/// Canonical id of a typed peer.
pub fn peer_id(peer: &Peer) -> Result<i64> {
    let raw = check_raw_id(peer.raw_id())?;
    Ok(match peer {
        Peer::User(_) => raw,
        Peer::Chat(_) => -raw,
        Peer::Channel(_) => -(CHANNEL_OFFSET + raw),
    })
}

/// Decode a canonical id back into a typed peer.
///
/// Basic group raw ids are expected to stay below `CHANNEL_OFFSET`.
pub fn resolve_id(marked: i64) -> Result<Peer> {
    if marked >= 0 {
        return Ok(Peer::User(check_raw_id(marked)?));
    }
    let m = marked
        .checked_neg()
        .ok_or_else(|| Error::InvalidPeerId(format!("marked id {marked} cannot be decoded")))?;
    if m >= CHANNEL_OFFSET {
        Ok(Peer::Channel(m - CHANNEL_OFFSET))
    } else {
        Ok(Peer::Chat(m))
    }
}

/// Canonical id of an addressable reference.
///
/// `Empty` and `SelfPeer` do not name a concrete chat and are reported as not found.
pub fn input_peer_id(peer: &InputPeer) -> Result<i64> {
    match *peer {
        InputPeer::User { user_id, .. } => peer_id(&Peer::User(user_id)),
        InputPeer::Chat { chat_id } => peer_id(&Peer::Chat(chat_id)),
        InputPeer::Channel { channel_id, .. } => peer_id(&Peer::Channel(channel_id)),
        InputPeer::Empty | InputPeer::SelfPeer => {
            Err(Error::NotFound(format!("{peer:?} has no chat id")))
        }
    }
}

/// Ids produced by normalizing a bare integer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PeerIds {
    /// Caller-marked id, used verbatim.
    Marked(i64),
    /// Raw id expanded into its user, group and channel encodings.
    Ambiguous([i64; 3]),
}

impl PeerIds {
    pub fn as_slice(&self) -> &[i64] {
        match self {
            PeerIds::Marked(id) => std::slice::from_ref(id),
            PeerIds::Ambiguous(ids) => ids,
        }
    }
}

/// Normalize a bare integer chat reference.
///
/// Raw id `0` is the one non-negative input whose user and group encodings
/// coincide (both `0`), so its expansion holds only two distinct ids. Real
/// chats start at 1. Raw ids above [`MAX_RAW_ID`] are rejected.
pub fn normalize(id: i64) -> Result<PeerIds> {
    if id < 0 {
        return Ok(PeerIds::Marked(id));
    }
    Ok(PeerIds::Ambiguous([
        peer_id(&Peer::User(id))?,
        peer_id(&Peer::Chat(id))?,
        peer_id(&Peer::Channel(id))?,
    ]))
}
