//! Correlation records and relay outcomes.

use std::collections::HashMap;

use serenity::all::{ChannelId, MessageId};

use crate::model::message::InboundMessage;

/// Key of a relayed message: where the original was posted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OriginKey {
    pub channel_id: ChannelId,
    pub message_id: MessageId,
}

impl OriginKey {
    pub fn new(channel_id: ChannelId, message_id: MessageId) -> Self {
        Self {
            channel_id,
            message_id,
        }
    }
}

/// Record linking an original message to the copies delivered to other channels.
///
/// Keeps the original message, without its downloaded files, so copies can be
/// re-rendered on edit with the identity captured when it was first relayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayedMessage {
    pub origin: OriginKey,
    pub source: InboundMessage,
    /// Destination channel to the IDs of the parts posted there, in order.
    pub destinations: HashMap<ChannelId, Vec<MessageId>>,
}

/// Why an inbound event was not relayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Posted by the relay itself.
    SelfAuthored,
    /// Posted by another bot or a webhook while bots are ignored.
    BotAuthored,
    /// Starts with the configured command prefix.
    Command,
    /// Nothing to relay: no content, attachments, stickers or forward.
    Empty,
    NotAWormholeChannel,
    /// The origin is the only channel of its group.
    NoDestinations,
    /// The same message was already relayed.
    AlreadyRelayed,
    /// The origin was deleted before its relay got to run.
    AlreadyDeleted,
}

/// Result of handling one inbound event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    Dropped(DropReason),
    Relayed { delivered: usize, failed: usize },
    Edited { updated: usize, failed: usize },
    Deleted { removed: usize, failed: usize },
    /// Edit or delete of a message without a correlation entry.
    NotCorrelated,
}
