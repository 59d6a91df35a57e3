//! Delivery of renditions to destination channels.
//!
//! The relay engine only talks to the `Dispatcher` trait. `SerenityDispatcher` performs
//! the actual Discord REST calls and `RetryingDispatcher` wraps any dispatcher with
//! bounded exponential backoff for transient failures.

pub mod discord;
pub mod retry;

#[cfg(test)]
pub mod mock;

use serenity::all::{ChannelId, MessageId};
use serenity::async_trait;

use crate::{error::dispatch::DispatchError, model::message::OutboundMessage};

pub use self::discord::SerenityDispatcher;
pub use self::retry::{BackoffPolicy, RetryingDispatcher};

/// Sends, edits and deletes relayed messages in a single destination channel.
///
/// Every call targets exactly one destination so a failure is always attributable to
/// that destination alone. A copy split into several parts is several calls.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// Posts one message of a copy and returns the ID of the created message.
    async fn send(
        &self,
        channel_id: ChannelId,
        message: &OutboundMessage,
    ) -> Result<MessageId, DispatchError>;

    /// Replaces the text of a previously posted message, leaving its files in place.
    async fn edit(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        content: &str,
    ) -> Result<(), DispatchError>;

    /// Deletes a previously posted copy.
    async fn delete(&self, channel_id: ChannelId, message_id: MessageId)
        -> Result<(), DispatchError>;
}
