//! Relay engine for wormhole messages.
//!
//! This module provides the `RelayService` which turns inbound gateway events into
//! outbound copies. For a new message it resolves the origin's group, renders one
//! rendition and dispatches it to every other member channel concurrently, recording
//! the copies in the correlation store. A rendition longer than one Discord message is
//! posted as several parts and every part is recorded. Edits and deletes of the origin are then
//! propagated to every recorded copy.
//!
//! The service is organized into separate modules by event:
//! - `create` - New messages
//! - `edit` - Edited messages
//! - `delete` - Deleted messages

pub mod create;
pub mod delete;
pub mod edit;

#[cfg(test)]
mod test;

use std::sync::Arc;

use crate::{
    config::Config,
    model::{message::InboundMessage, relay::DropReason},
    service::{correlation::CorrelationStore, directory::GroupDirectory, identity::IdentityResolver},
};

/// Which inbound messages are relayed at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelayOptions {
    /// Drop messages from any bot or webhook, not only from the relay itself.
    pub ignore_bots: bool,
    /// Messages starting with this prefix are bot commands and never relayed.
    pub command_prefix: Option<String>,
}

impl RelayOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            ignore_bots: config.ignore_bots,
            command_prefix: config.command_prefix.clone(),
        }
    }
}

/// Service relaying messages between the channels of a wormhole group.
///
/// Holds the shared directory, identity resolver and correlation store. The dispatcher
/// is passed per call since every gateway event comes with its own HTTP handle.
pub struct RelayService {
    directory: Arc<GroupDirectory>,
    identity: Arc<IdentityResolver>,
    correlations: CorrelationStore,
    options: RelayOptions,
}

impl RelayService {
    /// Creates a new RelayService instance.
    ///
    /// # Arguments
    /// - `directory` - Group directory answering membership queries
    /// - `identity` - Resolver for origin labels
    /// - `correlations` - Store of relayed messages for edit and delete propagation
    /// - `options` - Filters applied to inbound messages
    ///
    /// # Returns
    /// - `RelayService` - New service instance
    pub fn new(
        directory: Arc<GroupDirectory>,
        identity: Arc<IdentityResolver>,
        correlations: CorrelationStore,
        options: RelayOptions,
    ) -> Self {
        Self {
            directory,
            identity,
            correlations,
            options,
        }
    }

    /// Decides whether a new message must be dropped before any lookup happens.
    fn screen(&self, message: &InboundMessage) -> Option<DropReason> {
        if message.author.is_relay {
            return Some(DropReason::SelfAuthored);
        }

        if self.options.ignore_bots && (message.author.bot || message.author.webhook) {
            return Some(DropReason::BotAuthored);
        }

        if let Some(prefix) = &self.options.command_prefix {
            if message.content.starts_with(prefix.as_str()) {
                return Some(DropReason::Command);
            }
        }

        if message.is_empty() {
            return Some(DropReason::Empty);
        }

        None
    }
}
