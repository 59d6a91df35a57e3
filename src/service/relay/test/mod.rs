use std::{sync::Arc, time::Duration};

use chrono::Utc;
use serenity::all::{ChannelId, GuildId, MessageId, StickerId, UserId};

use crate::{
    error::dispatch::DispatchError,
    model::{
        group::{WormholeChannel, WormholeGroup},
        guild::GuildIdentity,
        message::{
            AttachmentRef, FileUpload, InboundDelete, InboundEdit, InboundMessage,
            MessageAuthor, StickerRef,
        },
        relay::{DropReason, OriginKey, RelayOutcome},
    },
    service::{
        correlation::{CorrelationStore, RetentionPolicy},
        directory::GroupDirectory,
        dispatcher::mock::{DispatchCall, RecordingDispatcher},
        identity::{EmojiAsset, IdentityResolver},
        relay::{RelayOptions, RelayService},
        render::{CONTINUATION_MARK, MESSAGE_LIMIT},
    },
};

mod edit;

/// Builds a group whose channel `n` lives in guild `n + 1000`.
fn group(id: i32, channels: &[u64]) -> WormholeGroup {
    WormholeGroup {
        id,
        name: format!("group-{}", id),
        slowmode: 0,
        channels: channels
            .iter()
            .map(|channel| WormholeChannel {
                group_id: id,
                guild_id: GuildId::new(channel + 1000),
                channel_id: ChannelId::new(*channel),
            })
            .collect(),
        created_at: Utc::now(),
    }
}

struct TestRelay {
    service: RelayService,
    correlations: CorrelationStore,
    identity: Arc<IdentityResolver>,
}

fn relay_with(groups: Vec<WormholeGroup>, options: RelayOptions, capacity: usize) -> TestRelay {
    let correlations = CorrelationStore::new(RetentionPolicy {
        capacity,
        ttl: Duration::from_secs(3600),
    });
    let identity = Arc::new(IdentityResolver::new("_"));

    TestRelay {
        service: RelayService::new(
            Arc::new(GroupDirectory::from_groups(groups)),
            Arc::clone(&identity),
            correlations.clone(),
            options,
        ),
        correlations,
        identity,
    }
}

fn relay(groups: Vec<WormholeGroup>) -> TestRelay {
    relay_with(
        groups,
        RelayOptions {
            ignore_bots: true,
            command_prefix: Some("!".to_string()),
        },
        100,
    )
}

fn author(name: &str) -> MessageAuthor {
    MessageAuthor {
        id: UserId::new(500),
        display_name: name.to_string(),
        bot: false,
        webhook: false,
        is_relay: false,
    }
}

fn inbound(channel_id: u64, message_id: u64, content: &str) -> InboundMessage {
    InboundMessage {
        channel_id: ChannelId::new(channel_id),
        message_id: MessageId::new(message_id),
        guild: GuildIdentity::new(GuildId::new(channel_id + 1000), "ČVUT FEL"),
        author: author("Ferda"),
        content: content.to_string(),
        attachments: Vec::new(),
        files: Vec::new(),
        stickers: Vec::new(),
        reply_to: None,
        forwarded: None,
    }
}

fn edit(channel_id: u64, message_id: u64, content: &str) -> InboundEdit {
    InboundEdit {
        channel_id: ChannelId::new(channel_id),
        message_id: MessageId::new(message_id),
        content: content.to_string(),
    }
}

fn delete(channel_id: u64, message_id: u64) -> InboundDelete {
    InboundDelete {
        channel_id: ChannelId::new(channel_id),
        message_id: MessageId::new(message_id),
    }
}

fn origin(channel_id: u64, message_id: u64) -> OriginKey {
    OriginKey::new(ChannelId::new(channel_id), MessageId::new(message_id))
}

fn sent_channels(dispatcher: &RecordingDispatcher) -> Vec<ChannelId> {
    let mut channels: Vec<ChannelId> = dispatcher
        .sends()
        .iter()
        .map(DispatchCall::channel_id)
        .collect();
    channels.sort();
    channels
}
