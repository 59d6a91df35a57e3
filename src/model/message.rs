//! Inbound gateway events and outbound renditions.
//!
//! The bot adapter converts serenity's `Message` and `MessageUpdateEvent` into these
//! types so the relay engine never touches gateway payloads directly.

use std::sync::Arc;

use serenity::all::{
    Attachment, ChannelId, Message, MessageId, MessageReferenceKind, MessageUpdateEvent,
    StickerId, UserId,
};

use crate::model::guild::GuildIdentity;

/// Discord marks spoilered uploads by prefixing the file name.
const SPOILER_PREFIX: &str = "SPOILER_";

/// Author of an inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageAuthor {
    pub id: UserId,
    /// Guild nickname, global display name or username, in that order of preference.
    pub display_name: String,
    /// Any bot account, including ours.
    pub bot: bool,
    /// Posted through a webhook rather than a user or bot account.
    pub webhook: bool,
    /// Posted by the relay's own account.
    pub is_relay: bool,
}

/// Reference to an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentRef {
    pub filename: String,
    pub url: String,
    pub spoiler: bool,
    /// Size in bytes.
    pub size: u32,
}

impl From<&Attachment> for AttachmentRef {
    fn from(attachment: &Attachment) -> Self {
        Self {
            filename: attachment.filename.clone(),
            url: attachment.url.clone(),
            spoiler: attachment.filename.starts_with(SPOILER_PREFIX),
            size: attachment.size,
        }
    }
}

/// A downloaded file uploaded again with every copy.
///
/// The file name keeps Discord's `SPOILER_` prefix so the copy stays spoilered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub filename: String,
    pub data: Arc<[u8]>,
}

/// A sticker attached to an inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StickerRef {
    /// Discord's own sticker, any bot can send it by ID.
    Standard(StickerId),
    /// Guild sticker, only usable in its guild, so it is linked by image URL.
    Custom { url: String },
}

/// A new message posted in a guild channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub channel_id: ChannelId,
    pub message_id: MessageId,
    pub guild: GuildIdentity,
    pub author: MessageAuthor,
    pub content: String,
    /// Attachments relayed as links, either too large or not yet downloaded.
    pub attachments: Vec<AttachmentRef>,
    /// Attachments uploaded again with the copy.
    pub files: Vec<FileUpload>,
    pub stickers: Vec<StickerRef>,
    /// Content of the message this one replies to, when known.
    pub reply_to: Option<String>,
    /// Content of the forwarded message when this one is a forward.
    pub forwarded: Option<String>,
}

impl InboundMessage {
    /// Converts a gateway message into an inbound relay event.
    ///
    /// Every attachment starts out as a link and every sticker as unresolved. The bot
    /// adapter downloads files and resolves sticker kinds afterwards since both need
    /// the REST API.
    ///
    /// # Arguments
    /// - `message` - Message received from the gateway
    /// - `guild` - Identity of the guild the message was posted in
    /// - `relay_user_id` - ID of the bot's own account, used for loop prevention
    pub fn from_message(message: &Message, guild: GuildIdentity, relay_user_id: UserId) -> Self {
        let display_name = message
            .member
            .as_ref()
            .and_then(|member| member.nick.clone())
            .or_else(|| message.author.global_name.clone())
            .unwrap_or_else(|| message.author.name.clone());

        let is_forward = message
            .message_reference
            .as_ref()
            .is_some_and(|reference| reference.kind == MessageReferenceKind::Forward);
        let forwarded = is_forward.then(|| {
            message
                .message_snapshots
                .first()
                .map(|snapshot| snapshot.content.clone())
                .unwrap_or_default()
        });

        Self {
            channel_id: message.channel_id,
            message_id: message.id,
            guild,
            author: MessageAuthor {
                id: message.author.id,
                display_name,
                bot: message.author.bot,
                webhook: message.webhook_id.is_some(),
                is_relay: message.author.id == relay_user_id,
            },
            content: message.content.clone(),
            attachments: message.attachments.iter().map(AttachmentRef::from).collect(),
            files: Vec::new(),
            stickers: Vec::new(),
            reply_to: message
                .referenced_message
                .as_ref()
                .filter(|_| !is_forward)
                .map(|referenced| referenced.content.clone()),
            forwarded,
        }
    }

    /// Whether there is nothing to relay.
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
            && self.attachments.is_empty()
            && self.files.is_empty()
            && self.stickers.is_empty()
            && self.forwarded.is_none()
    }

    /// Moves downloaded attachments from links to uploads.
    ///
    /// `downloads` pairs with `attachments` by position. An attachment without a
    /// download stays a link.
    pub fn attach_downloads(&mut self, downloads: Vec<Option<FileUpload>>) {
        let attachments = std::mem::take(&mut self.attachments);

        for (attachment, download) in attachments.into_iter().zip(
            downloads
                .into_iter()
                .chain(std::iter::repeat_with(|| None)),
        ) {
            match download {
                Some(file) => self.files.push(file),
                None => self.attachments.push(attachment),
            }
        }
    }

    /// IDs of standard stickers, sent natively with the first part of a copy.
    pub fn standard_stickers(&self) -> Vec<StickerId> {
        self.stickers
            .iter()
            .filter_map(|sticker| match sticker {
                StickerRef::Standard(id) => Some(*id),
                StickerRef::Custom { .. } => None,
            })
            .collect()
    }
}

/// An edit to a previously posted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEdit {
    pub channel_id: ChannelId,
    pub message_id: MessageId,
    pub content: String,
}

impl InboundEdit {
    /// Converts a gateway update event into an inbound edit.
    ///
    /// Returns `None` for updates without content, such as Discord attaching link
    /// previews to an existing message.
    pub fn from_update_event(event: &MessageUpdateEvent) -> Option<Self> {
        let content = event.content.clone()?;

        Some(Self {
            channel_id: event.channel_id,
            message_id: event.id,
            content,
        })
    }
}

/// Deletion of a previously posted message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InboundDelete {
    pub channel_id: ChannelId,
    pub message_id: MessageId,
}

/// Rendered text of one relayed message, split into parts that each fit in a single
/// Discord message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRendition {
    pub parts: Vec<String>,
}

impl OutboundRendition {
    /// Builds the messages posting a new copy.
    ///
    /// Files and stickers go with the first part so they stay next to the header.
    pub fn into_messages(
        self,
        files: &[FileUpload],
        stickers: &[StickerId],
    ) -> Vec<OutboundMessage> {
        self.parts
            .into_iter()
            .enumerate()
            .map(|(index, content)| {
                if index == 0 {
                    OutboundMessage {
                        content,
                        files: files.to_vec(),
                        stickers: stickers.to_vec(),
                    }
                } else {
                    OutboundMessage::text(content)
                }
            })
            .collect()
    }
}

/// A single Discord message posted to a destination channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub content: String,
    pub files: Vec<FileUpload>,
    pub stickers: Vec<StickerId>,
}

impl OutboundMessage {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            files: Vec::new(),
            stickers: Vec::new(),
        }
    }
}
