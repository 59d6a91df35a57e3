//! Test factories for creating Serenity message payloads.

use serenity::all::{Message, MessageUpdateEvent};

/// Fields of a test message that tests commonly vary.
///
/// Use struct update syntax with `TestMessage::default()` to set only what a test
/// cares about.
#[derive(Debug, Clone)]
pub struct TestMessage<'a> {
    pub guild_id: u64,
    pub channel_id: u64,
    pub message_id: u64,
    pub author_id: u64,
    pub author_name: &'a str,
    pub global_name: Option<&'a str>,
    pub nick: Option<&'a str>,
    pub bot: bool,
    pub webhook_id: Option<u64>,
    pub content: &'a str,
    /// `(filename, url)` pairs
    pub attachments: &'a [(&'a str, &'a str)],
    /// Content of the forwarded message, makes this message a forward
    pub forwarded: Option<&'a str>,
}

impl Default for TestMessage<'_> {
    fn default() -> Self {
        Self {
            guild_id: 100,
            channel_id: 200,
            message_id: 300,
            author_id: 400,
            author_name: "tester",
            global_name: None,
            nick: None,
            bot: false,
            webhook_id: None,
            content: "hello",
            attachments: &[],
            forwarded: None,
        }
    }
}

fn attachments_json(attachments: &[(&str, &str)]) -> serde_json::Value {
    attachments
        .iter()
        .enumerate()
        .map(|(index, (filename, url))| {
            serde_json::json!({
                "id": (900_000 + index as u64).to_string(),
                "filename": filename,
                "size": 1024,
                "url": url,
                "proxy_url": url,
            })
        })
        .collect()
}

/// Creates a test Serenity Message posted in a guild channel.
///
/// # Panics
/// - If the JSON cannot be deserialized into a Message (indicates invalid test data)
pub fn create_test_message(message: TestMessage<'_>) -> Message {
    let member = message.nick.map(|nick| {
        serde_json::json!({
            "nick": nick,
            "roles": [],
            "joined_at": "2020-01-01T00:00:00.000000+00:00",
            "deaf": false,
            "mute": false,
            "pending": false,
        })
    });

    let mut json = serde_json::json!({
        "id": message.message_id.to_string(),
        "channel_id": message.channel_id.to_string(),
        "guild_id": message.guild_id.to_string(),
        "author": {
            "id": message.author_id.to_string(),
            "username": message.author_name,
            "global_name": message.global_name,
            "discriminator": "0",
            "avatar": null,
            "bot": message.bot,
        },
        "member": member,
        "webhook_id": message.webhook_id.map(|id| id.to_string()),
        "content": message.content,
        "timestamp": "2020-01-01T00:00:00.000000+00:00",
        "edited_timestamp": null,
        "tts": false,
        "mention_everyone": false,
        "mentions": [],
        "mention_roles": [],
        "mention_channels": [],
        "attachments": attachments_json(message.attachments),
        "embeds": [],
        "reactions": [],
        "pinned": false,
        "type": 0,
        "flags": 0,
        "components": [],
        "sticker_items": [],
    });

    if let Some(forwarded) = message.forwarded {
        json["message_reference"] = serde_json::json!({
            "type": 1,
            "channel_id": "999",
            "message_id": "998",
        });
        json["message_snapshots"] = serde_json::json!([{
            "message": {
                "content": forwarded,
                "timestamp": "2020-01-01T00:00:00.000000+00:00",
                "edited_timestamp": null,
                "mentions": [],
                "attachments": [],
                "embeds": [],
                "type": 0,
                "flags": 0,
            }
        }]);
    }

    serde_json::from_value(json).expect("Failed to create test message - invalid JSON structure")
}

/// Creates a test MessageUpdateEvent as sent when a message's content is edited.
///
/// # Arguments
/// - `channel_id` - Channel the edited message lives in
/// - `message_id` - ID of the edited message
/// - `content` - New content, or `None` for updates that did not touch content
///
/// # Panics
/// - If the JSON cannot be deserialized into a MessageUpdateEvent
pub fn create_test_update_event(
    channel_id: u64,
    message_id: u64,
    content: Option<&str>,
) -> MessageUpdateEvent {
    let mut event = serde_json::json!({
        "id": message_id.to_string(),
        "channel_id": channel_id.to_string(),
        "guild_id": "100",
        "edited_timestamp": "2020-01-01T00:05:00.000000+00:00",
    });

    if let Some(content) = content {
        event["content"] = serde_json::Value::from(content);
    }

    serde_json::from_value(event)
        .expect("Failed to create test update event - invalid JSON structure")
}
