//! Discord bot integration relaying messages between wormhole channels.
//!
//! This module connects the relay engine to Discord's gateway. The event handler turns
//! message create, update and delete events into inbound relay events, keeps the emoji
//! cache fresh and drops channels from their group when Discord deletes them.
//! Administrators configure groups with the `/wormhole` application command.
//!
//! # Gateway Intents
//!
//! The bot requires the following gateway intents:
//! - `GUILDS` - Guild names for origin labels and channel deletion events
//! - `GUILD_MESSAGES` - Message create, update and delete events in guilds
//! - `MESSAGE_CONTENT` - Content of messages to relay (privileged intent)
//! - `GUILD_EMOJIS_AND_STICKERS` - Emoji changes in the emoji guild
//!
//! Note: `MESSAGE_CONTENT` is a privileged intent and must be explicitly enabled
//! in the Discord Developer Portal for the bot application.

pub mod command;
pub mod handler;
pub mod start;
