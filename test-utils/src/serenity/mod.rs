//! Test factories for creating Serenity API objects.
//!
//! These factories create valid Serenity structs by deserializing JSON, simulating
//! what Discord's gateway would deliver.
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::serenity::{create_test_message, TestMessage};
//!
//! let message = create_test_message(TestMessage {
//!     channel_id: 10,
//!     content: "hello",
//!     ..TestMessage::default()
//! });
//! ```
//!
//! # Available Factories
//!
//! - `message::create_test_message` - Create Serenity Message objects
//! - `message::create_test_update_event` - Create Serenity MessageUpdateEvent objects
//! - `emoji::create_test_emoji` - Create Serenity Emoji objects
//! - `command::create_test_command_data` - Create Serenity CommandData objects

pub mod command;
pub mod emoji;
pub mod message;

pub use command::create_test_command_data;
pub use emoji::create_test_emoji;
pub use message::{create_test_message, create_test_update_event, TestMessage};
