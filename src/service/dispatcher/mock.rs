//! Recording dispatcher used by relay tests.

use std::{
    collections::HashMap,
    sync::atomic::{AtomicU64, Ordering},
};

use parking_lot::Mutex;
use serenity::{
    all::{ChannelId, MessageId, StickerId},
    async_trait,
};

use crate::{
    error::dispatch::DispatchError, model::message::OutboundMessage,
    service::dispatcher::Dispatcher,
};

/// A single call observed by the `RecordingDispatcher`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchCall {
    Send {
        channel_id: ChannelId,
        content: String,
        /// Names of the uploaded files.
        files: Vec<String>,
        stickers: Vec<StickerId>,
    },
    Edit {
        channel_id: ChannelId,
        message_id: MessageId,
        content: String,
    },
    Delete {
        channel_id: ChannelId,
        message_id: MessageId,
    },
}

impl DispatchCall {
    pub fn channel_id(&self) -> ChannelId {
        match self {
            Self::Send { channel_id, .. }
            | Self::Edit { channel_id, .. }
            | Self::Delete { channel_id, .. } => *channel_id,
        }
    }
}

struct Failure {
    error: DispatchError,
    /// Calls that still succeed before the failures start.
    passing: u32,
    /// Remaining failing calls, `None` to fail forever.
    remaining: Option<u32>,
}

/// In-memory dispatcher recording every call, including failed ones.
///
/// Sent copies get sequential message IDs starting at 10 000.
pub struct RecordingDispatcher {
    next_id: AtomicU64,
    calls: Mutex<Vec<DispatchCall>>,
    failures: Mutex<HashMap<ChannelId, Failure>>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(10_000),
            calls: Mutex::new(Vec::new()),
            failures: Mutex::new(HashMap::new()),
        }
    }

    /// Makes every call to `channel_id` fail with `error`.
    pub fn fail_channel(&self, channel_id: ChannelId, error: DispatchError) {
        self.failures.lock().insert(
            channel_id,
            Failure {
                error,
                passing: 0,
                remaining: None,
            },
        );
    }

    /// Lets the next `passing` calls to `channel_id` succeed, then fails every call.
    pub fn fail_after(&self, channel_id: ChannelId, error: DispatchError, passing: u32) {
        self.failures.lock().insert(
            channel_id,
            Failure {
                error,
                passing,
                remaining: None,
            },
        );
    }

    /// Makes the next `times` calls to `channel_id` fail with `error`.
    pub fn fail_times(&self, channel_id: ChannelId, error: DispatchError, times: u32) {
        self.failures.lock().insert(
            channel_id,
            Failure {
                error,
                passing: 0,
                remaining: Some(times),
            },
        );
    }

    pub fn calls(&self) -> Vec<DispatchCall> {
        self.calls.lock().clone()
    }

    pub fn sends(&self) -> Vec<DispatchCall> {
        self.filtered(|call| matches!(call, DispatchCall::Send { .. }))
    }

    pub fn edits(&self) -> Vec<DispatchCall> {
        self.filtered(|call| matches!(call, DispatchCall::Edit { .. }))
    }

    pub fn deletes(&self) -> Vec<DispatchCall> {
        self.filtered(|call| matches!(call, DispatchCall::Delete { .. }))
    }

    /// Contents of every send to `channel_id`, in call order.
    pub fn sent_contents(&self, channel_id: ChannelId) -> Vec<String> {
        self.sends()
            .into_iter()
            .filter_map(|call| match call {
                DispatchCall::Send {
                    channel_id: sent_to,
                    content,
                    ..
                } if sent_to == channel_id => Some(content),
                _ => None,
            })
            .collect()
    }

    pub fn send_attempts(&self, channel_id: ChannelId) -> usize {
        self.sends()
            .iter()
            .filter(|call| call.channel_id() == channel_id)
            .count()
    }

    fn filtered(&self, predicate: impl Fn(&DispatchCall) -> bool) -> Vec<DispatchCall> {
        self.calls
            .lock()
            .iter()
            .filter(|call| predicate(call))
            .cloned()
            .collect()
    }

    fn record(&self, call: DispatchCall) -> Result<(), DispatchError> {
        let channel_id = call.channel_id();
        self.calls.lock().push(call);

        let mut failures = self.failures.lock();
        let Some(failure) = failures.get_mut(&channel_id) else {
            return Ok(());
        };

        if failure.passing > 0 {
            failure.passing -= 1;
            return Ok(());
        }

        let error = failure.error.clone();
        match failure.remaining.as_mut() {
            None => Err(error),
            Some(0) => Ok(()),
            Some(remaining) => {
                *remaining -= 1;
                Err(error)
            }
        }
    }
}

#[async_trait]
impl Dispatcher for RecordingDispatcher {
    async fn send(
        &self,
        channel_id: ChannelId,
        message: &OutboundMessage,
    ) -> Result<MessageId, DispatchError> {
        self.record(DispatchCall::Send {
            channel_id,
            content: message.content.clone(),
            files: message.files.iter().map(|file| file.filename.clone()).collect(),
            stickers: message.stickers.clone(),
        })?;

        Ok(MessageId::new(self.next_id.fetch_add(1, Ordering::SeqCst)))
    }

    async fn edit(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        content: &str,
    ) -> Result<(), DispatchError> {
        self.record(DispatchCall::Edit {
            channel_id,
            message_id,
            content: content.to_string(),
        })
    }

    async fn delete(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> Result<(), DispatchError> {
        self.record(DispatchCall::Delete {
            channel_id,
            message_id,
        })
    }
}
