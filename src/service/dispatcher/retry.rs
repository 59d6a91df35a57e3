//! Bounded exponential backoff around any dispatcher.

use std::{future::Future, time::Duration};

use serenity::{
    all::{ChannelId, MessageId},
    async_trait,
};

use crate::{
    config::Config, error::dispatch::DispatchError, model::message::OutboundMessage,
    service::dispatcher::Dispatcher,
};

/// Retry schedule for transient delivery failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    /// Total attempts including the first one. Values below 1 are treated as 1.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl BackoffPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_attempts: config.dispatch_max_attempts,
            base_delay: config.dispatch_base_delay,
            max_delay: config.dispatch_max_delay,
        }
    }

    /// Delay to wait after the given failed attempt (1-based).
    ///
    /// Doubles from `base_delay` on every attempt and never exceeds `max_delay`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        self.base_delay
            .checked_mul(1u32 << exponent)
            .map_or(self.max_delay, |delay| delay.min(self.max_delay))
    }
}

/// Dispatcher retrying `DispatchError::Transient` failures of an inner dispatcher.
///
/// Permanent failures are returned immediately. A transient failure on the last
/// attempt is reported as `DestinationUnavailable` so callers only ever see a
/// final verdict.
pub struct RetryingDispatcher<D> {
    inner: D,
    policy: BackoffPolicy,
}

impl<D: Dispatcher> RetryingDispatcher<D> {
    pub fn new(inner: D, policy: BackoffPolicy) -> Self {
        Self { inner, policy }
    }

    async fn with_retry<T, F, Fut>(
        &self,
        operation: &str,
        channel_id: ChannelId,
        mut call: F,
    ) -> Result<T, DispatchError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, DispatchError>>,
    {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match call().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt < max_attempts => {
                    let delay = self.policy.delay_for(attempt);
                    tracing::debug!(
                        "Transient {} failure in channel {} (attempt {}/{}), retrying in {:?}: {}",
                        operation,
                        channel_id,
                        attempt,
                        max_attempts,
                        delay,
                        e
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) if e.is_transient() => {
                    return Err(DispatchError::DestinationUnavailable(format!(
                        "gave up after {} attempts: {}",
                        max_attempts, e
                    )));
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait]
impl<D: Dispatcher> Dispatcher for RetryingDispatcher<D> {
    async fn send(
        &self,
        channel_id: ChannelId,
        message: &OutboundMessage,
    ) -> Result<MessageId, DispatchError> {
        self.with_retry("send", channel_id, move || {
            self.inner.send(channel_id, message)
        })
        .await
    }

    async fn edit(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        content: &str,
    ) -> Result<(), DispatchError> {
        self.with_retry("edit", channel_id, move || {
            self.inner.edit(channel_id, message_id, content)
        })
        .await
    }

    async fn delete(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> Result<(), DispatchError> {
        self.with_retry("delete", channel_id, move || {
            self.inner.delete(channel_id, message_id)
        })
        .await
    }
}
