//! Propagation of deletes to relayed copies.

use futures::future::join_all;

use crate::{
    model::{
        message::InboundDelete,
        relay::{OriginKey, RelayOutcome},
    },
    service::dispatcher::Dispatcher,
};

use super::RelayService;

impl RelayService {
    /// Deletes every part of every recorded copy of a deleted message and evicts its
    /// correlation. A copy counts as failed when any of its parts could not be deleted.
    ///
    /// A delete in a wormhole channel without a correlation still leaves a tombstone,
    /// so a relay of the same message waiting for the lock is dropped instead of posting
    /// copies of a message that no longer exists.
    ///
    /// # Arguments
    /// - `dispatcher` - Dispatcher performing the deletes
    /// - `delete` - The deleted message
    ///
    /// # Returns
    /// - `RelayOutcome::NotCorrelated` - No copies are known
    /// - `RelayOutcome::Deleted` - Number of removed and failed copies
    pub async fn relay_delete(
        &self,
        dispatcher: &dyn Dispatcher,
        delete: InboundDelete,
    ) -> RelayOutcome {
        let origin = OriginKey::new(delete.channel_id, delete.message_id);
        let mut entry = self.correlations.entry(origin).await;

        let Some(relayed) = entry.evict() else {
            if self.directory.is_wormhole_channel(delete.channel_id) {
                entry.mark_deleted();
            }
            return RelayOutcome::NotCorrelated;
        };

        let results = join_all(relayed.destinations.iter().map(
            |(&channel_id, message_ids)| async move {
                let mut error = None;
                for &message_id in message_ids {
                    if let Err(e) = dispatcher.delete(channel_id, message_id).await {
                        error.get_or_insert(e);
                    }
                }
                (channel_id, error)
            },
        ))
        .await;

        let mut removed = 0;
        let mut failed = 0;
        for (channel_id, error) in results {
            match error {
                None => removed += 1,
                Some(e) => {
                    failed += 1;
                    tracing::warn!(
                        "Failed to delete copy of message {} in channel {}: {}",
                        delete.message_id,
                        channel_id,
                        e
                    );
                }
            }
        }

        RelayOutcome::Deleted { removed, failed }
    }
}
