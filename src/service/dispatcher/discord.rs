use std::sync::Arc;

use serenity::{
    all::{
        ChannelId, CreateAllowedMentions, CreateAttachment, CreateMessage, EditMessage,
        MessageId,
    },
    async_trait,
    http::Http,
};

use crate::{
    error::dispatch::DispatchError, model::message::OutboundMessage,
    service::dispatcher::Dispatcher,
};

/// Dispatcher posting through Discord's REST API.
///
/// Mentions in relayed content are never resolved: every call sends an empty
/// `allowed_mentions` so `@everyone` or role pings from one guild cannot ping
/// members of another.
pub struct SerenityDispatcher {
    http: Arc<Http>,
}

impl SerenityDispatcher {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Dispatcher for SerenityDispatcher {
    async fn send(
        &self,
        channel_id: ChannelId,
        message: &OutboundMessage,
    ) -> Result<MessageId, DispatchError> {
        let files = message
            .files
            .iter()
            .map(|file| CreateAttachment::bytes(file.data.to_vec(), file.filename.clone()));

        let builder = CreateMessage::new()
            .content(&message.content)
            .add_files(files)
            .sticker_ids(message.stickers.iter().copied())
            .allowed_mentions(CreateAllowedMentions::new());

        let sent = channel_id.send_message(&self.http, builder).await?;

        Ok(sent.id)
    }

    async fn edit(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        content: &str,
    ) -> Result<(), DispatchError> {
        let edit = EditMessage::new()
            .content(content)
            .allowed_mentions(CreateAllowedMentions::new());

        self.http
            .edit_message(channel_id, message_id, &edit, vec![])
            .await?;

        Ok(())
    }

    async fn delete(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> Result<(), DispatchError> {
        self.http
            .delete_message(channel_id, message_id, None)
            .await?;

        Ok(())
    }
}
