use futures::{stream::SelectAll, StreamExt};
use tokio::sync::mpsc::{error::TrySendError, Receiver, Sender};
use tokio_stream::wrappers::ReceiverStream;

use crate::{
    AgentReply, AgentRequest, Notification, NotificationContent, Response, Success, ToolCall,
    ToolResult,
};

#[allow(async_fn_in_trait)]
pub trait NotificationHandler {
    fn get_outgoing_channel(&self) -> &Option<Sender<Notification>>;
    fn get_channel_name(&self) -> &String;

    /// Send a notification with the given content.
    ///
    /// Never waits for channel capacity: when the receiver is not keeping
    /// up the notification is dropped. Returns `true` if it was queued.
    async fn notify(&self, content: NotificationContent) -> bool {
        let Some(notification_channel) = self.get_outgoing_channel() else {
            return false;
        };

        match notification_channel.try_send(Notification::new(
            self.get_channel_name().clone(),
            content,
        )) {
            Ok(()) => true,
            Err(TrySendError::Full(dropped)) => {
                tracing::warn!(agent = %dropped.agent, "notification channel full, dropping notification");
                false
            }
            Err(TrySendError::Closed(_)) => {
                tracing::error!("Failed sending notification: channel closed");
                false
            }
        }
    }

    /// Forward notifications from an external receiver into this
    /// handler's output channel.
    fn forward_notifications(&self, mut from_channel: Receiver<Notification>) {
        if let Some(notification_channel) = &self.get_outgoing_channel() {
            let to_sender = notification_channel.clone();
            tokio::spawn(async move {
                while let Some(msg) = from_channel.recv().await {
                    if to_sender.send(msg).await.is_err() {
                        break;
                    }
                }
            });
        }
    }

    /// Merge any number of `Receiver<Notification>` streams into one,
    /// and forward all messages into this handler's output channel.
    fn forward_multiple_notifications<I>(&self, channels: I)
    where
        I: IntoIterator<Item = Receiver<Notification>>,
    {
        let to_sender = match &self.get_outgoing_channel() {
            Some(s) => s.clone(),
            None => return,
        };

        let mut merged = SelectAll::new();
        for rx in channels {
            merged.push(ReceiverStream::new(rx));
        }

        tokio::spawn(async move {
            while let Some(notification) = merged.next().await {
                if to_sender.send(notification).await.is_err() {
                    break;
                }
            }
        });
    }

    async fn notify_done(&self, success: Success, resp: Response) -> bool {
        self.notify(NotificationContent::Done(success, resp)).await
    }
    async fn notify_conversation_request(&self, req: AgentRequest) -> bool {
        self.notify(NotificationContent::ConversationRequest(req)).await
    }
    async fn notify_conversation_success(&self, reply: AgentReply) -> bool {
        self.notify(NotificationContent::ConversationSuccess(reply)).await
    }
    async fn notify_conversation_error(&self, error_message: String) -> bool {
        self.notify(NotificationContent::ConversationError(error_message))
            .await
    }
    async fn notify_tool_request(&self, tool_call: ToolCall) -> bool {
        self.notify(NotificationContent::ToolCallRequest(tool_call)).await
    }
    async fn notify_tool_success(&self, tool_result: ToolResult) -> bool {
        self.notify(NotificationContent::ToolCallSuccess(tool_result)).await
    }
    async fn notify_tool_error(&self, error_message: String) -> bool {
        self.notify(NotificationContent::ToolCallError(error_message)).await
    }
}
