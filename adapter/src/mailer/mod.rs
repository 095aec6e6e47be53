use derive_new::new;
use kernel::model::notification::Notification;
use kernel::repository::notification::NotificationQueue;
use shared::error::AppResult;
use std::sync::Arc;
use tokio::sync::mpsc;

pub mod template;
pub mod transport;

use template::TemplateStore;
use transport::{MailTransport, RenderedMail};

/// Builds the bounded notification queue. The returned producer handle is
/// cheap to clone; the receiver belongs to the single dispatcher.
pub fn mail_channel(capacity: usize) -> (ChannelNotificationQueue, mpsc::Receiver<Notification>) {
    let (tx, rx) = mpsc::channel(capacity);
    (ChannelNotificationQueue(tx), rx)
}

#[derive(Clone)]
pub struct ChannelNotificationQueue(mpsc::Sender<Notification>);

impl NotificationQueue for ChannelNotificationQueue {
    fn enqueue(&self, notification: Notification) {
        // best effort: a full or closed queue drops the message instead
        // of blocking the request that produced it
        if let Err(err) = self.0.try_send(notification) {
            tracing::warn!(%err, "dropping outgoing notification");
        }
    }
}

/// Single consumer of the notification queue. Runs for the lifetime of
/// the process and exits once every producer is dropped and the queue is
/// drained. Failed deliveries are logged and dropped; there is no retry.
#[derive(new)]
pub struct MailDispatcher {
    rx: mpsc::Receiver<Notification>,
    transport: Arc<dyn MailTransport>,
    templates: TemplateStore,
}

impl MailDispatcher {
    pub async fn run(mut self) {
        while let Some(notification) = self.rx.recv().await {
            if let Err(err) = self.deliver(&notification).await {
                tracing::error!(to = %notification.to, %err, "mail delivery failed");
            }
        }
        tracing::info!("mail queue closed, dispatcher stopping");
    }

    async fn deliver(&self, notification: &Notification) -> AppResult<()> {
        let html_body = self.templates.render(notification)?;
        let mail = RenderedMail {
            from: notification.from.clone(),
            to: notification.to.clone(),
            subject: notification.subject.clone(),
            html_body,
        };
        self.transport.send(&mail).await?;
        tracing::info!(to = %notification.to, subject = %notification.subject, "mail sent");
        Ok(())
    }
}
