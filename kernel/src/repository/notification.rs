use crate::model::notification::Notification;

/// Producer side of the outgoing-mail queue. Enqueueing is fire-and-forget;
/// it must never block or fail the request that produced the message.
pub trait NotificationQueue: Send + Sync {
    fn enqueue(&self, notification: Notification);
}
