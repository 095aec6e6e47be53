use derive_new::new;

/// An outgoing mail message. `template` names an HTML shell that the
/// dispatcher wraps around `content`; without it the content is sent as-is.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Notification {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub content: String,
    pub template: Option<String>,
}
