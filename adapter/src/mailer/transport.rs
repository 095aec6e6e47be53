use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use shared::config::MailConfig;
use shared::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, mail: &RenderedMail) -> AppResult<()>;
}

/// Synchronous SMTP delivery over lettre, one connection per message.
pub struct SmtpMailTransport {
    host: String,
    port: u16,
    credentials: Option<Credentials>,
}

impl SmtpMailTransport {
    pub fn new(cfg: &MailConfig) -> Self {
        let credentials = cfg
            .username
            .clone()
            .zip(cfg.password.clone())
            .map(|(username, password)| Credentials::new(username, password));
        Self {
            host: cfg.host.clone(),
            port: cfg.port,
            credentials,
        }
    }

    fn build_transport(&self) -> AppResult<SmtpTransport> {
        let builder = match &self.credentials {
            Some(credentials) => SmtpTransport::relay(&self.host)
                .map_err(|e| AppError::MailTransportError(e.to_string()))?
                .credentials(credentials.clone()),
            // local development relays (mailhog and friends) speak
            // plaintext SMTP without authentication
            None => SmtpTransport::builder_dangerous(&self.host),
        };
        Ok(builder.port(self.port).build())
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn send(&self, mail: &RenderedMail) -> AppResult<()> {
        let message = Message::builder()
            .from(mail.from.parse().map_err(|e| {
                AppError::MailTransportError(format!("invalid sender address: {e}"))
            })?)
            .to(mail.to.parse().map_err(|e| {
                AppError::MailTransportError(format!("invalid recipient address: {e}"))
            })?)
            .subject(mail.subject.clone())
            .header(ContentType::TEXT_HTML)
            .body(mail.html_body.clone())
            .map_err(|e| AppError::MailTransportError(format!("failed to build message: {e}")))?;

        let mailer = self.build_transport()?;
        tokio::task::spawn_blocking(move || {
            mailer
                .send(&message)
                .map_err(|e| AppError::MailTransportError(e.to_string()))
        })
        .await
        .map_err(|e| AppError::MailTransportError(format!("send task failed: {e}")))?
        .map(|_| ())
    }
}
