use adapter::database::connect_database_with;
use adapter::mailer::{
    mail_channel, template::TemplateStore, transport::SmtpMailTransport, MailDispatcher,
};
use anyhow::{Context, Result};
use registry::AppRegistry;
use shared::config::AppConfig;
use shared::env::{which, Environment};
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    init_logger()?;
    bootstrap().await
}

fn init_logger() -> Result<()> {
    let log_level = match which() {
        Environment::Development => "debug",
        Environment::Production => "info",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| log_level.into());

    let subscriber = tracing_subscriber::fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_target(false);

    tracing_subscriber::registry()
        .with(subscriber)
        .with(env_filter)
        .try_init()?;

    Ok(())
}

async fn bootstrap() -> Result<()> {
    let app_config = AppConfig::new()?;
    let pool = connect_database_with(&app_config.database);

    let templates = TemplateStore::load(&app_config.mail.template_dir)
        .context("failed to load the mail templates")?;
    let transport = Arc::new(SmtpMailTransport::new(&app_config.mail));
    let (queue, rx) = mail_channel(app_config.mail.queue_capacity);
    let dispatcher = MailDispatcher::new(rx, transport, templates);
    let dispatcher_handle = tokio::spawn(dispatcher.run());
    tracing::info!("mail dispatcher started");

    let registry = AppRegistry::new(pool, Arc::new(queue), app_config);
    tracing::info!("booking core is up");

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for the shutdown signal")?;
    tracing::info!("shutdown requested, draining the mail queue");

    // dropping the registry drops the last queue producer; the dispatcher
    // exits once the remaining messages have been delivered
    drop(registry);
    dispatcher_handle
        .await
        .context("mail dispatcher terminated abnormally")?;

    Ok(())
}
