use anyhow::Result;
use std::env;

#[derive(Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub mail: MailConfig,
}

impl AppConfig {
    pub fn new() -> Result<Self> {
        let database = DatabaseConfig {
            host: var_or("DATABASE_HOST", "localhost"),
            port: var_or("DATABASE_PORT", "5432").parse()?,
            username: var_or("DATABASE_USERNAME", "app"),
            password: var_or("DATABASE_PASSWORD", "passwd"),
            database: var_or("DATABASE_NAME", "app"),
        };
        let mail = MailConfig {
            host: var_or("MAIL_HOST", "localhost"),
            port: var_or("MAIL_PORT", "1025").parse()?,
            username: env::var("MAIL_USERNAME").ok(),
            password: env::var("MAIL_PASSWORD").ok(),
            from: var_or("MAIL_FROM", "reception@bookings.example.com"),
            template_dir: var_or("MAIL_TEMPLATE_DIR", "email-templates"),
            queue_capacity: var_or("MAIL_QUEUE_CAPACITY", "64").parse()?,
        };
        Ok(Self { database, mail })
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.into())
}

#[derive(Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
}

#[derive(Clone)]
pub struct MailConfig {
    pub host: String,
    pub port: u16,
    /// Relay credentials; local development relays run without them.
    pub username: Option<String>,
    pub password: Option<String>,
    pub from: String,
    pub template_dir: String,
    pub queue_capacity: usize,
}
