use anyhow::Result;
use kernel::model::notification::Notification;
use shared::error::{AppError, AppResult};
use std::{collections::HashMap, fs, path::Path};

/// The single substitution marker a shell may contain.
pub const BODY_MARKER: &str = "[%body%]";

/// Named HTML shells loaded once at startup. A notification that names a
/// template gets its content spliced into the shell at the body marker.
#[derive(Clone, Default)]
pub struct TemplateStore {
    shells: HashMap<String, String>,
}

impl TemplateStore {
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let mut shells = HashMap::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.extension().is_some_and(|ext| ext == "html") {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            shells.insert(name.to_string(), fs::read_to_string(&path)?);
        }
        Ok(Self { shells })
    }

    pub fn with_shell(mut self, name: &str, shell: &str) -> Self {
        self.shells.insert(name.into(), shell.into());
        self
    }

    pub fn render(&self, notification: &Notification) -> AppResult<String> {
        match &notification.template {
            None => Ok(notification.content.clone()),
            Some(name) => {
                let shell = self.shells.get(name).ok_or_else(|| {
                    AppError::MailTransportError(format!("unknown mail template: {name}"))
                })?;
                Ok(shell.replacen(BODY_MARKER, &notification.content, 1))
            }
        }
    }
}
