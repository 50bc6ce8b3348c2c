use crate::error::{AppError, AppResult};
use crate::users::UserDirectory;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// Chat delivery through a Mattermost bot. Available only when the bot
/// token, bot id and base URL are all present in the environment.
pub struct MattermostNotifier {
    agent: ureq::Agent,
    pub base_url: String,
    bot_token: String,
    pub bot_id: String,
    users: UserDirectory,
}

impl MattermostNotifier {
    pub fn from_env(users: &UserDirectory) -> Option<Self> {
        let bot_token = non_empty_env("MATTERMOST_BOT_TOKEN")?;
        let bot_id = non_empty_env("MATTERMOST_BOT_ID")?;
        let base_url = non_empty_env("MATTERMOST_BASE_URL")?;
        Some(Self {
            agent: ureq::AgentBuilder::new()
                .timeout(Duration::from_secs(15))
                .build(),
            base_url: base_url.trim_end_matches('/').to_string(),
            bot_token,
            bot_id,
            users: users.clone(),
        })
    }

    /// Map a numeric user id to the direct-message channel recorded for it.
    pub fn resolve(&self, user_id: &str) -> AppResult<String> {
        let entry = self.users.get(user_id).ok_or_else(|| {
            AppError::notify(format!("user id {user_id} not found in user mappings"))
        })?;
        entry.mattermost_channel_id.clone().ok_or_else(|| {
            AppError::notify(format!("no Mattermost channel id mapped for user {user_id}"))
        })
    }

    pub fn deliver(&self, channel_id: &str, text: &str) -> AppResult<()> {
        let url = format!("{}/posts", self.base_url);
        debug!(%url, channel_id, "sending chat notification");
        self.agent
            .post(&url)
            .set("Authorization", &format!("Bearer {}", self.bot_token))
            .send_json(json!({
                "channel_id": channel_id,
                "message": text,
            }))
            .map_err(|err| match err {
                ureq::Error::Status(code, response) => {
                    let body = response.into_string().unwrap_or_default();
                    AppError::notify(format!(
                        "chat delivery failed with HTTP {code}: {}",
                        body.trim()
                    ))
                }
                ureq::Error::Transport(transport) => {
                    AppError::notify(format!("chat delivery failed: {transport}"))
                }
            })?;
        Ok(())
    }

    /// Chat formatting: status emoji, inline emphasis, fenced output block.
    pub fn format(&self, command_label: &str, output: &str, success: bool) -> String {
        format_message(command_label, output, success)
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}

pub(super) fn format_message(command_label: &str, output: &str, success: bool) -> String {
    let (emoji, status) = if success {
        ("\u{2705}", "Success")
    } else {
        ("\u{274c}", "Failed")
    };
    format!(
        "{emoji} **org-admin - {status}**\n\n\
         **Command:** `{command_label}`\n\n\
         **Output:**\n```\n{output}\n```"
    )
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
