mod dispatch;
mod email;
mod mattermost;

pub use dispatch::{run_notified, NotifyTarget};
pub use email::EmailNotifier;
pub use mattermost::MattermostNotifier;

use crate::error::{AppError, AppResult};
use crate::users::UserDirectory;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    Mattermost,
    Email,
}

impl ChannelKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ChannelKind::Mattermost => "mattermost",
            ChannelKind::Email => "email",
        }
    }

    pub fn parse(raw: &str) -> AppResult<Self> {
        match raw {
            "mattermost" => Ok(ChannelKind::Mattermost),
            "email" => Ok(ChannelKind::Email),
            other => Err(AppError::config(format!(
                "unknown notification channel '{other}'; expected mattermost or email"
            ))),
        }
    }
}

/// All configured notification channels, built once per process from the
/// environment and the user-mapping table. Channels missing credentials are
/// simply absent; asking an absent channel to deliver is a distinct error
/// from a delivery that fails.
pub struct NotificationManager {
    users: UserDirectory,
    mattermost: Option<MattermostNotifier>,
    email: Option<EmailNotifier>,
}

impl NotificationManager {
    pub fn from_env(users: UserDirectory) -> Self {
        let mattermost = MattermostNotifier::from_env(&users);
        let email = EmailNotifier::from_env(&users);
        Self {
            users,
            mattermost,
            email,
        }
    }

    /// A manager with no channels configured.
    #[cfg(test)]
    pub fn empty() -> Self {
        Self {
            users: UserDirectory::default(),
            mattermost: None,
            email: None,
        }
    }

    pub fn users(&self) -> &UserDirectory {
        &self.users
    }

    pub fn mattermost(&self) -> Option<&MattermostNotifier> {
        self.mattermost.as_ref()
    }

    pub fn email(&self) -> Option<&EmailNotifier> {
        self.email.as_ref()
    }

    pub fn is_available(&self, channel: ChannelKind) -> bool {
        match channel {
            ChannelKind::Mattermost => self.mattermost.is_some(),
            ChannelKind::Email => self.email.is_some(),
        }
    }

    pub fn available_channels(&self) -> Vec<ChannelKind> {
        let mut channels = Vec::new();
        if self.mattermost.is_some() {
            channels.push(ChannelKind::Mattermost);
        }
        if self.email.is_some() {
            channels.push(ChannelKind::Email);
        }
        channels
    }

    /// Deliver pre-formatted text to a user over the given channel.
    pub fn send(&self, channel: ChannelKind, user_id: &str, text: &str) -> AppResult<()> {
        match channel {
            ChannelKind::Mattermost => {
                let notifier = self.require_mattermost()?;
                let destination = notifier.resolve(user_id)?;
                notifier.deliver(&destination, text)
            }
            ChannelKind::Email => {
                let notifier = self.require_email()?;
                let destination = notifier.resolve(user_id)?;
                notifier.deliver(&destination, text)
            }
        }
    }

    /// Format a captured command report in the channel's own convention and
    /// deliver it. Exactly one delivery attempt.
    pub fn send_command_report(
        &self,
        channel: ChannelKind,
        user_id: &str,
        command_label: &str,
        output: &str,
        success: bool,
    ) -> AppResult<()> {
        let text = match channel {
            ChannelKind::Mattermost => {
                self.require_mattermost()?
                    .format(command_label, output, success)
            }
            ChannelKind::Email => self.require_email()?.format(command_label, output, success),
        };
        self.send(channel, user_id, &text)
    }

    fn require_mattermost(&self) -> AppResult<&MattermostNotifier> {
        self.mattermost
            .as_ref()
            .ok_or_else(|| channel_unavailable(ChannelKind::Mattermost))
    }

    fn require_email(&self) -> AppResult<&EmailNotifier> {
        self.email
            .as_ref()
            .ok_or_else(|| channel_unavailable(ChannelKind::Email))
    }
}

fn channel_unavailable(channel: ChannelKind) -> AppError {
    AppError::notify(format!(
        "notification channel '{}' is not available or not configured",
        channel.as_str()
    ))
}

/// Message sent to the key owner when a rotation created a fresh credential.
/// The secret appears here and nowhere else after the process exits.
pub fn key_created_message(
    project_id: &str,
    account_name: &str,
    account_id: &str,
    key_value: &str,
    active_keys: usize,
) -> String {
    format!(
        "\u{1f511} **New API Key Created**\n\n\
         **Project ID:** `{project_id}`\n\
         **Service Account:** `{account_name}`\n\
         **Service Account ID:** `{account_id}`\n\n\
         **New API Key:**\n```\n{key_value}\n```\n\n\
         **Important:** save this key now; it will not be shown again.\n\
         Old and new keys are both active until cleanup runs.\n\n\
         **Current Active Keys:** {active_keys}"
    )
}

/// Message sent after an immediate rotation (create + delete in one step).
pub fn rotation_complete_message(
    project_id: &str,
    account_name: &str,
    account_id: &str,
    key_value: &str,
    deleted: usize,
) -> String {
    format!(
        "\u{1f504} **API Key Rotation Complete**\n\n\
         **Project ID:** `{project_id}`\n\
         **Service Account:** `{account_name}`\n\
         **Service Account ID:** `{account_id}`\n\n\
         **New API Key:**\n```\n{key_value}\n```\n\n\
         **Important:** save this key now; it will not be shown again.\n\n\
         **Rotation Summary:**\n\
         - Created: {account_name}\n\
         - Deleted: {deleted} old service account(s)"
    )
}
