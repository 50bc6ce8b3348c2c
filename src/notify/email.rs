use crate::error::{AppError, AppResult};
use crate::users::UserDirectory;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::debug;

const DIVIDER: &str = "----------------------------------------";

/// SMTP delivery. Available only when MAIL_HOST, MAIL_USERNAME and
/// MAIL_PASSWORD are present; the transport is built once at construction.
pub struct EmailNotifier {
    transport: SmtpTransport,
    pub host: String,
    pub port: u16,
    pub from_email: String,
    pub from_name: String,
    users: UserDirectory,
}

impl EmailNotifier {
    pub fn from_env(users: &UserDirectory) -> Option<Self> {
        let host = non_empty_env("MAIL_HOST")?;
        let username = non_empty_env("MAIL_USERNAME")?;
        let password = non_empty_env("MAIL_PASSWORD")?;
        let port = non_empty_env("MAIL_PORT")
            .and_then(|raw| raw.parse::<u16>().ok())
            .unwrap_or(587);
        let from_email = non_empty_env("MAIL_FROM_EMAIL").unwrap_or_else(|| username.clone());
        let from_name = non_empty_env("MAIL_FROM_NAME").unwrap_or_else(|| "org-admin".to_string());

        let transport = SmtpTransport::starttls_relay(&host)
            .ok()?
            .port(port)
            .credentials(Credentials::new(username, password))
            .build();

        Some(Self {
            transport,
            host,
            port,
            from_email,
            from_name,
            users: users.clone(),
        })
    }

    /// Map a numeric user id to the email address recorded for it.
    pub fn resolve(&self, user_id: &str) -> AppResult<String> {
        let entry = self.users.get(user_id).ok_or_else(|| {
            AppError::notify(format!("user id {user_id} not found in user mappings"))
        })?;
        entry
            .email
            .clone()
            .ok_or_else(|| AppError::notify(format!("no email address mapped for user {user_id}")))
    }

    pub fn deliver(&self, address: &str, text: &str) -> AppResult<()> {
        debug!(address, "sending email notification");
        let from: Mailbox = format!("{} <{}>", self.from_name, self.from_email)
            .parse()
            .map_err(|e| AppError::notify(format!("invalid sender address: {e}")))?;
        let to: Mailbox = address
            .parse()
            .map_err(|e| AppError::notify(format!("invalid recipient address {address}: {e}")))?;
        let subject = text.lines().next().unwrap_or("org-admin notification");
        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .body(text.to_string())
            .map_err(|e| AppError::notify(format!("failed to build email: {e}")))?;
        self.transport
            .send(&message)
            .map_err(|e| AppError::notify(format!("email delivery failed: {e}")))?;
        Ok(())
    }

    /// Email formatting: plain status line and a divider around the output.
    pub fn format(&self, command_label: &str, output: &str, success: bool) -> String {
        format_message(command_label, output, success)
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}

pub(super) fn format_message(command_label: &str, output: &str, success: bool) -> String {
    let status = if success { "Success" } else { "Failed" };
    format!(
        "org-admin - {status}\n\
         Command: {command_label}\n\
         {DIVIDER}\n\
         {output}\n\
         {DIVIDER}"
    )
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
