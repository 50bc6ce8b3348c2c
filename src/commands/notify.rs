use crate::cli::{NotifyArgs, NotifyCmd};
use crate::error::AppResult;
use crate::notify::{ChannelKind, NotificationManager};
use crate::output::Console;

pub fn run(manager: &NotificationManager, console: &Console, args: &NotifyArgs) -> AppResult<()> {
    match &args.command {
        NotifyCmd::Test(test) => {
            let channel: ChannelKind = test.channel.into();
            if !manager.is_available(channel) {
                console.error(format!(
                    "notification channel '{}' is not available or not configured",
                    channel.as_str()
                ));
                let available: Vec<&str> = manager
                    .available_channels()
                    .iter()
                    .map(|c| c.as_str())
                    .collect();
                console.line(format!(
                    "Available channels: {}",
                    if available.is_empty() {
                        "none".to_string()
                    } else {
                        available.join(", ")
                    }
                ));
                return Ok(());
            }

            console.line(format!(
                "[INFO] Sending test notification to user {} via {}...",
                test.user_id,
                channel.as_str()
            ));
            if let Some(entry) = manager.users().get(&test.user_id) {
                console.line(format!(
                    "[INFO] User: {} ({})",
                    entry.name.as_deref().unwrap_or("N/A"),
                    entry.email.as_deref().unwrap_or("N/A")
                ));
            }
            match manager.send(channel, &test.user_id, &test.message) {
                Ok(()) => console.line("[SUCCESS] Test notification sent successfully!"),
                Err(err) => console.error(format!("failed to send test notification: {err}")),
            }
            Ok(())
        }
        NotifyCmd::ListUsers(list) => {
            let channels: Vec<ChannelKind> = match list.channel {
                Some(channel) => vec![channel.into()],
                None => manager.available_channels(),
            };
            if channels.is_empty() {
                console.error("no notification channels are available or configured");
                return Ok(());
            }
            for channel in channels {
                if !manager.is_available(channel) {
                    console.warning(format!(
                        "channel '{}' is not available or not configured",
                        channel.as_str()
                    ));
                    continue;
                }
                let users = manager.users();
                if users.is_empty() {
                    console.line(format!(
                        "[INFO] No users configured for {} notifications",
                        channel.as_str()
                    ));
                    continue;
                }
                console.line(format!(
                    "\n[INFO] Available users for {} notifications:\n",
                    channel.as_str()
                ));
                for (user_id, entry) in users.sorted() {
                    console.line(format!("  User ID: {user_id}"));
                    console.line(format!(
                        "    Name:  {}",
                        entry.name.as_deref().unwrap_or("N/A")
                    ));
                    console.line(format!(
                        "    Email: {}",
                        entry.email.as_deref().unwrap_or("N/A")
                    ));
                    if channel == ChannelKind::Mattermost {
                        console.line(format!(
                            "    MM User ID: {}",
                            entry.mattermost_user_id.as_deref().unwrap_or("N/A")
                        ));
                        console.line(format!(
                            "    MM Channel ID: {}",
                            entry.mattermost_channel_id.as_deref().unwrap_or("N/A")
                        ));
                    }
                    console.line("");
                }
                console.line(format!(
                    "Total: {} users configured for {}",
                    users.len(),
                    channel.as_str()
                ));
            }
            Ok(())
        }
        NotifyCmd::Status => {
            let available = manager.available_channels();
            console.line("\n[INFO] Notification System Status\n");
            if available.is_empty() {
                console.warning("no notification channels configured");
                console.line("\nTo configure Mattermost notifications:");
                console.line("  1. Set MATTERMOST_BOT_TOKEN");
                console.line("  2. Set MATTERMOST_BOT_ID");
                console.line("  3. Set MATTERMOST_BASE_URL");
                console.line("  4. Configure user mappings in users.json");
                console.line("\nTo configure Email notifications:");
                console.line("  1. Set MAIL_HOST");
                console.line("  2. Set MAIL_USERNAME");
                console.line("  3. Set MAIL_PASSWORD");
                console.line("  4. Set MAIL_PORT (optional, default: 587)");
                console.line("  5. Configure user mappings in users.json");
                return Ok(());
            }
            let names: Vec<&str> = available.iter().map(|c| c.as_str()).collect();
            console.line(format!("Available channels: {}", names.join(", ")));
            if let Some(mattermost) = manager.mattermost() {
                console.line("\nMATTERMOST Configuration:");
                console.line(format!("  Base URL: {}", mattermost.base_url));
                console.line(format!("  Bot ID: {}", mattermost.bot_id));
                console.line(format!("  Configured users: {}", mattermost.user_count()));
            }
            if let Some(email) = manager.email() {
                console.line("\nEMAIL Configuration:");
                console.line(format!("  Host: {}", email.host));
                console.line(format!("  Port: {}", email.port));
                console.line(format!(
                    "  From: {} <{}>",
                    email.from_name, email.from_email
                ));
                console.line(format!("  Configured users: {}", email.user_count()));
            }
            console.line("\n[SUCCESS] Notification system is ready");
            Ok(())
        }
    }
}
