use super::rotation::ChannelOpt;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
pub struct NotifyArgs {
    #[command(subcommand)]
    pub command: NotifyCmd,
}

#[derive(Subcommand, Debug)]
pub enum NotifyCmd {
    /// Send a test notification to a mapped user.
    Test(NotifyTestArgs),

    /// List users available for notifications.
    #[command(name = "list-users")]
    ListUsers(NotifyListUsersArgs),

    /// Show notification system status.
    Status,
}

#[derive(Parser, Debug)]
pub struct NotifyTestArgs {
    /// User ID from the mapping table
    pub user_id: String,

    /// Notification channel
    #[arg(long, value_enum, default_value = "mattermost")]
    pub channel: ChannelOpt,

    /// Custom test message
    #[arg(long, default_value = "Test notification from org-admin")]
    pub message: String,
}

#[derive(Parser, Debug)]
pub struct NotifyListUsersArgs {
    /// Restrict to one channel (shows all available when omitted)
    #[arg(long, value_enum)]
    pub channel: Option<ChannelOpt>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{App, Command};
    use clap::Parser;

    #[test]
    fn parse_notify_test_defaults() {
        let app = App::try_parse_from(["org-admin", "notify", "test", "49"])
            .expect("parse notify test");
        let Command::Notify(args) = app.command else {
            panic!("expected notify command");
        };
        let NotifyCmd::Test(test) = args.command else {
            panic!("expected test subcommand");
        };
        assert_eq!(test.user_id, "49");
        assert!(matches!(test.channel, ChannelOpt::Mattermost));
        assert!(test.message.contains("org-admin"));
    }

    #[test]
    fn parse_notify_status() {
        let app = App::try_parse_from(["org-admin", "notify", "status"])
            .expect("parse notify status");
        let Command::Notify(args) = app.command else {
            panic!("expected notify command");
        };
        assert!(matches!(args.command, NotifyCmd::Status));
    }
}
