use super::admin::{
    AuditArgs, CostsArgs, KeysArgs, ProjectsArgs, RateLimitsArgs, ServiceAccountsArgs, UsageArgs,
    UsersArgs,
};
use super::notify::NotifyArgs;
use super::rotation::{ChannelOpt, RotationArgs};
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "org-admin")]
#[command(about = "Organization administration CLI", long_about = None)]
#[command(version)]
pub struct App {
    /// Output machine-readable JSON
    #[arg(long)]
    pub json: bool,

    /// Disable ANSI color output
    #[arg(long)]
    pub no_color: bool,

    /// Suppress non-essential output
    #[arg(long)]
    pub quiet: bool,

    /// Verbose diagnostics (no secrets)
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Admin API key (overrides ORG_ADMIN_KEY)
    #[arg(long)]
    pub admin_key: Option<String>,

    /// Base URL of the organization API (overrides ORG_ADMIN_API_URL)
    #[arg(long)]
    pub api_url: Option<String>,

    /// Capture this command's output and send it to a mapped user
    #[arg(long)]
    pub notify_user: Option<String>,

    /// Channel for --notify-user
    #[arg(long, value_enum)]
    pub notify_channel: Option<ChannelOpt>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List organization members.
    Users(UsersArgs),

    /// Manage projects.
    Projects(ProjectsArgs),

    /// Inspect and revoke API keys.
    Keys(KeysArgs),

    /// Manage project service accounts.
    #[command(name = "service-accounts")]
    ServiceAccounts(ServiceAccountsArgs),

    /// Inspect and adjust project rate limits.
    #[command(name = "rate-limits")]
    RateLimits(RateLimitsArgs),

    /// Usage analytics per endpoint.
    Usage(UsageArgs),

    /// Cost analytics.
    Costs(CostsArgs),

    /// Audit log queries.
    Audit(AuditArgs),

    /// Scheduled API-key rotation.
    Rotation(RotationArgs),

    /// Manage and test notification channels.
    Notify(NotifyArgs),

    /// Generate shell completion scripts.
    Completion(CompletionArgs),
}

#[derive(Parser, Debug)]
pub struct CompletionArgs {
    /// Shell type
    #[arg(value_enum)]
    pub shell: CompletionShell,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum CompletionShell {
    #[value(name = "bash")]
    Bash,
    #[value(name = "zsh")]
    Zsh,
    #[value(name = "fish")]
    Fish,
    #[value(name = "powershell")]
    Powershell,
    #[value(name = "elvish")]
    Elvish,
    #[value(name = "nushell")]
    Nushell,
}
