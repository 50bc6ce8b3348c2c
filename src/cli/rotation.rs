use crate::notify::ChannelKind;
use crate::rotation::date::DateFormat;
use crate::rotation::engine::BatchAction;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
pub struct RotationArgs {
    #[command(subcommand)]
    pub command: RotationCmd,
}

#[derive(Subcommand, Debug)]
pub enum RotationCmd {
    /// Create a new rotation key without deleting old ones (step 1 of 2).
    ///
    /// Run cleanup days later, after dependent systems have migrated.
    Create(RotationCreateArgs),

    /// Delete old rotation keys, keeping the newest ones (step 2 of 2).
    Cleanup(RotationCleanupArgs),

    /// Immediate rotation: create today's key and delete stale ones now.
    Execute(RotationExecuteArgs),

    /// List service accounts matching the rotation naming pattern.
    List(RotationListArgs),

    /// Report rotation status and recommendations for a prefix.
    Check(RotationCheckArgs),

    /// Process every rotation in a batch config file.
    Batch(RotationBatchArgs),
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum DateFormatOpt {
    #[value(name = "YY-MM")]
    ShortYearMonth,
    #[value(name = "YYYY-MM-DD")]
    FullDate,
}

impl From<DateFormatOpt> for DateFormat {
    fn from(opt: DateFormatOpt) -> Self {
        match opt {
            DateFormatOpt::ShortYearMonth => DateFormat::ShortYearMonth,
            DateFormatOpt::FullDate => DateFormat::FullDate,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum ChannelOpt {
    #[value(name = "mattermost")]
    Mattermost,
    #[value(name = "email")]
    Email,
}

impl From<ChannelOpt> for ChannelKind {
    fn from(opt: ChannelOpt) -> Self {
        match opt {
            ChannelOpt::Mattermost => ChannelKind::Mattermost,
            ChannelOpt::Email => ChannelKind::Email,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum BatchActionOpt {
    #[value(name = "create")]
    Create,
    #[value(name = "cleanup")]
    Cleanup,
}

impl From<BatchActionOpt> for BatchAction {
    fn from(opt: BatchActionOpt) -> Self {
        match opt {
            BatchActionOpt::Create => BatchAction::Create,
            BatchActionOpt::Cleanup => BatchAction::Cleanup,
        }
    }
}

#[derive(Parser, Debug)]
pub struct RotationCreateArgs {
    /// Rotation configuration file
    #[arg(long)]
    pub config_file: Option<PathBuf>,

    /// Project ID (overrides config file)
    #[arg(long)]
    pub project_id: Option<String>,

    /// Service account naming prefix (e.g. inventory-server)
    #[arg(long)]
    pub prefix: Option<String>,

    /// Date format for generated names
    #[arg(long, value_enum)]
    pub date_format: Option<DateFormatOpt>,

    /// User ID to send the new key to (from users.json)
    #[arg(long)]
    pub notify_user: Option<String>,

    /// Channel for the key notification
    #[arg(long, value_enum)]
    pub notify_channel: Option<ChannelOpt>,

    /// Show what would be done without making changes
    #[arg(long)]
    pub dry_run: bool,

    /// Skip confirmation prompts
    #[arg(long)]
    pub force: bool,
}

#[derive(Parser, Debug)]
pub struct RotationCleanupArgs {
    /// Rotation configuration file
    #[arg(long)]
    pub config_file: Option<PathBuf>,

    /// Project ID (overrides config file)
    #[arg(long)]
    pub project_id: Option<String>,

    /// Service account naming prefix
    #[arg(long)]
    pub prefix: Option<String>,

    /// Number of newest keys to keep
    #[arg(long, default_value_t = 1)]
    pub keep_latest: usize,

    /// Show what would be deleted without making changes
    #[arg(long)]
    pub dry_run: bool,

    /// Skip confirmation prompts
    #[arg(long)]
    pub force: bool,
}

#[derive(Parser, Debug)]
pub struct RotationExecuteArgs {
    /// Rotation configuration file
    #[arg(long)]
    pub config_file: Option<PathBuf>,

    /// Project ID (overrides config file)
    #[arg(long)]
    pub project_id: Option<String>,

    /// Service account naming prefix
    #[arg(long)]
    pub prefix: Option<String>,

    /// Date format for generated names
    #[arg(long, value_enum)]
    pub date_format: Option<DateFormatOpt>,

    /// User ID to send the new key to (from users.json)
    #[arg(long)]
    pub notify_user: Option<String>,

    /// Channel for the key notification
    #[arg(long, value_enum)]
    pub notify_channel: Option<ChannelOpt>,

    /// Show what would be done without making changes
    #[arg(long)]
    pub dry_run: bool,

    /// Skip confirmation prompts
    #[arg(long)]
    pub force: bool,
}

#[derive(Parser, Debug)]
pub struct RotationListArgs {
    /// Project ID
    #[arg(long)]
    pub project_id: String,

    /// Only show accounts with this naming prefix
    #[arg(long)]
    pub prefix: Option<String>,
}

#[derive(Parser, Debug)]
pub struct RotationCheckArgs {
    /// Project ID
    #[arg(long)]
    pub project_id: String,

    /// Service account naming prefix
    #[arg(long)]
    pub prefix: String,
}

#[derive(Parser, Debug)]
pub struct RotationBatchArgs {
    /// Batch rotation configuration file
    #[arg(long)]
    pub config_file: PathBuf,

    /// Action to run for every configured key
    #[arg(long, value_enum)]
    pub action: BatchActionOpt,

    /// Show what would be done without making changes
    #[arg(long)]
    pub dry_run: bool,

    /// Skip confirmation prompts
    #[arg(long)]
    pub force: bool,
}
