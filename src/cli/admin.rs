use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCmd,
}

#[derive(Subcommand, Debug)]
pub enum UsersCmd {
    /// List all users in the organization.
    List(UsersListArgs),
}

#[derive(Parser, Debug)]
pub struct UsersListArgs {
    /// Maximum number of users to return
    #[arg(long, default_value_t = 100)]
    pub limit: u32,
}

#[derive(Parser, Debug)]
pub struct ProjectsArgs {
    #[command(subcommand)]
    pub command: ProjectsCmd,
}

#[derive(Subcommand, Debug)]
pub enum ProjectsCmd {
    /// List projects in the organization.
    List(ProjectsListArgs),

    /// Create a new project.
    Create(ProjectsCreateArgs),

    /// Archive a project.
    Archive(ProjectsArchiveArgs),
}

#[derive(Parser, Debug)]
pub struct ProjectsListArgs {
    /// Include archived projects
    #[arg(long)]
    pub include_archived: bool,

    /// Maximum number of projects to return
    #[arg(long, default_value_t = 100)]
    pub limit: u32,
}

#[derive(Parser, Debug)]
pub struct ProjectsCreateArgs {
    /// Project name
    pub name: String,
}

#[derive(Parser, Debug)]
pub struct ProjectsArchiveArgs {
    /// Project ID
    pub project_id: String,

    /// Skip confirmation prompt
    #[arg(long)]
    pub force: bool,
}

#[derive(Parser, Debug)]
pub struct KeysArgs {
    #[command(subcommand)]
    pub command: KeysCmd,
}

#[derive(Subcommand, Debug)]
pub enum KeysCmd {
    /// List organization admin API keys.
    #[command(name = "list-admin")]
    ListAdmin(KeysListAdminArgs),

    /// List API keys of a project.
    #[command(name = "list-project")]
    ListProject(KeysListProjectArgs),

    /// Show one project API key.
    Get(KeysGetArgs),

    /// Delete a project API key.
    Delete(KeysDeleteArgs),
}

#[derive(Parser, Debug)]
pub struct KeysListAdminArgs {
    /// Maximum number of keys to return
    #[arg(long, default_value_t = 100)]
    pub limit: u32,
}

#[derive(Parser, Debug)]
pub struct KeysListProjectArgs {
    /// Project ID
    pub project_id: String,

    /// Maximum number of keys to return
    #[arg(long, default_value_t = 100)]
    pub limit: u32,
}

#[derive(Parser, Debug)]
pub struct KeysGetArgs {
    /// Project ID
    pub project_id: String,

    /// API key ID
    pub key_id: String,
}

#[derive(Parser, Debug)]
pub struct KeysDeleteArgs {
    /// Project ID
    pub project_id: String,

    /// API key ID
    pub key_id: String,

    /// Skip confirmation prompt
    #[arg(long)]
    pub force: bool,
}

#[derive(Parser, Debug)]
pub struct ServiceAccountsArgs {
    #[command(subcommand)]
    pub command: ServiceAccountsCmd,
}

#[derive(Subcommand, Debug)]
pub enum ServiceAccountsCmd {
    /// List service accounts of a project.
    List(ServiceAccountsListArgs),

    /// Show one service account.
    Get(ServiceAccountsGetArgs),

    /// Create a service account (returns its one-time API key).
    Create(ServiceAccountsCreateArgs),

    /// Delete a service account and its API key.
    Delete(ServiceAccountsDeleteArgs),
}

#[derive(Parser, Debug)]
pub struct ServiceAccountsListArgs {
    /// Project ID
    pub project_id: String,

    /// Maximum number of service accounts to return
    #[arg(long, default_value_t = 100)]
    pub limit: u32,
}

#[derive(Parser, Debug)]
pub struct ServiceAccountsGetArgs {
    /// Project ID
    pub project_id: String,

    /// Service account ID
    pub account_id: String,
}

#[derive(Parser, Debug)]
pub struct ServiceAccountsCreateArgs {
    /// Project ID
    pub project_id: String,

    /// Service account name
    pub name: String,
}

#[derive(Parser, Debug)]
pub struct ServiceAccountsDeleteArgs {
    /// Project ID
    pub project_id: String,

    /// Service account ID
    pub account_id: String,

    /// Skip confirmation prompt
    #[arg(long)]
    pub force: bool,
}

#[derive(Parser, Debug)]
pub struct RateLimitsArgs {
    #[command(subcommand)]
    pub command: RateLimitsCmd,
}

#[derive(Subcommand, Debug)]
pub enum RateLimitsCmd {
    /// List rate limits of a project.
    List(RateLimitsListArgs),

    /// Update one rate limit.
    Set(RateLimitsSetArgs),
}

#[derive(Parser, Debug)]
pub struct RateLimitsListArgs {
    /// Project ID
    pub project_id: String,

    /// Maximum number of rate limits to return
    #[arg(long, default_value_t = 100)]
    pub limit: u32,
}

#[derive(Parser, Debug)]
pub struct RateLimitsSetArgs {
    /// Project ID
    pub project_id: String,

    /// Rate limit ID (one per model)
    pub rate_limit_id: String,

    /// Requests per minute
    #[arg(long)]
    pub max_requests_per_minute: Option<i64>,

    /// Tokens per minute
    #[arg(long)]
    pub max_tokens_per_minute: Option<i64>,

    /// Requests per day
    #[arg(long)]
    pub max_requests_per_day: Option<i64>,
}

#[derive(Parser, Debug)]
pub struct UsageArgs {
    #[command(subcommand)]
    pub command: UsageCmd,
}

#[derive(Subcommand, Debug)]
pub enum UsageCmd {
    /// Completions usage buckets.
    Completions(UsageQueryArgs),

    /// Embeddings usage buckets.
    Embeddings(UsageQueryArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct UsageQueryArgs {
    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<String>,

    /// End date (YYYY-MM-DD), defaults to now
    #[arg(long)]
    pub end_date: Option<String>,

    /// Alternative: number of days to look back from now
    #[arg(long)]
    pub days: Option<u32>,

    /// Group results by field (repeatable)
    #[arg(long = "group-by", value_enum)]
    pub group_by: Vec<UsageGroupBy>,

    /// Filter by project ID (repeatable)
    #[arg(long = "project-id")]
    pub project_ids: Vec<String>,

    /// Filter by model (repeatable)
    #[arg(long = "model")]
    pub models: Vec<String>,

    /// Number of time buckets to return
    #[arg(long, default_value_t = 7)]
    pub limit: u32,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum UsageGroupBy {
    #[value(name = "project_id")]
    ProjectId,
    #[value(name = "user_id")]
    UserId,
    #[value(name = "api_key_id")]
    ApiKeyId,
    #[value(name = "model")]
    Model,
}

impl UsageGroupBy {
    pub fn as_str(self) -> &'static str {
        match self {
            UsageGroupBy::ProjectId => "project_id",
            UsageGroupBy::UserId => "user_id",
            UsageGroupBy::ApiKeyId => "api_key_id",
            UsageGroupBy::Model => "model",
        }
    }
}

#[derive(Parser, Debug)]
pub struct CostsArgs {
    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<String>,

    /// End date (YYYY-MM-DD), defaults to now
    #[arg(long)]
    pub end_date: Option<String>,

    /// Alternative: number of days to look back from now
    #[arg(long)]
    pub days: Option<u32>,

    /// Group results by field (repeatable)
    #[arg(long = "group-by", value_enum)]
    pub group_by: Vec<CostsGroupBy>,

    /// Filter by project ID (repeatable)
    #[arg(long = "project-id")]
    pub project_ids: Vec<String>,

    /// Number of time buckets to return
    #[arg(long, default_value_t = 7)]
    pub limit: u32,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum CostsGroupBy {
    #[value(name = "project_id")]
    ProjectId,
    #[value(name = "line_item")]
    LineItem,
}

impl CostsGroupBy {
    pub fn as_str(self) -> &'static str {
        match self {
            CostsGroupBy::ProjectId => "project_id",
            CostsGroupBy::LineItem => "line_item",
        }
    }
}

#[derive(Parser, Debug)]
pub struct AuditArgs {
    #[command(subcommand)]
    pub command: AuditCmd,
}

#[derive(Subcommand, Debug)]
pub enum AuditCmd {
    /// List audit log events, newest first.
    List(AuditListArgs),
}

#[derive(Parser, Debug)]
pub struct AuditListArgs {
    /// Maximum number of events to return (1-100)
    #[arg(long, default_value_t = 20)]
    pub limit: u32,

    /// Cursor for pagination (object ID)
    #[arg(long)]
    pub after: Option<String>,

    /// Cursor for pagination (object ID)
    #[arg(long)]
    pub before: Option<String>,

    /// Events from this date (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<String>,

    /// Events until this date (YYYY-MM-DD)
    #[arg(long)]
    pub end_date: Option<String>,

    /// Alternative: look back N days from now
    #[arg(long)]
    pub days: Option<u32>,

    /// Filter by event type, e.g. project.created (repeatable)
    #[arg(long = "event-type")]
    pub event_types: Vec<String>,

    /// Filter by project ID (repeatable)
    #[arg(long = "project-id")]
    pub project_ids: Vec<String>,

    /// Filter by actor email (repeatable)
    #[arg(long = "actor-email")]
    pub actor_emails: Vec<String>,
}
