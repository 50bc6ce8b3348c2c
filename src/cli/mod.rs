mod admin;
mod app;
mod notify;
mod rotation;

pub use admin::{
    AuditArgs, AuditCmd, AuditListArgs, CostsArgs, KeysArgs, KeysCmd, ProjectsArgs, ProjectsCmd,
    RateLimitsArgs, RateLimitsCmd, ServiceAccountsArgs, ServiceAccountsCmd, UsageArgs, UsageCmd,
    UsageQueryArgs, UsersArgs, UsersCmd,
};
pub use app::{App, Command, CompletionArgs, CompletionShell};
pub use notify::{NotifyArgs, NotifyCmd};
pub use rotation::{
    BatchActionOpt, ChannelOpt, DateFormatOpt, RotationArgs, RotationBatchArgs, RotationCheckArgs,
    RotationCleanupArgs, RotationCmd, RotationCreateArgs, RotationExecuteArgs, RotationListArgs,
};
