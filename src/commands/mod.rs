pub mod analytics;
pub mod completion;
pub mod keys;
pub mod notify;
pub mod projects;
pub mod rate_limits;
pub mod rotation;
pub mod service_accounts;
pub mod users;
