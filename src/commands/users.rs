use crate::cli::{UsersArgs, UsersCmd};
use crate::client::HttpAdminClient;
use crate::date_utils::format_timestamp;
use crate::error::AppResult;
use crate::output::{emit_ok, CommandOutput, Console, OutputConfig};
use serde_json::json;

pub fn run(
    client: &HttpAdminClient,
    cfg: OutputConfig,
    console: &Console,
    args: &UsersArgs,
) -> AppResult<()> {
    match &args.command {
        UsersCmd::List(list) => {
            let users = client.list_users(list.limit)?;
            if users.is_empty() {
                console.line("No users found");
                return Ok(());
            }
            let mut text = format!("Total users: {}\n\n", users.len());
            text.push_str(&format!(
                "{:<28} {:<24} {:<32} {:<8} {}\n",
                "ID", "Name", "Email", "Role", "Added At"
            ));
            for user in &users {
                text.push_str(&format!(
                    "{:<28} {:<24} {:<32} {:<8} {}\n",
                    user.id,
                    user.name.as_deref().unwrap_or("N/A"),
                    user.email.as_deref().unwrap_or("N/A"),
                    user.role.as_deref().unwrap_or("N/A"),
                    format_timestamp(user.added_at)
                ));
            }
            emit_ok(cfg, console, CommandOutput::new(json!(users), text.trim_end()));
            Ok(())
        }
    }
}
