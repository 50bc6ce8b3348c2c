use crate::cli::{ServiceAccountsArgs, ServiceAccountsCmd};
use crate::client::{DeleteOutcome, HttpAdminClient, RotationApi};
use crate::date_utils::format_timestamp;
use crate::error::AppResult;
use crate::output::{confirm, emit_ok, CommandOutput, Console, OutputConfig};
use serde_json::json;

pub fn run(
    client: &HttpAdminClient,
    cfg: OutputConfig,
    console: &Console,
    args: &ServiceAccountsArgs,
) -> AppResult<()> {
    match &args.command {
        ServiceAccountsCmd::List(list) => {
            let accounts = client.list_service_accounts(&list.project_id, list.limit)?;
            if accounts.is_empty() {
                console.line(format!(
                    "No service accounts found in project {}",
                    list.project_id
                ));
                return Ok(());
            }
            let mut text = format!(
                "Total service accounts in {}: {}\n\n",
                list.project_id,
                accounts.len()
            );
            text.push_str(&format!(
                "{:<28} {:<32} {:<10} {}\n",
                "ID", "Name", "Role", "Created At"
            ));
            for account in &accounts {
                text.push_str(&format!(
                    "{:<28} {:<32} {:<10} {}\n",
                    account.id,
                    account.name,
                    account.role.as_deref().unwrap_or("N/A"),
                    format_timestamp(Some(account.created_at))
                ));
            }
            emit_ok(
                cfg,
                console,
                CommandOutput::new(json!(accounts), text.trim_end()),
            );
            Ok(())
        }
        ServiceAccountsCmd::Get(get) => {
            let account = client.get_service_account(&get.project_id, &get.account_id)?;
            let text = format!(
                "ID:          {}\nName:        {}\nRole:        {}\nCreated At:  {}",
                account.id,
                account.name,
                account.role.as_deref().unwrap_or("N/A"),
                format_timestamp(Some(account.created_at))
            );
            emit_ok(cfg, console, CommandOutput::new(json!(account), text));
            Ok(())
        }
        ServiceAccountsCmd::Create(create) => {
            let created = client.create_service_account(&create.project_id, &create.name)?;
            let mut text = format!(
                "[SUCCESS] Created service account '{}' (ID: {})",
                created.name, created.id
            );
            match created.api_key.as_ref().and_then(|key| key.value.as_deref()) {
                Some(value) => {
                    text.push_str("\n\n[WARNING] NEW API KEY (SAVE THIS NOW!)\n");
                    text.push_str(&format!("Key Value: {value}"));
                }
                None => text.push_str("\n[WARNING] No API key returned in the create response"),
            }
            emit_ok(cfg, console, CommandOutput::new(json!(created), text));
            Ok(())
        }
        ServiceAccountsCmd::Delete(delete) => {
            if !delete.force {
                console.line(format!(
                    "[WARNING] This will delete service account {} and its API key. \
                     This action cannot be undone!",
                    delete.account_id
                ));
                if !confirm(console, "Do you want to continue?")? {
                    console.line("Cancelled.");
                    return Ok(());
                }
            }
            match client.delete_service_account(&delete.project_id, &delete.account_id)? {
                DeleteOutcome::Deleted => {
                    console.line(format!(
                        "[SUCCESS] Deleted service account {}",
                        delete.account_id
                    ));
                }
                DeleteOutcome::AlreadyAbsent => {
                    console.line(format!(
                        "[INFO] Service account {} was already absent",
                        delete.account_id
                    ));
                }
            }
            Ok(())
        }
    }
}
