use crate::cli::{KeysArgs, KeysCmd};
use crate::client::{DeleteOutcome, HttpAdminClient};
use crate::date_utils::{format_redacted_value, format_timestamp};
use crate::error::AppResult;
use crate::output::{confirm, emit_ok, CommandOutput, Console, OutputConfig};
use serde_json::json;

pub fn run(
    client: &HttpAdminClient,
    cfg: OutputConfig,
    console: &Console,
    args: &KeysArgs,
) -> AppResult<()> {
    match &args.command {
        KeysCmd::ListAdmin(list) => {
            let keys = client.list_admin_keys(list.limit)?;
            if keys.is_empty() {
                console.line("No admin keys found");
                return Ok(());
            }
            let mut text = format!("Total admin keys: {}\n\n", keys.len());
            text.push_str(&format!(
                "{:<28} {:<24} {:<20} {:<20} {}\n",
                "ID", "Name", "Value", "Created At", "Last Used"
            ));
            for key in &keys {
                text.push_str(&format!(
                    "{:<28} {:<24} {:<20} {:<20} {}\n",
                    key.id,
                    key.name.as_deref().unwrap_or("N/A"),
                    format_redacted_value(key.redacted_value.as_deref()),
                    format_timestamp(key.created_at),
                    format_timestamp(key.last_used_at)
                ));
            }
            emit_ok(cfg, console, CommandOutput::new(json!(keys), text.trim_end()));
            Ok(())
        }
        KeysCmd::ListProject(list) => {
            let keys = client.list_project_api_keys(&list.project_id, list.limit)?;
            if keys.is_empty() {
                console.line(format!("No API keys found in project {}", list.project_id));
                return Ok(());
            }
            let mut text = format!(
                "Total API keys in {}: {}\n\n",
                list.project_id,
                keys.len()
            );
            text.push_str(&format!(
                "{:<28} {:<24} {:<20} {:<20} {}\n",
                "ID", "Name", "Value", "Created At", "Last Used"
            ));
            for key in &keys {
                text.push_str(&format!(
                    "{:<28} {:<24} {:<20} {:<20} {}\n",
                    key.id,
                    key.name.as_deref().unwrap_or("N/A"),
                    format_redacted_value(key.redacted_value.as_deref()),
                    format_timestamp(key.created_at),
                    format_timestamp(key.last_used_at)
                ));
            }
            emit_ok(cfg, console, CommandOutput::new(json!(keys), text.trim_end()));
            Ok(())
        }
        KeysCmd::Get(get) => {
            let key = client.get_project_api_key(&get.project_id, &get.key_id)?;
            let text = format!(
                "ID:          {}\nName:        {}\nValue:       {}\nCreated At:  {}\nLast Used:   {}",
                key.id,
                key.name.as_deref().unwrap_or("N/A"),
                format_redacted_value(key.redacted_value.as_deref()),
                format_timestamp(key.created_at),
                format_timestamp(key.last_used_at)
            );
            emit_ok(cfg, console, CommandOutput::new(json!(key), text));
            Ok(())
        }
        KeysCmd::Delete(delete) => {
            if !delete.force {
                console.line(format!(
                    "[WARNING] This will delete API key {} from project {}. \
                     This action cannot be undone!",
                    delete.key_id, delete.project_id
                ));
                if !confirm(console, "Do you want to continue?")? {
                    console.line("Cancelled.");
                    return Ok(());
                }
            }
            match client.delete_project_api_key(&delete.project_id, &delete.key_id)? {
                DeleteOutcome::Deleted => {
                    console.line(format!("[SUCCESS] Deleted API key {}", delete.key_id));
                }
                DeleteOutcome::AlreadyAbsent => {
                    console.line(format!(
                        "[INFO] API key {} was already absent",
                        delete.key_id
                    ));
                }
            }
            Ok(())
        }
    }
}
