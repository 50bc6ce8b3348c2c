use crate::cli::{ProjectsArgs, ProjectsCmd};
use crate::client::HttpAdminClient;
use crate::date_utils::format_timestamp;
use crate::error::AppResult;
use crate::output::{confirm, emit_ok, CommandOutput, Console, OutputConfig};
use serde_json::json;

pub fn run(
    client: &HttpAdminClient,
    cfg: OutputConfig,
    console: &Console,
    args: &ProjectsArgs,
) -> AppResult<()> {
    match &args.command {
        ProjectsCmd::List(list) => {
            let projects = client.list_projects(list.include_archived, list.limit)?;
            if projects.is_empty() {
                console.line("No projects found");
                return Ok(());
            }
            let mut text = format!("Total projects: {}\n\n", projects.len());
            text.push_str(&format!(
                "{:<28} {:<32} {:<10} {}\n",
                "ID", "Name", "Status", "Created At"
            ));
            for project in &projects {
                text.push_str(&format!(
                    "{:<28} {:<32} {:<10} {}\n",
                    project.id,
                    project.name,
                    project.status.as_deref().unwrap_or("N/A"),
                    format_timestamp(project.created_at)
                ));
            }
            emit_ok(
                cfg,
                console,
                CommandOutput::new(json!(projects), text.trim_end()),
            );
            Ok(())
        }
        ProjectsCmd::Create(create) => {
            let project = client.create_project(&create.name)?;
            emit_ok(
                cfg,
                console,
                CommandOutput::new(
                    json!(project),
                    format!("[SUCCESS] Created project '{}' (ID: {})", project.name, project.id),
                ),
            );
            Ok(())
        }
        ProjectsCmd::Archive(archive) => {
            if !archive.force {
                console.line(format!(
                    "[WARNING] This will archive project {}.",
                    archive.project_id
                ));
                if !confirm(console, "Do you want to continue?")? {
                    console.line("Cancelled.");
                    return Ok(());
                }
            }
            let project = client.archive_project(&archive.project_id)?;
            emit_ok(
                cfg,
                console,
                CommandOutput::new(
                    json!(project),
                    format!("[SUCCESS] Archived project '{}'", project.name),
                ),
            );
            Ok(())
        }
    }
}
