use crate::cli::{
    RotationArgs, RotationBatchArgs, RotationCheckArgs, RotationCleanupArgs, RotationCmd,
    RotationCreateArgs, RotationExecuteArgs, RotationListArgs,
};
use crate::client::{HttpAdminClient, RotationApi};
use crate::date_utils::{age_days, format_timestamp, today};
use crate::error::{AppResult, ErrorKind};
use crate::notify::{ChannelKind, NotificationManager};
use crate::output::{confirm, emit_ok, CommandOutput, Console, OutputConfig};
use crate::rotation::config::{
    default_rotation_config, load_batch_file, load_rotation_file, resolve_option, resolve_single,
    ResolvedRotation,
};
use crate::rotation::engine::{self, NotifySpec, RotationOps, RotationUnit};
use crate::rotation::resolver::resolve_candidates;
use serde_json::json;

const INDENT: &str = "   ";

/// Root-level notify flags, used as fallback when a rotation command does
/// not carry its own.
#[derive(Debug, Clone, Default)]
pub struct RootNotify {
    pub user: Option<String>,
    pub channel: Option<ChannelKind>,
}

pub fn run(
    client: &HttpAdminClient,
    cfg: OutputConfig,
    console: &Console,
    manager: &NotificationManager,
    root_notify: &RootNotify,
    args: &RotationArgs,
) -> AppResult<()> {
    match &args.command {
        RotationCmd::Create(create) => run_create(client, console, manager, root_notify, create),
        RotationCmd::Cleanup(cleanup) => run_cleanup(client, console, cleanup),
        RotationCmd::Execute(execute) => run_execute(client, console, manager, root_notify, execute),
        RotationCmd::List(list) => run_list(client, cfg, console, list),
        RotationCmd::Check(check) => run_check(client, console, check),
        RotationCmd::Batch(batch) => run_batch(client, console, manager, batch),
    }
}

fn banner(console: &Console, title: &str) {
    console.line(format!("\n{}", "=".repeat(80)));
    console.line(title);
    console.line("=".repeat(80));
}

fn resolve_create_config(
    args_config_file: Option<&std::path::Path>,
    project_id: Option<String>,
    prefix: Option<String>,
    date_format: Option<crate::rotation::date::DateFormat>,
    notify_user: Option<String>,
) -> AppResult<ResolvedRotation> {
    let file = match args_config_file {
        Some(path) => load_rotation_file(path)?,
        None => default_rotation_config()?,
    };
    resolve_single(file, project_id, prefix, date_format, notify_user)
}

fn notify_spec<'a>(
    manager: &'a NotificationManager,
    resolved_user: Option<&'a str>,
    channel: ChannelKind,
) -> Option<NotifySpec<'a>> {
    resolved_user.map(|user_id| NotifySpec {
        manager,
        user_id,
        channel,
    })
}

fn run_create(
    client: &HttpAdminClient,
    console: &Console,
    manager: &NotificationManager,
    root_notify: &RootNotify,
    args: &RotationCreateArgs,
) -> AppResult<()> {
    let resolved = resolve_create_config(
        args.config_file.as_deref(),
        args.project_id.clone(),
        args.prefix.clone(),
        args.date_format.map(Into::into),
        resolve_option(args.notify_user.clone(), root_notify.user.clone()),
    )?;
    let channel = resolve_option(args.notify_channel.map(Into::into), root_notify.channel)
        .unwrap_or(ChannelKind::Mattermost);

    banner(console, "Create New Rotation Key");
    console.line(format!("Project ID:       {}", resolved.project_id));
    console.line(format!("Naming Prefix:    {}", resolved.prefix));
    console.line(format!("Date Format:      {}", resolved.date_format.as_str()));
    console.line(format!(
        "Notify User:      {}",
        resolved.notify_user.as_deref().unwrap_or("None")
    ));
    console.line(format!("Dry Run:          {}\n", args.dry_run));

    let unit = RotationUnit {
        project_id: resolved.project_id.clone(),
        prefix: resolved.prefix.clone(),
        date_format: resolved.date_format,
    };
    let ops = RotationOps {
        api: client,
        console,
        today: today(),
        dry_run: args.dry_run,
    };
    let spec = notify_spec(manager, resolved.notify_user.as_deref(), channel);

    let outcome = match engine::create(&ops, &unit, spec.as_ref()) {
        Ok(outcome) => Some(outcome),
        // A failed create makes the remaining steps meaningless for this
        // unit; the invocation itself still completes.
        Err(err) if err.kind == ErrorKind::Mutation => {
            console.error(err.to_string());
            None
        }
        Err(err) => return Err(err),
    };

    banner(console, "Summary");
    match &outcome {
        Some(outcome) => {
            console.line(format!("Created:         {}", outcome.new_name));
            console.line(format!(
                "Active Keys:     {} (old keys still active)",
                outcome.preexisting + usize::from(outcome.created)
            ));
            console.line(format!(
                "Status:          {}",
                if args.dry_run {
                    "DRY RUN - No changes made"
                } else {
                    "SUCCESS"
                }
            ));
            console.line("\n[TIP] After updating your application, cleanup old keys with:");
            console.line(format!(
                "{INDENT}org-admin rotation cleanup --project-id {} --prefix {}",
                resolved.project_id, resolved.prefix
            ));
        }
        None => {
            console.line("Created:         nothing (create failed)");
            console.line("Status:          FAILED");
        }
    }
    console.line("=".repeat(80));
    Ok(())
}

fn run_cleanup(
    client: &HttpAdminClient,
    console: &Console,
    args: &RotationCleanupArgs,
) -> AppResult<()> {
    let file = match args.config_file.as_deref() {
        Some(path) => load_rotation_file(path)?,
        None => default_rotation_config()?,
    };
    let resolved = resolve_single(
        file,
        args.project_id.clone(),
        args.prefix.clone(),
        None,
        None,
    )?;

    banner(console, "Cleanup Old Rotation Keys");
    console.line(format!("Project ID:       {}", resolved.project_id));
    console.line(format!("Naming Prefix:    {}", resolved.prefix));
    console.line(format!("Keep Latest:      {}", args.keep_latest));
    console.line(format!("Dry Run:          {}\n", args.dry_run));

    if !args.dry_run && !args.force {
        console.line(
            "[WARNING] This will delete old service accounts and their API keys. \
             This action cannot be undone!",
        );
        if !confirm(console, "Do you want to continue?")? {
            console.line("Cancelled.");
            return Ok(());
        }
    }

    let unit = RotationUnit {
        project_id: resolved.project_id,
        prefix: resolved.prefix,
        date_format: resolved.date_format,
    };
    let ops = RotationOps {
        api: client,
        console,
        today: today(),
        dry_run: args.dry_run,
    };
    let outcome = engine::cleanup(&ops, &unit, args.keep_latest)?;

    banner(console, "Cleanup Summary");
    console.line(format!("Kept:            {} service account(s)", outcome.kept));
    console.line(format!(
        "Deleted:         {} service account(s)",
        outcome.deleted
    ));
    if outcome.failed > 0 {
        console.line(format!(
            "Failed:          {} service account(s)",
            outcome.failed
        ));
    }
    console.line(format!(
        "Status:          {}",
        if args.dry_run {
            "DRY RUN - No changes made"
        } else {
            "SUCCESS"
        }
    ));
    console.line("=".repeat(80));
    Ok(())
}

fn run_execute(
    client: &HttpAdminClient,
    console: &Console,
    manager: &NotificationManager,
    root_notify: &RootNotify,
    args: &RotationExecuteArgs,
) -> AppResult<()> {
    let resolved = resolve_create_config(
        args.config_file.as_deref(),
        args.project_id.clone(),
        args.prefix.clone(),
        args.date_format.map(Into::into),
        resolve_option(args.notify_user.clone(), root_notify.user.clone()),
    )?;
    let channel = resolve_option(args.notify_channel.map(Into::into), root_notify.channel)
        .unwrap_or(ChannelKind::Mattermost);

    banner(console, "API Key Rotation Configuration");
    console.line(format!("Project ID:       {}", resolved.project_id));
    console.line(format!("Naming Prefix:    {}", resolved.prefix));
    console.line(format!("Date Format:      {}", resolved.date_format.as_str()));
    console.line(format!(
        "Notify User:      {}",
        resolved.notify_user.as_deref().unwrap_or("None")
    ));
    console.line(format!("Dry Run:          {}\n", args.dry_run));

    if !args.dry_run && !args.force {
        console.line(
            "[WARNING] This creates a new key and immediately deletes old ones. \
             For a grace period use 'rotation create' then 'rotation cleanup'.",
        );
        if !confirm(console, "Do you want to continue?")? {
            console.line("Cancelled.");
            return Ok(());
        }
    }

    let unit = RotationUnit {
        project_id: resolved.project_id.clone(),
        prefix: resolved.prefix.clone(),
        date_format: resolved.date_format,
    };
    let ops = RotationOps {
        api: client,
        console,
        today: today(),
        dry_run: args.dry_run,
    };
    let spec = notify_spec(manager, resolved.notify_user.as_deref(), channel);

    let outcome = match engine::execute(&ops, &unit, spec.as_ref()) {
        Ok(outcome) => Some(outcome),
        Err(err) if err.kind == ErrorKind::Mutation => {
            console.error(err.to_string());
            None
        }
        Err(err) => return Err(err),
    };

    banner(console, "Rotation Summary");
    match &outcome {
        Some(outcome) => {
            console.line(format!("Created:         {}", outcome.create.new_name));
            console.line(format!(
                "Deleted:         {} service account(s)",
                outcome.deleted
            ));
            if outcome.failed > 0 {
                console.line(format!(
                    "Failed:          {} service account(s)",
                    outcome.failed
                ));
            }
            console.line(format!(
                "Status:          {}",
                if args.dry_run {
                    "DRY RUN - No changes made"
                } else if outcome.duplicate_period {
                    "COMPLETED WITH WARNINGS"
                } else {
                    "SUCCESS"
                }
            ));
        }
        None => {
            console.line("Created:         nothing (create failed)");
            console.line("Status:          FAILED");
        }
    }
    console.line("=".repeat(80));
    Ok(())
}

fn is_two_digits(part: &str) -> bool {
    part.len() == 2 && part.bytes().all(|b| b.is_ascii_digit())
}

/// Loose filter for `rotation list` without a prefix: any name whose last
/// two dash segments look like a date tail.
fn has_dated_suffix(name: &str) -> bool {
    let parts: Vec<&str> = name.split('-').collect();
    parts.len() >= 3 && is_two_digits(parts[parts.len() - 2]) && is_two_digits(parts[parts.len() - 1])
}

fn run_list(
    client: &HttpAdminClient,
    cfg: OutputConfig,
    console: &Console,
    args: &RotationListArgs,
) -> AppResult<()> {
    console.line(format!(
        "Fetching service accounts for project {}...",
        args.project_id
    ));
    let accounts = client.list_service_accounts(&args.project_id, 100)?;

    let rows: Vec<serde_json::Value> = match &args.prefix {
        Some(prefix) => resolve_candidates(&accounts, prefix)
            .into_iter()
            .map(|candidate| {
                json!({
                    "id": candidate.id,
                    "name": candidate.name,
                    "date": candidate.parsed_date.to_string(),
                    "role": candidate.role,
                    "created_at": candidate.created_at,
                })
            })
            .collect(),
        None => accounts
            .iter()
            .filter(|account| has_dated_suffix(&account.name))
            .map(|account| {
                json!({
                    "id": account.id,
                    "name": account.name,
                    "date": serde_json::Value::Null,
                    "role": account.role,
                    "created_at": account.created_at,
                })
            })
            .collect(),
    };

    if rows.is_empty() {
        console.line("\nNo service accounts found matching rotation pattern");
        return Ok(());
    }

    let mut text = format!("\nTotal matching service accounts: {}\n\n", rows.len());
    text.push_str(&format!(
        "{:<24} {:<32} {:<12} {:<10} {}\n",
        "ID", "Name", "Date", "Role", "Created At"
    ));
    for row in &rows {
        text.push_str(&format!(
            "{:<24} {:<32} {:<12} {:<10} {}\n",
            row["id"].as_str().unwrap_or("N/A"),
            row["name"].as_str().unwrap_or("N/A"),
            row["date"].as_str().unwrap_or("N/A"),
            row["role"].as_str().unwrap_or("N/A"),
            format_timestamp(row["created_at"].as_i64())
        ));
    }
    emit_ok(cfg, console, CommandOutput::new(json!(rows), text.trim_end()));
    Ok(())
}

fn run_check(
    client: &HttpAdminClient,
    console: &Console,
    args: &RotationCheckArgs,
) -> AppResult<()> {
    console.line(format!(
        "Checking rotation status for project {}...",
        args.project_id
    ));
    let accounts = client.list_service_accounts(&args.project_id, 100)?;
    let matching = resolve_candidates(&accounts, &args.prefix);
    let now = today();

    banner(console, "Rotation Status Report");
    console.line(format!("Project ID:       {}", args.project_id));
    console.line(format!("Naming Prefix:    {}", args.prefix));
    console.line(format!("Total Matching:   {}\n", matching.len()));

    if matching.is_empty() {
        console.line("[INFO] No service accounts found with rotation naming pattern");
        console.line(format!(
            "{INDENT}A new service account will be created on first rotation"
        ));
        return Ok(());
    }

    console.line("Current Service Accounts:");
    for (index, candidate) in matching.iter().enumerate() {
        let status = if index == 0 { "CURRENT" } else { "OLD" };
        console.line(format!("\n{INDENT}{}. {}", index + 1, candidate.name));
        console.line(format!("{INDENT}{INDENT}ID:         {}", candidate.id));
        console.line(format!(
            "{INDENT}{INDENT}Date:       {} (from name)",
            candidate.parsed_date
        ));
        console.line(format!(
            "{INDENT}{INDENT}Age:        {} days",
            age_days(candidate.created_at, now)
        ));
        console.line(format!("{INDENT}{INDENT}Status:     {status}"));
        console.line(format!(
            "{INDENT}{INDENT}Created:    {}",
            format_timestamp(Some(candidate.created_at))
        ));
    }

    banner(console, "Recommendations:");
    let newest_age = age_days(matching[0].created_at, now);
    if newest_age == 0 {
        console.line("+ Service account is current (created today)");
    } else if newest_age <= 7 {
        console.line(format!(
            "+ Service account is recent ({newest_age} days old)"
        ));
    } else if newest_age <= 30 {
        console.line(format!(
            "! Service account is {newest_age} days old - consider rotation"
        ));
    } else {
        console.line(format!(
            "! Service account is {newest_age} days old - rotation recommended"
        ));
    }
    if matching.len() >= 2 {
        console.line(format!(
            "! {} old service account(s) will be deleted on next rotation",
            matching.len() - 1
        ));
    }
    console.line("");
    Ok(())
}

fn run_batch(
    client: &HttpAdminClient,
    console: &Console,
    manager: &NotificationManager,
    args: &RotationBatchArgs,
) -> AppResult<()> {
    let config = load_batch_file(&args.config_file)?;
    let action: engine::BatchAction = args.action.into();

    let total_projects = config.rotations.len();
    let total_keys: usize = config.rotations.iter().map(|group| group.keys.len()).sum();

    banner(
        console,
        &format!("Batch Rotation - {}", action.as_str().to_uppercase()),
    );
    console.line(format!("Config File:      {}", args.config_file.display()));
    console.line(format!("Projects:         {total_projects}"));
    console.line(format!("Total Keys:       {total_keys}"));
    console.line(format!("Action:           {}", action.as_str()));
    console.line(format!("Dry Run:          {}", args.dry_run));

    if !args.dry_run && !args.force {
        console.line(format!(
            "\nThis will {} {} API key(s) across {} project(s).",
            action.as_str(),
            total_keys,
            total_projects
        ));
        if !confirm(console, "Do you want to continue?")? {
            console.line("Cancelled.");
            return Ok(());
        }
    }

    let ops = RotationOps {
        api: client,
        console,
        today: today(),
        dry_run: args.dry_run,
    };
    engine::batch(&ops, &config, action, manager)?;
    Ok(())
}
