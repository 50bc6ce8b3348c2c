mod cli;
mod client;
mod commands;
mod date_utils;
mod error;
mod notify;
mod output;
mod rotation;
mod users;

use clap::Parser;
use cli::{App, Command};
use client::HttpAdminClient;
use commands::rotation::RootNotify;
use error::AppResult;
use notify::{NotificationManager, NotifyTarget};
use output::{emit_err, Console, OutputConfig, OutputMode};
use users::UserDirectory;

fn build_output_config(app: &App) -> OutputConfig {
    OutputConfig {
        mode: if app.json {
            OutputMode::Json
        } else {
            OutputMode::Text
        },
        quiet: app.quiet,
        no_color: app.no_color,
        verbose: app.verbose,
    }
}

fn command_label(command: &Command) -> String {
    let group = match command {
        Command::Users(_) => "users",
        Command::Projects(_) => "projects",
        Command::Keys(_) => "keys",
        Command::ServiceAccounts(_) => "service-accounts",
        Command::RateLimits(_) => "rate-limits",
        Command::Usage(_) => "usage",
        Command::Costs(_) => "costs",
        Command::Audit(_) => "audit",
        Command::Rotation(_) => "rotation",
        Command::Notify(_) => "notify",
        Command::Completion(_) => "completion",
    };
    format!("org-admin {group}")
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let app = App::parse();
    let output_cfg = build_output_config(&app);
    std::process::exit(run(app, output_cfg));
}

fn run(app: App, cfg: OutputConfig) -> i32 {
    // One manager per process: channel credentials are validated here, not
    // at first use. A broken users.json downgrades to an empty table.
    let users = match UserDirectory::load_default() {
        Ok(users) => users,
        Err(err) => {
            eprintln!("[WARNING] {err}");
            UserDirectory::default()
        }
    };
    let manager = NotificationManager::from_env(users);

    let target = match NotifyTarget::from_flags(
        app.notify_user.clone(),
        app.notify_channel.map(Into::into),
    ) {
        Ok(target) => target,
        Err(err) => {
            emit_err(cfg, &Console::direct(), &err);
            return err.exit_code();
        }
    };

    match target {
        Some(target) => {
            let label = command_label(&app.command);
            notify::run_notified(cfg, &manager, &target, &label, |console| {
                dispatch(&app, cfg, console, &manager)
            })
        }
        None => {
            let console = Console::direct();
            match dispatch(&app, cfg, &console, &manager) {
                Ok(()) => 0,
                Err(err) => {
                    emit_err(cfg, &console, &err);
                    err.exit_code()
                }
            }
        }
    }
}

fn dispatch(
    app: &App,
    cfg: OutputConfig,
    console: &Console,
    manager: &NotificationManager,
) -> AppResult<()> {
    match &app.command {
        Command::Completion(args) => {
            commands::completion::run(args);
            Ok(())
        }
        Command::Notify(args) => commands::notify::run(manager, console, args),
        Command::Users(args) => {
            let client = HttpAdminClient::from_env(app.admin_key.clone(), app.api_url.clone())?;
            commands::users::run(&client, cfg, console, args)
        }
        Command::Projects(args) => {
            let client = HttpAdminClient::from_env(app.admin_key.clone(), app.api_url.clone())?;
            commands::projects::run(&client, cfg, console, args)
        }
        Command::Keys(args) => {
            let client = HttpAdminClient::from_env(app.admin_key.clone(), app.api_url.clone())?;
            commands::keys::run(&client, cfg, console, args)
        }
        Command::ServiceAccounts(args) => {
            let client = HttpAdminClient::from_env(app.admin_key.clone(), app.api_url.clone())?;
            commands::service_accounts::run(&client, cfg, console, args)
        }
        Command::RateLimits(args) => {
            let client = HttpAdminClient::from_env(app.admin_key.clone(), app.api_url.clone())?;
            commands::rate_limits::run(&client, cfg, console, args)
        }
        Command::Usage(args) => {
            let client = HttpAdminClient::from_env(app.admin_key.clone(), app.api_url.clone())?;
            commands::analytics::run_usage(&client, cfg, console, args)
        }
        Command::Costs(args) => {
            let client = HttpAdminClient::from_env(app.admin_key.clone(), app.api_url.clone())?;
            commands::analytics::run_costs(&client, cfg, console, args)
        }
        Command::Audit(args) => {
            let client = HttpAdminClient::from_env(app.admin_key.clone(), app.api_url.clone())?;
            commands::analytics::run_audit(&client, cfg, console, args)
        }
        Command::Rotation(args) => {
            let client = HttpAdminClient::from_env(app.admin_key.clone(), app.api_url.clone())?;
            let root_notify = RootNotify {
                user: app.notify_user.clone(),
                channel: app.notify_channel.map(Into::into),
            };
            commands::rotation::run(&client, cfg, console, manager, &root_notify, args)
        }
    }
}
