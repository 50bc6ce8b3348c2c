use super::{ChannelKind, NotificationManager};
use crate::error::{AppError, AppResult};
use crate::output::{emit_err, Console, OutputConfig};
use std::io::Write;

/// A validated recipient/channel pair for the output-capture wrapper.
#[derive(Debug, Clone)]
pub struct NotifyTarget {
    pub user_id: String,
    pub channel: ChannelKind,
}

impl NotifyTarget {
    /// Both flags set: wrap. Both unset: passthrough (`None`). Exactly one
    /// set: usage error, reported before any command logic runs.
    pub fn from_flags(
        user_id: Option<String>,
        channel: Option<ChannelKind>,
    ) -> AppResult<Option<Self>> {
        match (user_id, channel) {
            (None, None) => Ok(None),
            (Some(user_id), Some(channel)) => Ok(Some(Self { user_id, channel })),
            _ => Err(AppError::usage(
                "--notify-user and --notify-channel must be given together",
            )),
        }
    }
}

/// Run a command with its output captured, then replay the capture to the
/// real console exactly once and make exactly one delivery attempt, tagged
/// by whether the command returned an error. Delivery problems are warnings;
/// they never change the command's own exit code. The buffer lives only for
/// this call.
pub fn run_notified(
    cfg: OutputConfig,
    manager: &NotificationManager,
    target: &NotifyTarget,
    command_label: &str,
    run: impl FnOnce(&Console) -> AppResult<()>,
) -> i32 {
    let console = Console::buffered();
    let result = run(&console);
    if let Err(err) = &result {
        emit_err(cfg, &console, err);
    }
    let captured = console.into_captured();

    let real = Console::direct();
    print!("{captured}");
    let _ = std::io::stdout().flush();

    let success = result.is_ok();
    match manager.send_command_report(
        target.channel,
        &target.user_id,
        command_label,
        &captured,
        success,
    ) {
        Ok(()) => {
            if !cfg.quiet {
                real.line(format!(
                    "[INFO] output sent to user {} via {}",
                    target.user_id,
                    target.channel.as_str()
                ));
            }
        }
        Err(err) => real.warning(format!("notification failed: {err}")),
    }

    match result {
        Ok(()) => 0,
        Err(err) => err.exit_code(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_flags_unset_is_passthrough() {
        let target = NotifyTarget::from_flags(None, None).expect("valid");
        assert!(target.is_none());
    }

    #[test]
    fn both_flags_set_builds_a_target() {
        let target = NotifyTarget::from_flags(Some("49".into()), Some(ChannelKind::Email))
            .expect("valid")
            .expect("target");
        assert_eq!(target.user_id, "49");
        assert_eq!(target.channel, ChannelKind::Email);
    }

    #[test]
    fn one_flag_alone_is_a_usage_error() {
        let err = NotifyTarget::from_flags(Some("49".into()), None).expect_err("usage");
        assert_eq!(err.code(), "USAGE_ERROR");
        let err =
            NotifyTarget::from_flags(None, Some(ChannelKind::Mattermost)).expect_err("usage");
        assert_eq!(err.code(), "USAGE_ERROR");
    }

    #[test]
    fn wrapped_error_keeps_its_exit_code_despite_delivery_failure() {
        let cfg = OutputConfig {
            mode: crate::output::OutputMode::Text,
            quiet: true,
            no_color: true,
            verbose: false,
        };
        let manager = NotificationManager::empty();
        let target = NotifyTarget {
            user_id: "49".into(),
            channel: ChannelKind::Mattermost,
        };
        let code = run_notified(cfg, &manager, &target, "rotation check", |console| {
            console.line("checking");
            Err(AppError::fetch("listing failed"))
        });
        assert_eq!(code, 3);

        let code = run_notified(cfg, &manager, &target, "rotation check", |console| {
            console.line("fine");
            Ok(())
        });
        assert_eq!(code, 0);
    }
}
