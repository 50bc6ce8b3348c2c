use super::config::{parse_config_format, BatchConfig};
use super::date::{current_period, expected_name, DateFormat};
use super::resolver::{resolve_candidates, RotationCandidate};
use crate::client::{DeleteOutcome, RotationApi};
use crate::date_utils::{age_days, format_timestamp};
use crate::error::{AppError, AppResult};
use crate::notify::{self, ChannelKind, NotificationManager};
use crate::output::Console;
use time::Date;

const LIST_LIMIT: u32 = 100;
const INDENT: &str = "   ";

/// Placeholders for identifiers that only exist after a real create call.
pub const DRY_RUN_KEY_PLACEHOLDER: &str = "key-available-after-real-run";
pub const DRY_RUN_ACCOUNT_PLACEHOLDER: &str = "sa_pending";

/// One (project, prefix) pair being rotated in a single invocation.
#[derive(Debug, Clone)]
pub struct RotationUnit {
    pub project_id: String,
    pub prefix: String,
    pub date_format: DateFormat,
}

/// Everything a rotation step needs: the REST capability, the output sink,
/// the clock and the dry-run switch. The engine never reads the real clock
/// or constructs its own transport.
pub struct RotationOps<'a> {
    pub api: &'a dyn RotationApi,
    pub console: &'a Console,
    pub today: Date,
    pub dry_run: bool,
}

/// Where to send the freshly created credential, when configured.
pub struct NotifySpec<'a> {
    pub manager: &'a NotificationManager,
    pub user_id: &'a str,
    pub channel: ChannelKind,
}

#[derive(Debug, Clone)]
pub struct CreateOutcome {
    pub new_name: String,
    /// False when the name already existed and creation was skipped.
    pub created: bool,
    pub account_id: Option<String>,
    pub key_value: Option<String>,
    pub preexisting: usize,
}

#[derive(Debug, Clone, Default)]
pub struct CleanupOutcome {
    pub matched: usize,
    pub kept: usize,
    pub deleted: usize,
    pub failed: usize,
}

#[derive(Debug, Clone)]
pub struct ExecuteOutcome {
    pub create: CreateOutcome,
    pub deleted: usize,
    pub failed: usize,
    /// Set when several matches shared today's period and the delete phase
    /// refused to guess.
    pub duplicate_period: bool,
}

fn fetch_candidates(ops: &RotationOps, unit: &RotationUnit) -> AppResult<Vec<RotationCandidate>> {
    ops.console.line("[STEP 1] Fetching existing service accounts...");
    let accounts = ops
        .api
        .list_service_accounts(&unit.project_id, LIST_LIMIT)
        .map_err(|err| AppError::fetch(format!("failed to fetch service accounts: {err}")))?;
    let matching = resolve_candidates(&accounts, &unit.prefix);
    ops.console
        .line(format!("{INDENT}Total service accounts: {}", accounts.len()));
    ops.console.line(format!(
        "{INDENT}Matching pattern '{}-<date>': {}",
        unit.prefix,
        matching.len()
    ));
    Ok(matching)
}

fn list_candidates(console: &Console, header: &str, candidates: &[RotationCandidate]) {
    if candidates.is_empty() {
        return;
    }
    console.line(format!("\n{INDENT}{header}"));
    for candidate in candidates {
        console.line(format!(
            "{INDENT}{INDENT}- {} (ID: {}, Date: {})",
            candidate.name, candidate.id, candidate.parsed_date
        ));
    }
}

/// Step 1 of the two-step rotation: create today's key, never delete. A
/// name collision with the current period is an idempotent no-op.
pub fn create(
    ops: &RotationOps,
    unit: &RotationUnit,
    notify: Option<&NotifySpec>,
) -> AppResult<CreateOutcome> {
    let matching = fetch_candidates(ops, unit)?;
    list_candidates(
        ops.console,
        "Existing service accounts (will remain active):",
        &matching,
    );

    let outcome = create_current(ops, unit, &matching)?;

    ops.console.line("");
    send_key_notification(
        ops,
        notify,
        &outcome,
        notify::key_created_message(
            &unit.project_id,
            &outcome.new_name,
            outcome.account_id.as_deref().unwrap_or(DRY_RUN_ACCOUNT_PLACEHOLDER),
            outcome.key_value.as_deref().unwrap_or(DRY_RUN_KEY_PLACEHOLDER),
            outcome.preexisting + usize::from(outcome.created),
        ),
        "[STEP 3]",
    );

    Ok(outcome)
}

/// The shared create-or-skip logic behind Create and Execute.
fn create_current(
    ops: &RotationOps,
    unit: &RotationUnit,
    matching: &[RotationCandidate],
) -> AppResult<CreateOutcome> {
    let new_name = expected_name(&unit.prefix, unit.date_format, ops.today);
    let mut outcome = CreateOutcome {
        new_name: new_name.clone(),
        created: false,
        account_id: None,
        key_value: None,
        preexisting: matching.len(),
    };

    if matching.iter().any(|c| c.name == new_name) {
        ops.console.line(format!(
            "\n[STEP 2] Service account '{new_name}' already exists - skipping creation"
        ));
        return Ok(outcome);
    }

    ops.console
        .line(format!("\n[STEP 2] Creating new service account: {new_name}"));

    if ops.dry_run {
        ops.console.line(format!(
            "{INDENT}[DRY RUN] Would create service account '{new_name}'"
        ));
        outcome.created = true;
        outcome.account_id = Some(DRY_RUN_ACCOUNT_PLACEHOLDER.to_string());
        outcome.key_value = Some(DRY_RUN_KEY_PLACEHOLDER.to_string());
        return Ok(outcome);
    }

    let created = ops
        .api
        .create_service_account(&unit.project_id, &new_name)
        .map_err(|err| {
            AppError::mutation(format!("failed to create service account: {err}"))
        })?;
    ops.console
        .line(format!("{INDENT}[SUCCESS] Created service account '{new_name}'"));
    ops.console
        .line(format!("{INDENT}Service Account ID: {}", created.id));

    outcome.created = true;
    let key_id = created.api_key.as_ref().and_then(|key| key.id.clone());
    let key_value = created.api_key.as_ref().and_then(|key| key.value.clone());
    match key_value {
        Some(key_value) => {
            if let Some(key_id) = key_id {
                ops.console.line(format!("{INDENT}API Key ID: {key_id}"));
            }
            ops.console.line(format!("\n{INDENT}{}", "=".repeat(70)));
            ops.console
                .line(format!("{INDENT}[WARNING] NEW API KEY (SAVE THIS NOW!)"));
            ops.console.line(format!("{INDENT}{}", "=".repeat(70)));
            ops.console.line(format!("{INDENT}Key Value: {key_value}"));
            ops.console.line(format!("{INDENT}{}\n", "=".repeat(70)));
            outcome.key_value = Some(key_value);
        }
        None => {
            ops.console
                .warning("no API key returned in the create response");
        }
    }
    outcome.account_id = Some(created.id);
    Ok(outcome)
}

fn send_key_notification(
    ops: &RotationOps,
    notify: Option<&NotifySpec>,
    outcome: &CreateOutcome,
    message: String,
    step_label: &str,
) {
    match notify {
        Some(spec) if outcome.key_value.is_some() => {
            ops.console.line(format!(
                "{step_label} Sending notification to user {}...",
                spec.user_id
            ));
            if ops.dry_run {
                ops.console.line(format!(
                    "{INDENT}[DRY RUN] Would send notification via {}",
                    spec.channel.as_str()
                ));
                return;
            }
            match spec.manager.send(spec.channel, spec.user_id, &message) {
                Ok(()) => ops.console.line(format!(
                    "{INDENT}[SUCCESS] Notification sent via {}",
                    spec.channel.as_str()
                )),
                Err(err) => {
                    ops.console.error(format!("failed to send notification: {err}"));
                    ops.console
                        .warning("key created but notification failed");
                }
            }
        }
        Some(_) => ops
            .console
            .line(format!("{step_label} Skipping notification (no API key to send)")),
        None => ops
            .console
            .line(format!("{step_label} No notification configured")),
    }
}

/// Step 2 of the two-step rotation: delete everything but the newest
/// `keep_latest` matches. Each delete is independent; a failure never stops
/// the rest.
pub fn cleanup(
    ops: &RotationOps,
    unit: &RotationUnit,
    keep_latest: usize,
) -> AppResult<CleanupOutcome> {
    let matching = fetch_candidates(ops, unit)?;
    let mut outcome = CleanupOutcome {
        matched: matching.len(),
        ..CleanupOutcome::default()
    };

    if matching.is_empty() {
        ops.console.line(format!(
            "\n[INFO] No service accounts found matching pattern '{}-<date>'",
            unit.prefix
        ));
        return Ok(outcome);
    }

    if matching.len() <= keep_latest {
        ops.console.line(format!(
            "\n[INFO] Only {} key(s) found. Nothing to cleanup.",
            matching.len()
        ));
        ops.console.line(format!(
            "{INDENT}All keys are being kept (keep-latest={keep_latest})"
        ));
        outcome.kept = matching.len();
        return Ok(outcome);
    }

    let (keep, delete) = matching.split_at(keep_latest);
    outcome.kept = keep.len();

    ops.console
        .line(format!("\n{INDENT}Keys to KEEP ({}):", keep.len()));
    for candidate in keep {
        ops.console.line(format!(
            "{INDENT}{INDENT}+ {} (Age: {} days, Created: {})",
            candidate.name,
            age_days(candidate.created_at, ops.today),
            format_timestamp(Some(candidate.created_at))
        ));
    }
    ops.console
        .line(format!("\n{INDENT}Keys to DELETE ({}):", delete.len()));
    for candidate in delete {
        ops.console.line(format!(
            "{INDENT}{INDENT}x {} (Age: {} days, Created: {})",
            candidate.name,
            age_days(candidate.created_at, ops.today),
            format_timestamp(Some(candidate.created_at))
        ));
    }

    ops.console.line(format!(
        "\n[STEP 2] Deleting {} old service account(s)...",
        delete.len()
    ));
    let (deleted, failed) = delete_candidates(ops, unit, delete);
    outcome.deleted = deleted;
    outcome.failed = failed;
    Ok(outcome)
}

fn delete_candidates(
    ops: &RotationOps,
    unit: &RotationUnit,
    targets: &[RotationCandidate],
) -> (usize, usize) {
    let mut deleted = 0;
    let mut failed = 0;
    for candidate in targets {
        ops.console.line(format!(
            "{INDENT}Deleting '{}' (ID: {})...",
            candidate.name, candidate.id
        ));
        if ops.dry_run {
            ops.console
                .line(format!("{INDENT}{INDENT}[DRY RUN] Would delete service account"));
            deleted += 1;
            continue;
        }
        match ops.api.delete_service_account(&unit.project_id, &candidate.id) {
            Ok(DeleteOutcome::Deleted) => {
                ops.console
                    .line(format!("{INDENT}{INDENT}[SUCCESS] Deleted successfully"));
                deleted += 1;
            }
            Ok(DeleteOutcome::AlreadyAbsent) => {
                ops.console.line(format!(
                    "{INDENT}{INDENT}[INFO] Already absent; nothing to delete"
                ));
                deleted += 1;
            }
            Err(err) => {
                ops.console.error(format!("failed to delete: {err}"));
                failed += 1;
            }
        }
    }
    (deleted, failed)
}

/// Immediate rotation: create today's key and revoke stale ones in the same
/// invocation. The two-step create/cleanup flow is the safer default; this
/// accepts a zero-length dual-key window instead of a migration window.
pub fn execute(
    ops: &RotationOps,
    unit: &RotationUnit,
    notify: Option<&NotifySpec>,
) -> AppResult<ExecuteOutcome> {
    let matching = fetch_candidates(ops, unit)?;
    list_candidates(ops.console, "Existing service accounts:", &matching);

    let create_outcome = create_current(ops, unit, &matching)?;

    let current = current_period(unit.date_format, ops.today);
    let duplicates_today = matching
        .iter()
        .filter(|c| c.parsed_date == current)
        .count();

    let mut outcome = ExecuteOutcome {
        create: create_outcome,
        deleted: 0,
        failed: 0,
        duplicate_period: false,
    };

    let to_delete: Vec<RotationCandidate> = if duplicates_today >= 2 {
        outcome.duplicate_period = true;
        ops.console.error(format!(
            "{} service accounts share the current period date {}; refusing to pick one to keep",
            duplicates_today, current
        ));
        ops.console
            .line(format!("{INDENT}Resolve the duplicate names, then re-run"));
        Vec::new()
    } else if matching.len() >= 2 {
        matching[1..].to_vec()
    } else if matching.len() == 1 {
        let only = &matching[0];
        if only.name != outcome.create.new_name && only.parsed_date < ops.today {
            vec![only.clone()]
        } else {
            Vec::new()
        }
    } else {
        Vec::new()
    };

    if to_delete.is_empty() {
        if !outcome.duplicate_period {
            ops.console
                .line("\n[STEP 3] No old service accounts to delete");
        }
    } else {
        ops.console.line(format!(
            "\n[STEP 3] Deleting {} old service account(s)...",
            to_delete.len()
        ));
        let (deleted, failed) = delete_candidates(ops, unit, &to_delete);
        outcome.deleted = deleted;
        outcome.failed = failed;
    }

    ops.console.line("");
    let message = notify::rotation_complete_message(
        &unit.project_id,
        &outcome.create.new_name,
        outcome
            .create
            .account_id
            .as_deref()
            .unwrap_or(DRY_RUN_ACCOUNT_PLACEHOLDER),
        outcome
            .create
            .key_value
            .as_deref()
            .unwrap_or(DRY_RUN_KEY_PLACEHOLDER),
        outcome.deleted,
    );
    send_key_notification(ops, notify, &outcome.create, message, "[STEP 4]");

    Ok(outcome)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchAction {
    Create,
    Cleanup,
}

impl BatchAction {
    pub fn as_str(self) -> &'static str {
        match self {
            BatchAction::Create => "create",
            BatchAction::Cleanup => "cleanup",
        }
    }
}

#[derive(Debug, Default)]
pub struct BatchTally {
    pub success: Vec<String>,
    pub failed: Vec<String>,
    pub skipped: Vec<String>,
}

/// Run Create or Cleanup over every key of every configured group. Each key
/// is processed independently and in sequence; one key's failure is recorded
/// under its identity and the batch moves on.
pub fn batch(
    ops: &RotationOps,
    config: &BatchConfig,
    action: BatchAction,
    manager: &NotificationManager,
) -> AppResult<BatchTally> {
    if config.rotations.is_empty() {
        return Err(AppError::config(
            "no rotations found in config file (expected { \"rotations\": [...] })",
        ));
    }

    let total = config.rotations.len();
    let mut tally = BatchTally::default();

    for (index, group) in config.rotations.iter().enumerate() {
        let position = index + 1;
        let project_name = group.project_name.as_deref().unwrap_or("Unknown");

        let Some(project_id) = group.project_id.as_deref() else {
            ops.console.line(format!(
                "\n[{position}/{total}] {project_name}: [ERROR] Missing project_id"
            ));
            tally.failed.push(format!("{project_name}: Missing project_id"));
            continue;
        };
        if group.keys.is_empty() {
            ops.console.line(format!(
                "\n[{position}/{total}] {project_name}: [SKIP] No keys configured"
            ));
            tally.skipped.push(format!("{project_name}: No keys"));
            continue;
        }

        ops.console.line(format!("\n{}", "=".repeat(80)));
        ops.console
            .line(format!("[{position}/{total}] Processing: {project_name}"));
        ops.console.line("=".repeat(80));
        ops.console.line(format!("Project ID:   {project_id}"));
        ops.console.line(format!("Keys:         {}", group.keys.len()));

        for (key_index, key) in group.keys.iter().enumerate() {
            let key_position = key_index + 1;
            let Some(key_name) = key.name.as_deref() else {
                ops.console.line(format!(
                    "  [{key_position}/{}] [ERROR] Missing key name",
                    group.keys.len()
                ));
                tally
                    .failed
                    .push(format!("{project_name} / Key {key_position}: Missing name"));
                continue;
            };

            ops.console
                .line(format!("  [{key_position}/{}] {key_name}", group.keys.len()));

            match run_batch_key(ops, project_id, key_name, key, action, manager) {
                Ok(()) => {
                    let verb = match action {
                        BatchAction::Create => "Created",
                        BatchAction::Cleanup => "Cleaned up",
                    };
                    tally.success.push(format!("{project_name} / {key_name}: {verb}"));
                }
                Err(err) => {
                    ops.console.error(err.to_string());
                    tally
                        .failed
                        .push(format!("{project_name} / {key_name}: {err}"));
                }
            }
        }
    }

    ops.console.line(format!("\n{}", "=".repeat(80)));
    ops.console.line("Batch Rotation Summary");
    ops.console.line("=".repeat(80));
    ops.console
        .line(format!("Successful:   {}", tally.success.len()));
    ops.console.line(format!("Failed:       {}", tally.failed.len()));
    ops.console
        .line(format!("Skipped:      {}", tally.skipped.len()));
    ops.console.line(format!(
        "Status:       {}",
        if ops.dry_run {
            "DRY RUN - No changes made"
        } else {
            "COMPLETE"
        }
    ));

    if !tally.failed.is_empty() {
        ops.console.line("\nFailed Operations:");
        for failure in &tally.failed {
            ops.console.line(format!("  x {failure}"));
        }
    }
    if !tally.skipped.is_empty() {
        ops.console.line("\nSkipped:");
        for skipped in &tally.skipped {
            ops.console.line(format!("  - {skipped}"));
        }
    }

    Ok(tally)
}

fn run_batch_key(
    ops: &RotationOps,
    project_id: &str,
    key_name: &str,
    key: &super::config::KeySpec,
    action: BatchAction,
    manager: &NotificationManager,
) -> AppResult<()> {
    let date_format = match key.date_format.as_deref() {
        Some(raw) => parse_config_format(raw)?,
        None => DateFormat::ShortYearMonth,
    };
    let unit = RotationUnit {
        project_id: project_id.to_string(),
        prefix: key_name.to_string(),
        date_format,
    };
    match action {
        BatchAction::Create => {
            let channel = match key.notify_channel.as_deref() {
                Some(raw) => ChannelKind::parse(raw)?,
                None => ChannelKind::Mattermost,
            };
            let spec = key.notify_user.as_deref().map(|user_id| NotifySpec {
                manager,
                user_id,
                channel,
            });
            create(ops, &unit, spec.as_ref())?;
        }
        BatchAction::Cleanup => {
            cleanup(ops, &unit, 1)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{CreatedApiKey, CreatedServiceAccount, ServiceAccount};
    use crate::rotation::config::{KeySpec, RotationGroup};
    use std::cell::RefCell;
    use time::macros::date;

    struct MockApi {
        accounts: Vec<ServiceAccount>,
        created: RefCell<Vec<String>>,
        deleted: RefCell<Vec<String>>,
        fail_list_for: Option<String>,
        fail_create: bool,
        fail_delete_ids: Vec<String>,
        absent_delete_ids: Vec<String>,
    }

    impl MockApi {
        fn with_accounts(accounts: Vec<ServiceAccount>) -> Self {
            Self {
                accounts,
                created: RefCell::new(Vec::new()),
                deleted: RefCell::new(Vec::new()),
                fail_list_for: None,
                fail_create: false,
                fail_delete_ids: Vec::new(),
                absent_delete_ids: Vec::new(),
            }
        }
    }

    impl RotationApi for MockApi {
        fn list_service_accounts(
            &self,
            project_id: &str,
            _limit: u32,
        ) -> crate::error::AppResult<Vec<ServiceAccount>> {
            if self.fail_list_for.as_deref() == Some(project_id) {
                return Err(AppError::fetch("listing exploded"));
            }
            Ok(self.accounts.clone())
        }

        fn create_service_account(
            &self,
            _project_id: &str,
            name: &str,
        ) -> crate::error::AppResult<CreatedServiceAccount> {
            if self.fail_create {
                return Err(AppError::mutation("create exploded"));
            }
            self.created.borrow_mut().push(name.to_string());
            Ok(CreatedServiceAccount {
                id: format!("sa_new_{}", self.created.borrow().len()),
                name: name.to_string(),
                role: Some("member".to_string()),
                created_at: Some(1_700_000_000),
                api_key: Some(CreatedApiKey {
                    id: Some("key_new".to_string()),
                    value: Some("sk-fresh-secret".to_string()),
                }),
            })
        }

        fn delete_service_account(
            &self,
            _project_id: &str,
            account_id: &str,
        ) -> crate::error::AppResult<DeleteOutcome> {
            if self.fail_delete_ids.iter().any(|id| id == account_id) {
                return Err(AppError::mutation(format!("cannot delete {account_id}")));
            }
            if self.absent_delete_ids.iter().any(|id| id == account_id) {
                return Ok(DeleteOutcome::AlreadyAbsent);
            }
            self.deleted.borrow_mut().push(account_id.to_string());
            Ok(DeleteOutcome::Deleted)
        }
    }

    fn account(id: &str, name: &str) -> ServiceAccount {
        ServiceAccount {
            id: id.to_string(),
            name: name.to_string(),
            role: Some("member".to_string()),
            created_at: 1_690_000_000,
        }
    }

    fn unit(format: DateFormat) -> RotationUnit {
        RotationUnit {
            project_id: "proj_1".to_string(),
            prefix: "svc".to_string(),
            date_format: format,
        }
    }

    const TODAY: Date = date!(2024 - 11 - 13);

    fn ops<'a>(api: &'a MockApi, console: &'a Console) -> RotationOps<'a> {
        RotationOps {
            api,
            console,
            today: TODAY,
            dry_run: false,
        }
    }

    #[test]
    fn create_skips_when_current_name_exists() {
        let api = MockApi::with_accounts(vec![account("sa_1", "svc-24-11")]);
        let console = Console::buffered();
        let outcome = create(&ops(&api, &console), &unit(DateFormat::ShortYearMonth), None)
            .expect("create");
        assert!(!outcome.created);
        assert_eq!(outcome.new_name, "svc-24-11");
        assert!(api.created.borrow().is_empty());
        assert!(console.into_captured().contains("already exists - skipping creation"));
    }

    #[test]
    fn create_creates_and_surfaces_the_secret() {
        let api = MockApi::with_accounts(vec![account("sa_1", "svc-24-10")]);
        let console = Console::buffered();
        let outcome = create(&ops(&api, &console), &unit(DateFormat::ShortYearMonth), None)
            .expect("create");
        assert!(outcome.created);
        assert_eq!(outcome.key_value.as_deref(), Some("sk-fresh-secret"));
        assert_eq!(api.created.borrow().as_slice(), ["svc-24-11"]);
        assert!(api.deleted.borrow().is_empty());
        let captured = console.into_captured();
        assert!(captured.contains("SAVE THIS NOW"));
        assert!(captured.contains("sk-fresh-secret"));
    }

    #[test]
    fn create_never_deletes() {
        let api = MockApi::with_accounts(vec![
            account("sa_1", "svc-24-01"),
            account("sa_2", "svc-24-02"),
            account("sa_3", "svc-24-03"),
        ]);
        let console = Console::buffered();
        create(&ops(&api, &console), &unit(DateFormat::ShortYearMonth), None).expect("create");
        assert!(api.deleted.borrow().is_empty());
    }

    #[test]
    fn create_dry_run_touches_nothing() {
        let api = MockApi::with_accounts(vec![]);
        let console = Console::buffered();
        let mut run_ops = ops(&api, &console);
        run_ops.dry_run = true;
        let outcome =
            create(&run_ops, &unit(DateFormat::ShortYearMonth), None).expect("create");
        assert!(outcome.created);
        assert_eq!(outcome.key_value.as_deref(), Some(DRY_RUN_KEY_PLACEHOLDER));
        assert!(api.created.borrow().is_empty());
        assert!(console.into_captured().contains("[DRY RUN] Would create"));
    }

    #[test]
    fn create_failure_is_a_mutation_error() {
        let mut api = MockApi::with_accounts(vec![]);
        api.fail_create = true;
        let console = Console::buffered();
        let err = create(&ops(&api, &console), &unit(DateFormat::ShortYearMonth), None)
            .expect_err("create fails");
        assert_eq!(err.code(), "MUTATION_ERROR");
    }

    #[test]
    fn fetch_failure_is_fatal_to_the_unit() {
        let mut api = MockApi::with_accounts(vec![]);
        api.fail_list_for = Some("proj_1".to_string());
        let console = Console::buffered();
        let err = cleanup(&ops(&api, &console), &unit(DateFormat::ShortYearMonth), 1)
            .expect_err("fetch fails");
        assert_eq!(err.code(), "FETCH_ERROR");
    }

    #[test]
    fn cleanup_deletes_exactly_the_oldest_beyond_keep() {
        let api = MockApi::with_accounts(vec![
            account("sa_jun", "svc-24-06"),
            account("sa_nov", "svc-24-11"),
            account("sa_jan", "svc-24-01"),
            account("sa_sep", "svc-24-09"),
        ]);
        let console = Console::buffered();
        let outcome = cleanup(&ops(&api, &console), &unit(DateFormat::ShortYearMonth), 1)
            .expect("cleanup");
        assert_eq!(outcome.matched, 4);
        assert_eq!(outcome.kept, 1);
        assert_eq!(outcome.deleted, 3);
        assert_eq!(outcome.failed, 0);
        // Newest (November) survives; the rest go, newest-first ordering.
        assert_eq!(api.deleted.borrow().as_slice(), ["sa_sep", "sa_jun", "sa_jan"]);
    }

    #[test]
    fn cleanup_with_keep_two_keeps_two() {
        let api = MockApi::with_accounts(vec![
            account("sa_1", "svc-24-09"),
            account("sa_2", "svc-24-10"),
            account("sa_3", "svc-24-11"),
        ]);
        let console = Console::buffered();
        let outcome = cleanup(&ops(&api, &console), &unit(DateFormat::ShortYearMonth), 2)
            .expect("cleanup");
        assert_eq!(outcome.kept, 2);
        assert_eq!(outcome.deleted, 1);
        assert_eq!(api.deleted.borrow().as_slice(), ["sa_1"]);
    }

    #[test]
    fn cleanup_noop_when_matches_fit_keep() {
        let api = MockApi::with_accounts(vec![account("sa_1", "svc-24-11")]);
        let console = Console::buffered();
        let outcome = cleanup(&ops(&api, &console), &unit(DateFormat::ShortYearMonth), 1)
            .expect("cleanup");
        assert_eq!(outcome.deleted, 0);
        assert!(api.deleted.borrow().is_empty());
        assert!(console.into_captured().contains("Nothing to cleanup"));
    }

    #[test]
    fn cleanup_continues_past_a_failed_delete() {
        let mut api = MockApi::with_accounts(vec![
            account("sa_keep", "svc-24-11"),
            account("sa_bad", "svc-24-10"),
            account("sa_ok", "svc-24-09"),
        ]);
        api.fail_delete_ids = vec!["sa_bad".to_string()];
        let console = Console::buffered();
        let outcome = cleanup(&ops(&api, &console), &unit(DateFormat::ShortYearMonth), 1)
            .expect("cleanup");
        assert_eq!(outcome.deleted, 1);
        assert_eq!(outcome.failed, 1);
        assert_eq!(api.deleted.borrow().as_slice(), ["sa_ok"]);
        assert!(console.into_captured().contains("cannot delete sa_bad"));
    }

    #[test]
    fn cleanup_treats_not_found_as_success() {
        let mut api = MockApi::with_accounts(vec![
            account("sa_keep", "svc-24-11"),
            account("sa_gone", "svc-24-10"),
        ]);
        api.absent_delete_ids = vec!["sa_gone".to_string()];
        let console = Console::buffered();
        let outcome = cleanup(&ops(&api, &console), &unit(DateFormat::ShortYearMonth), 1)
            .expect("cleanup");
        assert_eq!(outcome.deleted, 1);
        assert_eq!(outcome.failed, 0);
    }

    #[test]
    fn cleanup_dry_run_issues_no_deletes() {
        let api = MockApi::with_accounts(vec![
            account("sa_1", "svc-24-11"),
            account("sa_2", "svc-24-10"),
        ]);
        let console = Console::buffered();
        let mut run_ops = ops(&api, &console);
        run_ops.dry_run = true;
        let outcome =
            cleanup(&run_ops, &unit(DateFormat::ShortYearMonth), 1).expect("cleanup");
        assert_eq!(outcome.deleted, 1);
        assert!(api.deleted.borrow().is_empty());
    }

    #[test]
    fn execute_on_empty_creates_one_deletes_zero() {
        let api = MockApi::with_accounts(vec![]);
        let console = Console::buffered();
        let outcome = execute(&ops(&api, &console), &unit(DateFormat::ShortYearMonth), None)
            .expect("execute");
        assert!(outcome.create.created);
        assert_eq!(outcome.deleted, 0);
        assert_eq!(api.created.borrow().len(), 1);
        assert!(api.deleted.borrow().is_empty());
    }

    #[test]
    fn execute_replaces_a_single_stale_match() {
        let api = MockApi::with_accounts(vec![account("sa_old", "svc-24-06")]);
        let console = Console::buffered();
        let outcome = execute(&ops(&api, &console), &unit(DateFormat::ShortYearMonth), None)
            .expect("execute");
        assert!(outcome.create.created);
        assert_eq!(outcome.deleted, 1);
        assert_eq!(api.deleted.borrow().as_slice(), ["sa_old"]);
    }

    #[test]
    fn execute_keeps_a_single_current_match_untouched() {
        let api = MockApi::with_accounts(vec![account("sa_now", "svc-24-11")]);
        let console = Console::buffered();
        let outcome = execute(&ops(&api, &console), &unit(DateFormat::ShortYearMonth), None)
            .expect("execute");
        assert!(!outcome.create.created);
        assert_eq!(outcome.deleted, 0);
        assert!(api.created.borrow().is_empty());
        assert!(api.deleted.borrow().is_empty());
    }

    #[test]
    fn execute_with_many_matches_keeps_only_the_newest() {
        let api = MockApi::with_accounts(vec![
            account("sa_sep", "svc-24-09"),
            account("sa_oct", "svc-24-10"),
            account("sa_jun", "svc-24-06"),
        ]);
        let console = Console::buffered();
        let outcome = execute(&ops(&api, &console), &unit(DateFormat::ShortYearMonth), None)
            .expect("execute");
        assert!(outcome.create.created);
        assert_eq!(outcome.deleted, 2);
        assert_eq!(api.deleted.borrow().as_slice(), ["sa_sep", "sa_jun"]);
    }

    #[test]
    fn execute_refuses_to_choose_between_duplicate_current_names() {
        let api = MockApi::with_accounts(vec![
            account("sa_a", "svc-24-11"),
            account("sa_b", "svc-2024-11-01"),
        ]);
        let console = Console::buffered();
        let outcome = execute(&ops(&api, &console), &unit(DateFormat::ShortYearMonth), None)
            .expect("execute");
        assert!(outcome.duplicate_period);
        assert_eq!(outcome.deleted, 0);
        assert!(api.deleted.borrow().is_empty());
        assert!(console
            .into_captured()
            .contains("share the current period date"));
    }

    #[test]
    fn execute_dry_run_issues_no_mutations() {
        let api = MockApi::with_accounts(vec![
            account("sa_old", "svc-24-06"),
            account("sa_older", "svc-24-01"),
        ]);
        let console = Console::buffered();
        let mut run_ops = ops(&api, &console);
        run_ops.dry_run = true;
        let outcome =
            execute(&run_ops, &unit(DateFormat::ShortYearMonth), None).expect("execute");
        assert!(outcome.create.created);
        assert_eq!(outcome.deleted, 1);
        assert!(api.created.borrow().is_empty());
        assert!(api.deleted.borrow().is_empty());
    }

    fn batch_config(project_ids: &[&str]) -> BatchConfig {
        BatchConfig {
            rotations: project_ids
                .iter()
                .enumerate()
                .map(|(i, id)| RotationGroup {
                    project_name: Some(format!("Project {i}")),
                    project_id: Some(id.to_string()),
                    keys: vec![KeySpec {
                        name: Some("svc".to_string()),
                        notify_user: None,
                        notify_channel: None,
                        date_format: None,
                    }],
                })
                .collect(),
        }
    }

    #[test]
    fn batch_continues_past_a_failing_item() {
        let mut api = MockApi::with_accounts(vec![]);
        api.fail_list_for = Some("proj_2".to_string());
        let console = Console::buffered();
        let manager = NotificationManager::empty();
        let config = batch_config(&["proj_1", "proj_2", "proj_3"]);
        let tally = batch(
            &ops(&api, &console),
            &config,
            BatchAction::Create,
            &manager,
        )
        .expect("batch");
        assert_eq!(tally.success.len(), 2);
        assert_eq!(tally.failed.len(), 1);
        assert!(tally.failed[0].contains("Project 1 / svc"));
        // Items 1 and 3 were both attempted.
        assert_eq!(api.created.borrow().len(), 2);
    }

    #[test]
    fn batch_records_missing_project_and_empty_keys() {
        let config = BatchConfig {
            rotations: vec![
                RotationGroup {
                    project_name: Some("NoId".to_string()),
                    project_id: None,
                    keys: vec![],
                },
                RotationGroup {
                    project_name: Some("NoKeys".to_string()),
                    project_id: Some("proj_9".to_string()),
                    keys: vec![],
                },
            ],
        };
        let api = MockApi::with_accounts(vec![]);
        let console = Console::buffered();
        let manager = NotificationManager::empty();
        let tally = batch(
            &ops(&api, &console),
            &config,
            BatchAction::Cleanup,
            &manager,
        )
        .expect("batch");
        assert_eq!(tally.failed.len(), 1);
        assert_eq!(tally.skipped.len(), 1);
        assert!(tally.failed[0].contains("Missing project_id"));
    }

    #[test]
    fn batch_with_no_rotations_is_a_config_error() {
        let api = MockApi::with_accounts(vec![]);
        let console = Console::buffered();
        let manager = NotificationManager::empty();
        let err = batch(
            &ops(&api, &console),
            &BatchConfig::default(),
            BatchAction::Create,
            &manager,
        )
        .expect_err("empty config");
        assert_eq!(err.code(), "CONFIG_ERROR");
    }
}
