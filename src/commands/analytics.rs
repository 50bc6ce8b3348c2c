use crate::cli::{AuditArgs, AuditCmd, CostsArgs, UsageArgs, UsageCmd, UsageQueryArgs};
use crate::client::{AnalyticsQuery, AuditQuery, HttpAdminClient, UsageEndpoint};
use crate::date_utils::{date_range, format_timestamp};
use crate::error::AppResult;
use crate::output::{emit_ok, CommandOutput, Console, OutputConfig};
use serde_json::{json, Value};

const DEFAULT_LOOKBACK_DAYS: u32 = 7;

pub fn run_usage(
    client: &HttpAdminClient,
    cfg: OutputConfig,
    console: &Console,
    args: &UsageArgs,
) -> AppResult<()> {
    let (endpoint, query_args, label) = match &args.command {
        UsageCmd::Completions(query) => (UsageEndpoint::Completions, query, "completions"),
        UsageCmd::Embeddings(query) => (UsageEndpoint::Embeddings, query, "embeddings"),
    };
    let query = usage_query(query_args)?;
    let value = client.usage(endpoint, &query)?;
    render_buckets(cfg, console, &value, &format!("{label} usage"));
    Ok(())
}

fn usage_query(args: &UsageQueryArgs) -> AppResult<AnalyticsQuery> {
    let (start_time, end_time) = date_range(
        args.start_date.as_deref(),
        args.end_date.as_deref(),
        args.days,
        DEFAULT_LOOKBACK_DAYS,
    )?;
    Ok(AnalyticsQuery {
        start_time,
        end_time,
        group_by: args.group_by.iter().map(|g| g.as_str().to_string()).collect(),
        project_ids: args.project_ids.clone(),
        models: args.models.clone(),
        limit: args.limit,
    })
}

pub fn run_costs(
    client: &HttpAdminClient,
    cfg: OutputConfig,
    console: &Console,
    args: &CostsArgs,
) -> AppResult<()> {
    let (start_time, end_time) = date_range(
        args.start_date.as_deref(),
        args.end_date.as_deref(),
        args.days,
        DEFAULT_LOOKBACK_DAYS,
    )?;
    let query = AnalyticsQuery {
        start_time,
        end_time,
        group_by: args.group_by.iter().map(|g| g.as_str().to_string()).collect(),
        project_ids: args.project_ids.clone(),
        models: Vec::new(),
        limit: args.limit,
    };
    let value = client.costs(&query)?;
    render_buckets(cfg, console, &value, "costs");
    Ok(())
}

/// Render `{ data: [ { start_time, end_time, results: [...] } ] }` bucket
/// responses generically: one block per time bucket, one line per result.
fn render_buckets(cfg: OutputConfig, console: &Console, value: &Value, label: &str) {
    let buckets = value["data"].as_array().cloned().unwrap_or_default();
    if buckets.is_empty() {
        console.line(format!("No {label} data for the requested range"));
        return;
    }
    let mut text = format!("{} buckets: {}\n", label, buckets.len());
    for bucket in &buckets {
        text.push_str(&format!(
            "\n{} .. {}\n",
            format_timestamp(bucket["start_time"].as_i64()),
            format_timestamp(bucket["end_time"].as_i64())
        ));
        let results = bucket["results"].as_array().cloned().unwrap_or_default();
        if results.is_empty() {
            text.push_str("   (no results)\n");
            continue;
        }
        for result in &results {
            text.push_str(&format!("   {}\n", summarize_result(result)));
        }
    }
    emit_ok(
        cfg,
        console,
        CommandOutput::new(json!(buckets), text.trim_end()),
    );
}

/// One result object as `key=value` pairs, skipping nulls and the object tag.
fn summarize_result(result: &Value) -> String {
    let Some(map) = result.as_object() else {
        return result.to_string();
    };
    let mut parts: Vec<String> = Vec::new();
    for (key, value) in map {
        if key == "object" || value.is_null() {
            continue;
        }
        match value {
            Value::String(s) => parts.push(format!("{key}={s}")),
            other => parts.push(format!("{key}={other}")),
        }
    }
    if parts.is_empty() {
        "(empty)".to_string()
    } else {
        parts.join("  ")
    }
}

pub fn run_audit(
    client: &HttpAdminClient,
    cfg: OutputConfig,
    console: &Console,
    args: &AuditArgs,
) -> AppResult<()> {
    let AuditCmd::List(list) = &args.command;
    let (start_time, end_time) = date_range(
        list.start_date.as_deref(),
        list.end_date.as_deref(),
        list.days,
        DEFAULT_LOOKBACK_DAYS,
    )?;
    let query = AuditQuery {
        limit: list.limit,
        after: list.after.clone(),
        before: list.before.clone(),
        effective_at_gte: Some(start_time),
        effective_at_lte: end_time,
        event_types: list.event_types.clone(),
        project_ids: list.project_ids.clone(),
        actor_emails: list.actor_emails.clone(),
    };
    let value = client.audit_logs(&query)?;
    let events = value["data"].as_array().cloned().unwrap_or_default();
    if events.is_empty() {
        console.line("No audit events for the requested range");
        return Ok(());
    }
    let mut text = format!("Audit events: {}\n\n", events.len());
    for event in &events {
        text.push_str(&format!(
            "{}  {:<28} actor={} project={}\n",
            format_timestamp(event["effective_at"].as_i64()),
            event["type"].as_str().unwrap_or("unknown"),
            audit_actor(event),
            event["project"]["id"].as_str().unwrap_or("-")
        ));
    }
    emit_ok(cfg, console, CommandOutput::new(json!(events), text.trim_end()));
    Ok(())
}

fn audit_actor(event: &Value) -> String {
    let actor = &event["actor"];
    if let Some(email) = actor["user"]["email"].as_str() {
        return email.to_string();
    }
    if let Some(name) = actor["session"]["user"]["email"].as_str() {
        return name.to_string();
    }
    if let Some(kind) = actor["type"].as_str() {
        return kind.to_string();
    }
    "-".to_string()
}

#[cfg(test)]
mod tests {
    use super::summarize_result;
    use serde_json::json;

    #[test]
    fn summarize_skips_nulls_and_object_tags() {
        let result = json!({
            "object": "organization.usage.completions.result",
            "input_tokens": 1200,
            "output_tokens": 340,
            "project_id": null,
            "model": "m-large"
        });
        let line = summarize_result(&result);
        assert!(line.contains("input_tokens=1200"));
        assert!(line.contains("model=m-large"));
        assert!(!line.contains("object="));
        assert!(!line.contains("project_id"));
    }

    #[test]
    fn summarize_handles_empty_objects() {
        assert_eq!(summarize_result(&json!({})), "(empty)");
        assert_eq!(summarize_result(&json!({ "object": "x" })), "(empty)");
    }
}
