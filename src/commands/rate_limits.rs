use crate::cli::{RateLimitsArgs, RateLimitsCmd};
use crate::client::{HttpAdminClient, RateLimitUpdate};
use crate::error::{AppError, AppResult};
use crate::output::{emit_ok, CommandOutput, Console, OutputConfig};
use serde_json::json;

fn limit_or_dash(value: Option<i64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

pub fn run(
    client: &HttpAdminClient,
    cfg: OutputConfig,
    console: &Console,
    args: &RateLimitsArgs,
) -> AppResult<()> {
    match &args.command {
        RateLimitsCmd::List(list) => {
            let limits = client.list_rate_limits(&list.project_id, list.limit)?;
            if limits.is_empty() {
                console.line(format!(
                    "No rate limits found for project {}",
                    list.project_id
                ));
                return Ok(());
            }
            let mut text = format!(
                "Rate limits for {}: {}\n\n",
                list.project_id,
                limits.len()
            );
            text.push_str(&format!(
                "{:<28} {:<28} {:>12} {:>12} {:>12}\n",
                "ID", "Model", "Req/min", "Tokens/min", "Req/day"
            ));
            for limit in &limits {
                text.push_str(&format!(
                    "{:<28} {:<28} {:>12} {:>12} {:>12}\n",
                    limit.id,
                    limit.model.as_deref().unwrap_or("N/A"),
                    limit_or_dash(limit.max_requests_per_1_minute),
                    limit_or_dash(limit.max_tokens_per_1_minute),
                    limit_or_dash(limit.max_requests_per_1_day)
                ));
            }
            emit_ok(cfg, console, CommandOutput::new(json!(limits), text.trim_end()));
            Ok(())
        }
        RateLimitsCmd::Set(set) => {
            let update = RateLimitUpdate {
                max_requests_per_1_minute: set.max_requests_per_minute,
                max_tokens_per_1_minute: set.max_tokens_per_minute,
                max_requests_per_1_day: set.max_requests_per_day,
            };
            if update.is_empty() {
                return Err(AppError::usage(
                    "nothing to update; pass at least one --max-* flag",
                ));
            }
            let updated = client.update_rate_limit(&set.project_id, &set.rate_limit_id, &update)?;
            let text = format!(
                "[SUCCESS] Updated rate limit {}\nModel:       {}\nReq/min:     {}\nTokens/min:  {}\nReq/day:     {}",
                updated.id,
                updated.model.as_deref().unwrap_or("N/A"),
                limit_or_dash(updated.max_requests_per_1_minute),
                limit_or_dash(updated.max_tokens_per_1_minute),
                limit_or_dash(updated.max_requests_per_1_day)
            );
            emit_ok(cfg, console, CommandOutput::new(json!(updated), text));
            Ok(())
        }
    }
}
