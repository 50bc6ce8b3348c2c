use crate::error::{AppError, AppResult};
use time::macros::format_description;
use time::{Date, Month, OffsetDateTime, UtcOffset};

/// Current calendar date in the local timezone, falling back to UTC when the
/// local offset cannot be determined (e.g. multi-threaded test harnesses).
pub fn today() -> Date {
    match OffsetDateTime::now_local() {
        Ok(now) => now.date(),
        Err(_) => OffsetDateTime::now_utc().date(),
    }
}

/// Render an epoch-seconds timestamp as `YYYY-MM-DD HH:MM:SS`, or `N/A` when
/// the server omitted it.
pub fn format_timestamp(ts: Option<i64>) -> String {
    let Some(ts) = ts else {
        return "N/A".to_string();
    };
    let Ok(odt) = OffsetDateTime::from_unix_timestamp(ts) else {
        return "N/A".to_string();
    };
    let odt = match UtcOffset::current_local_offset() {
        Ok(offset) => odt.to_offset(offset),
        Err(_) => odt,
    };
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    odt.format(&format).unwrap_or_else(|_| "N/A".to_string())
}

/// Whole days between a creation timestamp and `today`. Age is always taken
/// from the server-assigned creation time, never from a name-derived date.
pub fn age_days(created_at: i64, today: Date) -> i64 {
    let Ok(created) = OffsetDateTime::from_unix_timestamp(created_at) else {
        return 0;
    };
    (today - created.date()).whole_days()
}

/// Strict `YYYY-MM-DD` parser for date-range flags.
pub fn parse_date_arg(raw: &str) -> AppResult<Date> {
    let parts: Vec<&str> = raw.split('-').collect();
    if parts.len() == 3 {
        if let (Ok(year), Ok(month), Ok(day)) = (
            parts[0].parse::<i32>(),
            parts[1].parse::<u8>(),
            parts[2].parse::<u8>(),
        ) {
            if let Ok(month) = Month::try_from(month) {
                if let Ok(date) = Date::from_calendar_date(year, month, day) {
                    return Ok(date);
                }
            }
        }
    }
    Err(AppError::usage(format!(
        "invalid date '{raw}'; expected YYYY-MM-DD"
    )))
}

/// Resolve `--start-date`/`--end-date`/`--days` into an epoch-seconds range.
/// `--days` and `--start-date` are mutually exclusive; with neither, the
/// range starts `default_days` ago.
pub fn date_range(
    start_date: Option<&str>,
    end_date: Option<&str>,
    days: Option<u32>,
    default_days: u32,
) -> AppResult<(i64, Option<i64>)> {
    if days.is_some() && start_date.is_some() {
        return Err(AppError::usage(
            "use either --days or --start-date, not both",
        ));
    }
    let end = match end_date {
        Some(raw) => Some(epoch_midnight(parse_date_arg(raw)?)),
        None => None,
    };
    let start = match start_date {
        Some(raw) => epoch_midnight(parse_date_arg(raw)?),
        None => {
            let back = i64::from(days.unwrap_or(default_days));
            OffsetDateTime::now_utc().unix_timestamp() - back * 86_400
        }
    };
    Ok((start, end))
}

fn epoch_midnight(date: Date) -> i64 {
    date.midnight().assume_utc().unix_timestamp()
}

/// Compact a redacted secret for table display: any run of four or more
/// asterisks collapses to exactly five.
pub fn format_redacted_value(value: Option<&str>) -> String {
    let Some(value) = value else {
        return "N/A".to_string();
    };
    if value.is_empty() {
        return "N/A".to_string();
    }
    let mut out = String::with_capacity(value.len());
    let mut run = 0usize;
    for ch in value.chars() {
        if ch == '*' {
            run += 1;
            continue;
        }
        flush_star_run(&mut out, run);
        run = 0;
        out.push(ch);
    }
    flush_star_run(&mut out, run);
    out
}

fn flush_star_run(out: &mut String, run: usize) {
    if run >= 4 {
        out.push_str("*****");
    } else {
        for _ in 0..run {
            out.push('*');
        }
    }
}
