use time::{Date, Month};

/// Accepted encodings for the date suffix of a rotated account name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// `prefix-YY-MM`, e.g. `billing-server-24-11`.
    ShortYearMonth,
    /// `prefix-YYYY-MM-DD`, e.g. `billing-server-2024-11-13`.
    FullDate,
}

impl DateFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            DateFormat::ShortYearMonth => "YY-MM",
            DateFormat::FullDate => "YYYY-MM-DD",
        }
    }

    pub fn from_config(raw: &str) -> Option<Self> {
        match raw {
            "YY-MM" => Some(DateFormat::ShortYearMonth),
            "YYYY-MM-DD" => Some(DateFormat::FullDate),
            _ => None,
        }
    }
}

/// Extract the calendar date embedded in a rotated account name.
///
/// The full `prefix-YYYY-MM-DD` form is tried first, then `prefix-YY-MM`
/// (year 2000+YY, day pinned to the 1st so it only orders within a month).
/// Anything that does not conform is simply not a rotation name; callers
/// scan whole account lists, so this returns `None` rather than an error.
pub fn parse_dated_name(name: &str, prefix: &str) -> Option<Date> {
    let rest = name.strip_prefix(prefix)?.strip_prefix('-')?;
    parse_full_date(rest).or_else(|| parse_short_date(rest))
}

fn parse_full_date(rest: &str) -> Option<Date> {
    let mut parts = rest.split('-');
    let year = fixed_digits(parts.next()?, 4)?;
    let month = fixed_digits(parts.next()?, 2)?;
    let day = fixed_digits(parts.next()?, 2)?;
    if parts.next().is_some() {
        return None;
    }
    let month = Month::try_from(u8::try_from(month).ok()?).ok()?;
    Date::from_calendar_date(i32::try_from(year).ok()?, month, u8::try_from(day).ok()?).ok()
}

fn parse_short_date(rest: &str) -> Option<Date> {
    let mut parts = rest.split('-');
    let year = fixed_digits(parts.next()?, 2)?;
    let month = fixed_digits(parts.next()?, 2)?;
    if parts.next().is_some() {
        return None;
    }
    let month = Month::try_from(u8::try_from(month).ok()?).ok()?;
    Date::from_calendar_date(2000 + i32::try_from(year).ok()?, month, 1).ok()
}

fn fixed_digits(part: &str, width: usize) -> Option<u32> {
    if part.len() != width || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

/// The account name the rotation would use today.
pub fn expected_name(prefix: &str, format: DateFormat, today: Date) -> String {
    match format {
        DateFormat::ShortYearMonth => format!(
            "{prefix}-{:02}-{:02}",
            today.year().rem_euclid(100),
            u8::from(today.month())
        ),
        DateFormat::FullDate => format!(
            "{prefix}-{:04}-{:02}-{:02}",
            today.year(),
            u8::from(today.month()),
            today.day()
        ),
    }
}

/// The date a name generated today would parse back to; the first of the
/// month for the short format. Used to spot duplicate current-period names.
pub fn current_period(format: DateFormat, today: Date) -> Date {
    match format {
        DateFormat::ShortYearMonth => {
            Date::from_calendar_date(today.year(), today.month(), 1).unwrap_or(today)
        }
        DateFormat::FullDate => today,
    }
}
