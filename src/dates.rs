use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;

static DATE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,2}\.\d{1,2}\.\d{4}|\d{4}-\d{2}-\d{2}|\d{1,2}/\d{1,2}/\d{4})\b")
        .expect("date token regex must be valid")
});
static YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{4})\b").expect("year regex must be valid"));

/// Won/lost dates of a championship reign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Reign {
    pub won_date: Option<NaiveDate>,
    pub lost_date: Option<NaiveDate>,
    pub current: bool,
}

impl Reign {
    pub fn days(&self) -> Option<i64> {
        reign_days(self.won_date, self.lost_date)
    }
}

/// Canonical date from a single token: `DD.MM.YYYY`, an ISO `YYYY-MM-DD`
/// prefix, or `MM/DD/YYYY`.
pub fn normalize_date(raw: &str) -> Option<NaiveDate> {
    let token = raw.trim();
    if token.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(token, "%d.%m.%Y") {
        return Some(date);
    }
    if let Some(prefix) = token.get(..10)
        && let Ok(date) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d")
    {
        return Some(date);
    }
    NaiveDate::parse_from_str(token, "%m/%d/%Y").ok()
}

/// Every parseable date token in `text`, in order of appearance.
pub fn find_dates(text: &str) -> Vec<NaiveDate> {
    DATE_TOKEN
        .find_iter(text)
        .filter_map(|m| normalize_date(m.as_str()))
        .collect()
}

/// Parses a compound championship token such as `01.01.2023 - 15.06.2023`,
/// `01.01.2023 - current` or a bare won date.
pub fn parse_reign(date_info: &str) -> Reign {
    let lower = date_info.to_lowercase();
    let dates = find_dates(date_info);

    if lower.contains("current") || lower.contains("(c)") {
        return Reign {
            won_date: dates.first().copied(),
            lost_date: None,
            current: true,
        };
    }

    match dates.as_slice() {
        [] => Reign::default(),
        [won] => Reign {
            won_date: Some(*won),
            ..Reign::default()
        },
        [won, lost, ..] => Reign {
            won_date: Some(*won),
            lost_date: Some(*lost),
            current: false,
        },
    }
}

/// Whole days between won and lost. `None` unless both are known and the
/// lost date is not before the won date.
pub fn reign_days(won: Option<NaiveDate>, lost: Option<NaiveDate>) -> Option<i64> {
    let (won, lost) = (won?, lost?);
    let days = lost.signed_duration_since(won).num_days();
    (days >= 0).then_some(days)
}

pub fn describe_reign(days: Option<i64>) -> String {
    match days {
        Some(1) => "1 day".to_string(),
        Some(n) => format!("{n} days"),
        None => "unknown duration".to_string(),
    }
}

/// `YYYY-MM` bucket label for a raw date string.
pub fn period_label(raw: &str) -> Option<String> {
    normalize_date(raw).map(|date| format!("{:04}-{:02}", date.year(), date.month()))
}

pub fn first_year(text: &str) -> Option<i32> {
    YEAR.captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
