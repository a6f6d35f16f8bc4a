use chrono::{Duration, Local, NaiveDate};
use regex::Regex;
use std::sync::OnceLock;
use tracing::info;

use crate::rules::{Category, NAMED_SITES};

/// Structured filter parsed from a free-text query. Immutable after parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryFilter {
    /// Inclusive calendar-date range.
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
    /// Lowercase keyword tokens in query order. May be empty.
    pub keywords: Vec<String>,
    /// Category tags in trigger order. Duplicates are preserved: two
    /// triggers mapping to the same category append it twice, and the
    /// filter stage only does membership tests.
    pub categories: Vec<Category>,
    /// Domain to restrict results to, from the named-site table.
    pub domain: Option<String>,
}

// Free text following "about", up to "i read" or end of sentence.
const KEYWORD_PATTERN: &str = r"about\s+([a-z\s]+?)(?:\s+i\s+read|$|\.)";

fn keyword_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(KEYWORD_PATTERN).expect("keyword pattern is valid"))
}

/// Parse a natural-language query against the current date.
pub fn parse(text: &str) -> QueryFilter {
    parse_at(text, Local::now().date_naive())
}

/// Parse a natural-language query against an explicit "today".
///
/// Case-insensitive and total: unrecognized text falls back to a
/// today-only range with no filters.
pub fn parse_at(text: &str, today: NaiveDate) -> QueryFilter {
    let query = text.to_lowercase();
    let query = query.trim();

    let (date_start, date_end) = resolve_date_range(query, today);

    let mut categories = Vec::new();
    if query.contains("article") || query.contains("reading") {
        categories.push(Category::Reading);
    }
    if query.contains("research") || query.contains("scientific") || query.contains("paper") {
        categories.push(Category::Research);
    }
    if query.contains("code") || query.contains("github") {
        categories.push(Category::Research);
    }

    // Every named-site hit overwrites the previous one; the table is in a
    // defined order, so the last matching entry wins.
    let mut domain = None;
    for (name, site) in NAMED_SITES {
        if query.contains(name) {
            domain = Some((*site).to_string());
        }
    }

    let keywords: Vec<String> = keyword_regex()
        .captures(query)
        .and_then(|caps| caps.get(1))
        .map(|m| {
            m.as_str()
                .split_whitespace()
                .filter(|token| token.len() > 2)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    info!(
        action = "parse",
        component = "query",
        date_start = %date_start,
        date_end = %date_end,
        keyword_count = keywords.len(),
        category_count = categories.len(),
        domain = domain.as_deref().unwrap_or("-"),
        "Parsed query"
    );

    QueryFilter {
        date_start,
        date_end,
        keywords,
        categories,
        domain,
    }
}

// First matching trigger wins; later triggers in the text are ignored.
fn resolve_date_range(query: &str, today: NaiveDate) -> (NaiveDate, NaiveDate) {
    if query.contains("yesterday") {
        let yesterday = today - Duration::days(1);
        (yesterday, yesterday)
    } else if ["last week", "past week", "this week"]
        .iter()
        .any(|t| query.contains(t))
    {
        (today - Duration::days(7), today)
    } else if ["last month", "past month", "this month"]
        .iter()
        .any(|t| query.contains(t))
    {
        (today - Duration::days(30), today)
    } else if ["last 2 weeks", "past 2 weeks"]
        .iter()
        .any(|t| query.contains(t))
    {
        (today - Duration::days(14), today)
    } else {
        // "today", "this morning", "tonight" and the no-trigger default
        // all resolve to a today-only range.
        (today, today)
    }
}
