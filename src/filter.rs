use chrono::{DateTime, Local};
use serde::Serialize;
use std::collections::HashSet;
use tracing::info;
use url::Url;

use crate::history::{from_chrome_time, RawEvent};
use crate::query::QueryFilter;
use crate::rules::{self, Category, EXCLUSIONS};

/// One kept visit, enriched with domain and category. Immutable.
#[derive(Debug, Clone, Serialize)]
pub struct VisitRecord {
    pub timestamp: DateTime<Local>,
    pub url: String,
    /// Display title; falls back to the url when the source has none.
    pub title: String,
    /// Host component of the url, empty when the url does not parse.
    pub domain: String,
    pub category: Category,
}

/// Apply exclusions, the parsed filters, and url deduplication to a raw
/// event stream. Input is newest-first, and survivors keep that order, so
/// the first occurrence of a url is also its most recent visit.
pub fn process(events: Vec<RawEvent>, filter: &QueryFilter) -> Vec<VisitRecord> {
    let input_count = events.len();
    let mut seen_urls: HashSet<String> = HashSet::new();
    let mut records = Vec::new();

    for event in events {
        let host = host_of(&event.url);

        if is_excluded(&event.url, &host) {
            continue;
        }

        if let Some(domain) = &filter.domain {
            if !event.url.contains(domain.as_str()) {
                continue;
            }
        }

        if seen_urls.contains(&event.url) {
            continue;
        }

        let category = rules::categorize(&host);
        if !filter.categories.is_empty() && !filter.categories.contains(&category) {
            continue;
        }

        if !filter.keywords.is_empty() {
            let haystack = format!(
                "{} {}",
                event.url,
                event.title.as_deref().unwrap_or_default()
            )
            .to_lowercase();
            if !filter.keywords.iter().any(|kw| haystack.contains(kw)) {
                continue;
            }
        }

        seen_urls.insert(event.url.clone());

        let title = match event.title {
            Some(t) if !t.trim().is_empty() => t,
            _ => event.url.clone(),
        };
        records.push(VisitRecord {
            timestamp: from_chrome_time(event.visit_time),
            url: event.url,
            title,
            domain: host,
            category,
        });
    }

    info!(
        action = "process",
        component = "filter",
        input_count,
        kept_count = records.len(),
        "Filtered raw events"
    );
    records
}

fn host_of(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_default()
}

// Blocklisted sites and non-retrievable pseudo-schemes are dropped before
// any query filter applies.
fn is_excluded(url: &str, host: &str) -> bool {
    if url.starts_with("chrome://") || url.starts_with("about:") || url.starts_with("data:") {
        return true;
    }
    let host = rules::strip_www(host);
    EXCLUSIONS
        .iter()
        .any(|entry| host.contains(entry) || url.contains(entry))
}
