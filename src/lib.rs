use anyhow::Result;
use std::time::Instant;
use tracing::info;

pub mod args;
pub mod filter;
pub mod history;
pub mod query;
pub mod report;
pub mod rules;
pub mod utils;

pub use args::Args;
pub use filter::{process, VisitRecord};
pub use history::{fetch, RawEvent};
pub use query::{parse, parse_at, QueryFilter};
pub use report::render;
pub use rules::Category;

/// Run the whole parse -> fetch -> filter -> render pipeline for one query.
pub fn run(args: &Args) -> Result<String> {
    let start_time = Instant::now();
    let query_text = args.query_text();

    let parsed = query::parse(&query_text);
    let db_path = history::history_db_path(&args.browser)?;
    let events = history::fetch(
        &db_path,
        parsed.date_start,
        parsed.date_end,
        args.temp_path.as_deref(),
    );
    let records = filter::process(events, &parsed);

    let total_time = start_time.elapsed();
    info!(
        action = "complete",
        component = "pipeline",
        record_count = records.len(),
        duration_ms = total_time.as_millis(),
        "Query completed"
    );
    Ok(report::render(&records, &query_text))
}
