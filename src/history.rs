use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use rusqlite::{params, Connection, OpenFlags, Result as SqliteResult};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

/// One raw visit row from the history database, newest first.
#[derive(Debug, Clone)]
pub struct RawEvent {
    pub url: String,
    pub title: Option<String>,
    /// Chrome timestamp: microseconds since 1601-01-01 UTC.
    pub visit_time: i64,
}

// Offset between the Chrome epoch (1601-01-01) and the Unix epoch.
const CHROME_EPOCH_OFFSET_MICROS: i64 = 11_644_473_600 * 1_000_000;

pub fn to_chrome_time(time: DateTime<Local>) -> i64 {
    time.timestamp_micros() + CHROME_EPOCH_OFFSET_MICROS
}

pub fn from_chrome_time(chrome_time: i64) -> DateTime<Local> {
    DateTime::<Utc>::from_timestamp_micros(chrome_time - CHROME_EPOCH_OFFSET_MICROS)
        .unwrap_or_default()
        .with_timezone(&Local)
}

/// Convert an inclusive local date range to inclusive Chrome-time bounds,
/// covering `[start 00:00:00.000000, end 23:59:59.999999]`. Exact integer
/// arithmetic; a rounding slip here silently shifts the boundary by a day.
pub fn chrome_time_range(start: NaiveDate, end: NaiveDate) -> (i64, i64) {
    let range_start = local_midnight(start);
    let range_end = local_midnight(end + Duration::days(1));
    (to_chrome_time(range_start), to_chrome_time(range_end) - 1)
}

fn local_midnight(date: NaiveDate) -> DateTime<Local> {
    let naive = date.and_time(NaiveTime::MIN);
    // Midnight can fall in a DST gap; treat it as UTC wall time then.
    naive
        .and_local_timezone(Local)
        .earliest()
        .unwrap_or_else(|| Local.from_utc_datetime(&naive))
}

/// Resolve the history database path for a browser on this OS.
pub fn history_db_path(browser: &str) -> Result<PathBuf> {
    let system = env::consts::OS;
    let home = env::var("HOME").or_else(|_| env::var("USERPROFILE"))?;

    let path = match (browser.to_lowercase().as_str(), system) {
        ("chrome", "windows") => {
            let local_app_data = env::var("LOCALAPPDATA")?;
            PathBuf::from(local_app_data).join("Google/Chrome/User Data/Default/History")
        }
        ("chrome", "macos") => {
            PathBuf::from(home).join("Library/Application Support/Google/Chrome/Default/History")
        }
        ("chrome", "linux") => PathBuf::from(home).join(".config/google-chrome/Default/History"),
        ("vivaldi", "windows") => {
            let local_app_data = env::var("LOCALAPPDATA")?;
            PathBuf::from(local_app_data).join("Vivaldi/User Data/Default/History")
        }
        ("vivaldi", "macos") => {
            PathBuf::from(home).join("Library/Application Support/Vivaldi/Default/History")
        }
        ("vivaldi", "linux") => PathBuf::from(home).join(".config/vivaldi/default/History"),
        _ => anyhow::bail!(
            "Unsupported browser '{}' or operating system '{}'",
            browser,
            system
        ),
    };

    info!(action = "resolve", component = "history_path", browser = browser, path = ?path, "History database path resolved");
    Ok(path)
}

/// Fetch all visits in the inclusive date range, newest first.
///
/// Any source failure (missing file, copy error, query error) degrades to
/// an empty result; the caller still renders a report.
pub fn fetch(
    db_path: &Path,
    start: NaiveDate,
    end: NaiveDate,
    temp_path: Option<&Path>,
) -> Vec<RawEvent> {
    match try_fetch(db_path, start, end, temp_path) {
        Ok(events) => events,
        Err(e) => {
            warn!(
                action = "degrade",
                component = "history_fetch",
                error = %e,
                "History source unavailable, treating as empty"
            );
            Vec::new()
        }
    }
}

fn try_fetch(
    db_path: &Path,
    start: NaiveDate,
    end: NaiveDate,
    temp_path: Option<&Path>,
) -> Result<Vec<RawEvent>> {
    let (time_start, time_end) = chrome_time_range(start, end);
    let snapshot = copy_snapshot(db_path, temp_path)?;

    let result = query_range(&snapshot, time_start, time_end);

    // The snapshot is removed on every exit path, including query failure.
    if let Err(e) = fs::remove_file(&snapshot) {
        warn!(action = "cleanup", component = "snapshot", error = %e, "Failed to remove snapshot copy");
    }

    result
}

// The live database may be exclusively locked by the browser, so every
// query runs against a point-in-time copy.
fn copy_snapshot(db_path: &Path, temp_path: Option<&Path>) -> Result<PathBuf> {
    let start_time = Instant::now();

    let temp_path = temp_path
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| env::temp_dir().join("retrace_history_copy.db"));

    if !db_path.exists() {
        anyhow::bail!("History file not found at {:?}", db_path);
    }

    fs::copy(db_path, &temp_path)
        .with_context(|| format!("Failed to copy history database to {:?}", temp_path))?;

    let copy_time = start_time.elapsed();
    info!(
        action = "copy",
        component = "snapshot",
        source = ?db_path,
        destination = ?temp_path,
        duration_ms = copy_time.as_millis(),
        "History snapshot copied"
    );
    Ok(temp_path)
}

fn query_range(snapshot: &Path, time_start: i64, time_end: i64) -> Result<Vec<RawEvent>> {
    let start_time = Instant::now();

    let conn = Connection::open_with_flags(snapshot, OpenFlags::SQLITE_OPEN_READ_ONLY)
        .context("Failed to open history snapshot")?;

    let mut stmt = conn.prepare(
        "SELECT urls.url, urls.title, visits.visit_time
         FROM urls
         JOIN visits ON urls.id = visits.url
         WHERE visits.visit_time >= ?1 AND visits.visit_time <= ?2
         ORDER BY visits.visit_time DESC",
    )?;

    let events = stmt
        .query_map(params![time_start, time_end], |row| {
            Ok(RawEvent {
                url: row.get(0)?,
                title: row.get(1)?,
                visit_time: row.get(2)?,
            })
        })?
        .collect::<SqliteResult<Vec<_>>>()
        .context("Failed to query visit range")?;

    let query_time = start_time.elapsed();
    info!(
        action = "query",
        component = "history_fetch",
        event_count = events.len(),
        duration_ms = query_time.as_millis(),
        "Visit range query completed"
    );
    Ok(events)
}
