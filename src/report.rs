use crate::filter::VisitRecord;
use crate::rules::Category;

const TITLE_LIMIT: usize = 75;
const TRUNCATED_LEN: usize = 72;

/// Render the filtered visits as a grouped, markdown-style text report.
pub fn render(records: &[VisitRecord], query_text: &str) -> String {
    if records.is_empty() {
        return format!("No browsing history found for: {query_text}");
    }

    let mut lines = vec![
        format!("## Browser History: {query_text}"),
        format!("*Found {} items*", records.len()),
        String::new(),
    ];

    for category in Category::DISPLAY_ORDER {
        let group: Vec<&VisitRecord> =
            records.iter().filter(|r| r.category == category).collect();
        if group.is_empty() {
            continue;
        }

        lines.push(format!("### {} ({})", category.label(), group.len()));
        for record in group {
            lines.push(format!(
                "- {} {}",
                record.timestamp.format("%H:%M"),
                truncate_title(record.title.trim())
            ));
            lines.push(format!("  {}", record.url));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

fn truncate_title(title: &str) -> String {
    if title.chars().count() > TITLE_LIMIT {
        let cut: String = title.chars().take(TRUNCATED_LEN).collect();
        format!("{cut}...")
    } else {
        title.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::from_chrome_time;

    fn record(url: &str, title: &str, category: Category, visit_time: i64) -> VisitRecord {
        VisitRecord {
            timestamp: from_chrome_time(visit_time),
            url: url.to_string(),
            title: title.to_string(),
            domain: String::new(),
            category,
        }
    }

    #[test]
    fn empty_results_echo_the_query_without_headings() {
        let out = render(&[], "anything");
        assert!(out.contains("anything"));
        assert!(!out.contains("###"));
        assert_eq!(out.lines().count(), 1);
    }

    #[test]
    fn groups_follow_fixed_priority_order() {
        let records = vec![
            record("https://x.example/", "misc", Category::Other, 300),
            record("https://openai.com/", "tool", Category::Tools, 200),
            record("https://medium.com/a", "read", Category::Reading, 100),
        ];
        let out = render(&records, "everything today");

        let reading = out.find("### Reading (1)").unwrap();
        let tools = out.find("### Tools (1)").unwrap();
        let other = out.find("### Other (1)").unwrap();
        assert!(reading < tools && tools < other);
        assert!(!out.contains("### Research"));
        assert!(!out.contains("### Events"));
    }

    #[test]
    fn summary_line_follows_the_title() {
        let records = vec![
            record("https://a.example/", "a", Category::Other, 200),
            record("https://b.example/", "b", Category::Other, 100),
        ];
        let out = render(&records, "stuff");
        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("## Browser History: stuff"));
        assert_eq!(lines.next(), Some("*Found 2 items*"));
    }

    #[test]
    fn long_titles_are_truncated_with_ellipsis() {
        let long_title = "x".repeat(80);
        let records = vec![record("https://a.example/", &long_title, Category::Other, 100)];
        let out = render(&records, "q");

        let expected = format!("{}...", "x".repeat(72));
        assert!(out.contains(&expected));
        assert!(!out.contains(&"x".repeat(73)));
    }

    #[test]
    fn short_titles_are_left_alone() {
        let title = "a".repeat(75);
        assert_eq!(truncate_title(&title), title);
    }

    #[test]
    fn entries_carry_time_and_raw_url() {
        let records = vec![record(
            "https://docs.rs/chrono",
            "chrono - Rust",
            Category::Research,
            100,
        )];
        let out = render(&records, "docs");
        let time = from_chrome_time(100).format("%H:%M").to_string();
        assert!(out.contains(&format!("- {time} chrono - Rust")));
        assert!(out.contains("  https://docs.rs/chrono"));
    }
}
