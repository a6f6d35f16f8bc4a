use serde::Serialize;

/// Coarse topical tag assigned to a domain via the static substring rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Reading,
    Research,
    Tools,
    Events,
    Other,
}

impl Category {
    /// Fixed order groups appear in the rendered report.
    pub const DISPLAY_ORDER: [Category; 5] = [
        Category::Reading,
        Category::Research,
        Category::Tools,
        Category::Events,
        Category::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Reading => "Reading",
            Category::Research => "Research",
            Category::Tools => "Tools",
            Category::Events => "Events",
            Category::Other => "Other",
        }
    }
}

/// Domains and URL fragments that are always dropped, regardless of any
/// other filter. Matched as substrings of the www-stripped host or the
/// full URL (the `google.com/url` entry only ever matches the latter).
pub const EXCLUSIONS: &[&str] = &[
    "facebook.com",
    "instagram.com",
    "twitter.com",
    "x.com",
    "tiktok.com",
    "reddit.com",
    "youtube.com",
    "amazon.com",
    "ebay.com",
    "pinterest.com",
    "linkedin.com",
    "threads.net",
    "mastodon.social",
    "gmail.com",
    "outlook.com",
    "mail.google.com",
    "freefeed.net",
    "google.com/url",
];

/// Ordered category rules: the first entry whose domain set contains a
/// substring of the visit host wins.
pub const CATEGORY_RULES: &[(Category, &[&str])] = &[
    (
        Category::Research,
        &[
            "github.com",
            "stackoverflow.com",
            "arxiv.org",
            "pubmed.ncbi.nlm.nih.gov",
            "wikipedia.org",
            "mdn.io",
            "python.org",
            "rust-lang.org",
            "docs.rs",
            "huggingface.co",
        ],
    ),
    (
        Category::Reading,
        &[
            "medium.com",
            "substack.com",
            "economist.com",
            "nytimes.com",
            "sciencedaily.com",
            "fastcompany.com",
            "livescience.com",
            "thenewstack.io",
            "towardsdatascience.com",
            "cbsnews.com",
            "designboom.com",
            "meduza.io",
            "euractiv.com",
            "psychologytoday.com",
            "hackaday.com",
            "lesswrong.com",
            "yahoonews.com",
        ],
    ),
    (
        Category::Tools,
        &[
            "openai.com",
            "claude-code.glebkalinin.com",
            "tbank.ru",
            "tinkoff.ru",
            "passwords.google.com",
        ],
    ),
    (Category::Events, &["eventbrite.de", "co-berlin.org", "mubi.com"]),
];

/// Sites that can be asked for by name ("threads on reddit"). Scanned in
/// table order; every match overwrites the previous one, so the last
/// matching entry wins.
pub const NAMED_SITES: &[(&str, &str)] = &[
    ("reddit", "reddit.com"),
    ("hackernews", "news.ycombinator.com"),
    ("twitter", "twitter.com"),
    ("medium", "medium.com"),
    ("youtube", "youtube.com"),
];

pub fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}

/// Resolve the category for a visit host. Unmatched hosts are `Other`.
pub fn categorize(host: &str) -> Category {
    let host = strip_www(host);
    for (category, sites) in CATEGORY_RULES {
        if sites.iter().any(|site| host.contains(site)) {
            return *category;
        }
    }
    Category::Other
}
