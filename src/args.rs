use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "retrace",
    about = "Query local browser history with natural language",
    version,
    long_about = None
)]
pub struct Args {
    /// Free-text query, e.g. "articles about rust I read yesterday"
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,

    /// Browser whose history to search
    #[arg(short, long, default_value = "Chrome")]
    pub browser: String,

    /// Custom path for the temporary history snapshot copy
    #[arg(long)]
    pub temp_path: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// The query may arrive as several shell words; join them back.
    pub fn query_text(&self) -> String {
        self.query.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_words_are_joined() {
        let args = Args::parse_from(["retrace", "articles", "I", "read", "yesterday"]);
        assert_eq!(args.query_text(), "articles I read yesterday");
        assert_eq!(args.browser, "Chrome");
    }

    #[test]
    fn missing_query_is_a_usage_error() {
        assert!(Args::try_parse_from(["retrace"]).is_err());
    }
}
