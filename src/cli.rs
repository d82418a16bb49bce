//! Command-line interface definitions.
//!
//! All arguments can be provided via command-line flags or environment variables.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the district news fetcher.
///
/// # Examples
///
/// ```sh
/// # Built-in Latur profile, snapshot in the working directory, every 30 minutes
/// district_news
///
/// # Custom profile and output, single run
/// district_news -c ./config/latur.yaml -o /srv/www/news_data.json --once
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path of the JSON snapshot file
    #[arg(short, long, env = "NEWS_OUTPUT", default_value = "news_data.json")]
    pub output: PathBuf,

    /// Optional path to a pipeline config YAML file (defaults to the built-in profile)
    #[arg(short, long, env = "NEWS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Minutes between runs
    #[arg(long, env = "NEWS_INTERVAL_MINUTES", default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval_minutes: u64,

    /// Run once and exit instead of looping
    #[arg(long)]
    pub once: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["district_news"]);
        assert_eq!(cli.output, PathBuf::from("news_data.json"));
        assert_eq!(cli.config, None);
        assert_eq!(cli.interval_minutes, 30);
        assert!(!cli.once);
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from([
            "district_news",
            "-o",
            "/tmp/news.json",
            "-c",
            "/etc/district_news/latur.yaml",
            "--interval-minutes",
            "15",
            "--once",
        ]);
        assert_eq!(cli.output, PathBuf::from("/tmp/news.json"));
        assert_eq!(cli.config, Some(PathBuf::from("/etc/district_news/latur.yaml")));
        assert_eq!(cli.interval_minutes, 15);
        assert!(cli.once);
    }

    #[test]
    fn test_cli_rejects_zero_interval() {
        assert!(Cli::try_parse_from(["district_news", "--interval-minutes", "0"]).is_err());
    }
}
