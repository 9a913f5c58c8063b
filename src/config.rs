//! Command-line configuration shared by the binary and the tests.

use std::path::PathBuf;

use crate::api::RetryPolicy;

pub const DEFAULT_RANKED_URL: &str = "https://pokegen.onrender.com/top_count";
pub const DEFAULT_GALLERY_URL: &str = "https://pokegen.onrender.com/gallery";

#[derive(clap::Args, Clone, Debug, PartialEq)]
pub struct FeedConfig {
    /// Endpoint returning the ranked record list
    #[arg(long, default_value = DEFAULT_RANKED_URL)]
    pub ranked_url: String,

    /// Endpoint returning the gallery list
    #[arg(long, default_value = DEFAULT_GALLERY_URL)]
    pub gallery_url: String,

    /// Extra fetch attempts after a failed request
    #[arg(long, default_value = "0")]
    pub retries: u32,

    /// Base delay between retries, doubled on each attempt
    #[arg(long, default_value = "400")]
    pub retry_backoff_ms: u64,

    /// Gallery autoscroll distance per tick, in columns
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub scroll_step: u32,

    /// Gallery autoscroll tick interval
    #[arg(long, default_value = "60", value_parser = clap::value_parser!(u64).range(1..))]
    pub scroll_interval_ms: u64,

    /// Directory for the rolling log file
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            ranked_url: DEFAULT_RANKED_URL.to_string(),
            gallery_url: DEFAULT_GALLERY_URL.to_string(),
            retries: 0,
            retry_backoff_ms: 400,
            scroll_step: 1,
            scroll_interval_ms: 60,
            log_dir: None,
        }
    }
}

impl FeedConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            retries: self.retries,
            backoff_ms: self.retry_backoff_ms,
        }
    }

    pub fn resolved_log_dir(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(default_log_dir)
    }
}

pub fn default_log_dir() -> PathBuf {
    dirs_next::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pokebattle")
        .join("logs")
}
