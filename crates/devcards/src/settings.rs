use crate::prelude::*;
use devcards_core::config::FallbackPolicy;
use devcards_core::feed::DEFAULT_TTL_SECS;
use std::path::PathBuf;
use std::time::Duration;

/// Default article-list endpoint
pub const DEFAULT_ENDPOINT: &str = "https://dev.to/api/articles";

/// Default number of articles requested
pub const DEFAULT_PER_PAGE: u32 = 10;

/// Default outbound request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Cache store backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum StoreKind {
    /// Process-local map, lost on exit
    Memory,
    /// JSON file under the cache directory
    File,
}

/// Source and cache options shared by every command
#[derive(Debug, Clone, clap::Args)]
pub struct SourceArgs {
    /// Article-list endpoint
    #[arg(long, env = "DEVCARDS_ENDPOINT", global = true, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Number of articles to request
    #[arg(long, env = "DEVCARDS_PER_PAGE", global = true, default_value_t = DEFAULT_PER_PAGE)]
    pub per_page: u32,

    /// Request timeout in seconds
    #[arg(long, env = "DEVCARDS_TIMEOUT", global = true, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Cache lifetime in seconds
    #[arg(long, env = "DEVCARDS_CACHE_TTL", global = true, default_value_t = DEFAULT_TTL_SECS)]
    pub cache_ttl: u64,

    /// Where the article cache lives
    #[arg(long, env = "DEVCARDS_STORE", global = true, value_enum, default_value = "file")]
    pub store: StoreKind,

    /// Cache directory for the file store (default: user cache dir + devcards)
    #[arg(long, env = "DEVCARDS_CACHE_DIR", global = true)]
    pub cache_dir: Option<PathBuf>,

    /// What to show when the live source fails: warn, demo
    #[arg(long, env = "DEVCARDS_FALLBACK", global = true, default_value = "warn")]
    pub fallback: FallbackPolicy,
}

/// Resolved runtime settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub endpoint: String,
    pub per_page: u32,
    pub timeout: Duration,
    pub cache_ttl_secs: u64,
    pub store: StoreKind,
    pub cache_dir: PathBuf,
    pub fallback: FallbackPolicy,
}

impl Settings {
    pub fn from_args(args: &SourceArgs) -> Result<Self> {
        if args.timeout == 0 {
            return Err(eyre!("--timeout must be at least 1 second"));
        }

        let cache_dir = match &args.cache_dir {
            Some(dir) => dir.clone(),
            None => default_cache_dir()?,
        };

        Ok(Self {
            endpoint: args.endpoint.clone(),
            per_page: args.per_page.max(1),
            timeout: Duration::from_secs(args.timeout),
            cache_ttl_secs: args.cache_ttl,
            store: args.store,
            cache_dir,
            fallback: args.fallback,
        })
    }
}

fn default_cache_dir() -> Result<PathBuf> {
    Ok(dirs_next::cache_dir()
        .ok_or_else(|| eyre!("Unable to determine cache directory, pass --cache-dir"))?
        .join("devcards"))
}
