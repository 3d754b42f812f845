use crate::cache::ArticleCache;
use crate::prelude::{eprintln, println, *};
use crate::source::{ArticleSource, HttpArticleSource};
use crate::store::store_from_settings;
use devcards_core::config::{Columns, FallbackPolicy, RenderConfig};
use devcards_core::feed::{resolve_articles, FeedOutcome};
use devcards_core::render::render_grid;

/// Display options shared by the `render` and `preview` commands
#[derive(Debug, Clone, clap::Args)]
pub struct DisplayOptions {
    /// Number of grid columns (2 or 3; anything else renders 3)
    #[arg(long, default_value = "3")]
    pub columns: String,

    /// Hide cover images
    #[arg(long)]
    pub no_image: bool,

    /// Hide reading time labels
    #[arg(long)]
    pub no_reading_time: bool,

    /// Hide reaction counts
    #[arg(long)]
    pub no_reactions: bool,

    /// Block attributes as JSON (e.g. '{"columns":2,"showImage":false}'); replaces the flags above
    #[arg(long, env = "DEVCARDS_ATTRIBUTES")]
    pub attributes: Option<String>,
}

impl DisplayOptions {
    pub fn to_config(&self) -> Result<RenderConfig> {
        if let Some(raw) = &self.attributes {
            let value: serde_json::Value =
                serde_json::from_str(raw).context("--attributes must be valid JSON")?;
            return Ok(RenderConfig::from_attributes(&value));
        }

        Ok(RenderConfig {
            columns: Columns::from_raw(&self.columns),
            show_image: !self.no_image,
            show_reading_time: !self.no_reading_time,
            show_reactions: !self.no_reactions,
        })
    }
}

#[derive(Debug, Clone, clap::Args)]
pub struct RenderOptions {
    #[clap(flatten)]
    pub display: DisplayOptions,
}

/// Render the block through the cache
///
/// Always produces markup: a degraded feed resolves through `policy` and an
/// empty list renders the standard warning notice.
pub async fn render_block<S: ArticleSource>(
    cache: &ArticleCache<S>,
    config: &RenderConfig,
    policy: FallbackPolicy,
) -> String {
    let outcome = cache.get_or_fetch().await;

    match &outcome {
        FeedOutcome::Degraded { reason } => {
            log::warn!("Rendering with fallback policy '{policy}' after fetch failure: {reason}")
        }
        other => log::debug!("Rendering {} feed", other.label()),
    }

    let articles = resolve_articles(outcome, policy);
    render_grid(&articles, config)
}

pub async fn run(options: RenderOptions, global: crate::Global) -> Result<()> {
    let config = options.display.to_config()?;
    let settings = global.settings()?;

    if global.verbose {
        eprintln!("Endpoint: {}", settings.endpoint);
        eprintln!("Columns: {}", config.columns);
    }

    let source = HttpArticleSource::from_settings(&settings)?;
    let cache = ArticleCache::new(source, store_from_settings(&settings), settings.cache_ttl_secs);

    let html = render_block(&cache, &config, settings.fallback).await;
    println!("{}", html);

    Ok(())
}
