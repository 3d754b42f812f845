use crate::block::DisplayOptions;
use crate::prelude::{eprintln, println, *};
use crate::source::{ArticleSource, HttpArticleSource};
use colored::Colorize;
use devcards_core::preview::{render_preview, transition, PreviewEvent, PreviewState};
use futures::stream::{self, Stream};
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone, clap::Args)]
pub struct PreviewOptions {
    #[clap(flatten)]
    pub display: DisplayOptions,
}

/// Mount a preview: move to `Loading` and fetch in the background
///
/// The returned receiver observes every transition. The fetch goes straight
/// to the source, without the cache, and is not cancelled when the receiver
/// is dropped; the late result is simply discarded.
pub fn spawn_preview<S>(source: Arc<S>) -> watch::Receiver<PreviewState>
where
    S: ArticleSource + 'static,
{
    let (tx, rx) = watch::channel(transition(PreviewState::Idle, PreviewEvent::Mount));

    tokio::spawn(async move {
        let event = match source.fetch_articles().await {
            Ok(articles) => PreviewEvent::Loaded(articles),
            Err(e) => PreviewEvent::Failed(e.to_string()),
        };

        tx.send_modify(|state| {
            let current = std::mem::take(state);
            *state = transition(current, event);
        });
    });

    rx
}

/// Turn a preview receiver into a stream of states ending with the settled one
pub fn preview_states(rx: watch::Receiver<PreviewState>) -> impl Stream<Item = PreviewState> {
    stream::unfold(Some((rx, true)), |cursor| async move {
        let (mut rx, first) = cursor?;

        if !first && rx.changed().await.is_err() {
            return None;
        }

        let state = rx.borrow_and_update().clone();
        let next = if state.is_settled() {
            None
        } else {
            Some((rx, false))
        };

        Some((state, next))
    })
}

pub async fn run(options: PreviewOptions, global: crate::Global) -> Result<()> {
    use futures::StreamExt;

    let config = options.display.to_config()?;
    let settings = global.settings()?;

    if global.verbose {
        eprintln!("Previewing {} (no cache)", settings.endpoint);
    }

    let source = Arc::new(HttpArticleSource::from_settings(&settings)?);
    let mut states = Box::pin(preview_states(spawn_preview(source)));

    while let Some(state) = states.next().await {
        let label = match &state {
            PreviewState::Success(_) => state.name().green().bold(),
            PreviewState::Empty => state.name().yellow().bold(),
            PreviewState::Error(_) => state.name().red().bold(),
            _ => state.name().cyan().bold(),
        };

        eprintln!("[{}]", label);
        println!("{}", render_preview(&state, &config));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::testing::FakeSource;
    use devcards_core::article::demo_articles;
    use futures::StreamExt;

    async fn collect_states(source: FakeSource) -> Vec<PreviewState> {
        preview_states(spawn_preview(Arc::new(source)))
            .collect()
            .await
    }

    fn names(states: &[PreviewState]) -> Vec<&'static str> {
        states.iter().map(|s| s.name()).collect()
    }

    #[tokio::test]
    async fn test_preview_success() {
        let states = collect_states(FakeSource::new(Ok(demo_articles()))).await;

        let last = states.last().unwrap();
        assert_eq!(last, &PreviewState::Success(demo_articles()));
        assert!(names(&states).iter().all(|n| *n == "loading" || *n == "success"));
    }

    #[tokio::test]
    async fn test_preview_empty() {
        let states = collect_states(FakeSource::new(Ok(Vec::new()))).await;
        assert_eq!(states.last().unwrap(), &PreviewState::Empty);
    }

    #[tokio::test]
    async fn test_preview_error() {
        let states = collect_states(FakeSource::new(Err(Error::Status(500)))).await;
        assert_eq!(
            states.last().unwrap(),
            &PreviewState::Error("Unexpected HTTP status: 500".to_string())
        );
    }

    #[tokio::test]
    async fn test_preview_starts_loading() {
        let rx = spawn_preview(Arc::new(FakeSource::new(Ok(demo_articles()))));
        let mut states = Box::pin(preview_states(rx));
        let first = states.next().await.unwrap();

        // The fetch may already have finished by the time we look
        assert!(matches!(
            first,
            PreviewState::Loading | PreviewState::Success(_)
        ));
    }

    #[tokio::test]
    async fn test_preview_calls_source_once() {
        let source = Arc::new(FakeSource::new(Ok(demo_articles())));

        let _: Vec<PreviewState> = preview_states(spawn_preview(source.clone())).collect().await;

        assert_eq!(source.calls(), 1);
    }
}
