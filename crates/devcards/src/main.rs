use crate::prelude::*;
use clap::Parser;

mod block;
mod cache;
mod error;
mod prelude;
mod preview;
mod serve;
mod settings;
mod source;
mod store;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Render recent Dev.to articles as a responsive card grid"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    #[clap(flatten)]
    source: settings::SourceArgs,

    /// Whether to display additional information.
    #[clap(long, env = "DEVCARDS_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

impl Global {
    pub fn settings(&self) -> Result<settings::Settings> {
        settings::Settings::from_args(&self.source)
    }
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Render the block markup through the article cache
    Render(crate::block::RenderOptions),

    /// Print each preview state while articles load (no cache)
    Preview(crate::preview::PreviewOptions),

    /// Serve the block and preview over HTTP
    Serve(crate::serve::ServeOptions),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Render(options) => crate::block::run(options, app.global).await,
        SubCommands::Preview(options) => crate::preview::run(options, app.global).await,
        SubCommands::Serve(options) => crate::serve::run(options, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
