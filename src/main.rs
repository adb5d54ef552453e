use std::sync::Arc;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use sporeccli::{cli, config, error, types::PkceToken};
use tokio::sync::Mutex;

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API
    Auth,

    /// List your saved tracks
    Tracks(TracksOptions),

    /// Recommend tracks similar to a song from your library
    Recommend(RecommendOptions),

    /// Some helper information about your account and library
    Info(InfoOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct TracksOptions {
    /// Maximum number of saved tracks to fetch
    #[clap(long)]
    pub limit: Option<u32>,
}

#[derive(Parser, Debug, Clone)]
pub struct RecommendOptions {
    /// Name of a song from your library to recommend from
    #[clap(long)]
    pub song: String,

    /// Number of recommendations to return
    #[clap(long)]
    pub top: Option<usize>,

    /// Maximum number of saved tracks to consider
    #[clap(long)]
    pub limit: Option<u32>,

    /// Track ids per audio-features request (1-100)
    #[clap(long)]
    pub chunk_size: Option<usize>,
}

#[derive(Parser, Debug, Clone)]
pub struct InfoOptions {
    /// Show the authenticated user's profile
    #[clap(long)]
    me: bool,

    /// Show the saved-track count
    #[clap(long)]
    library: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth => {
            let oauth_result: Arc<Mutex<Option<PkceToken>>> = Arc::new(Mutex::new(None));
            cli::auth(Arc::clone(&oauth_result)).await;
        }
        Command::Tracks(opt) => cli::list_tracks(opt.limit).await,
        Command::Recommend(opt) => {
            cli::recommend(opt.song, opt.top, opt.limit, opt.chunk_size).await
        }
        Command::Info(opt) => cli::info(opt.me, opt.library).await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
