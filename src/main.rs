use std::sync::Arc;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use spotcli::{
    cli::{self, PlayerAction, PlayerSettings},
    config::{self, AppConfig},
    error, logging, warning,
};

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
    /// Connect spotcli to your Spotify account
    Connect,

    /// Show and control playback
    Player(PlayerOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
#[command(
    about = "Show and control playback",
    args_conflicts_with_subcommands = true // display flags only apply without a subcommand
)]
pub struct PlayerOptions {
    /// Print the current track on a single line
    #[clap(short, long)]
    pub oneline: bool,

    /// Hide the progress in one-line mode
    #[clap(long)]
    pub no_progress: bool,

    /// Scroll the one-line output if it is wider than n characters
    #[clap(short, long, default_value_t = 0)]
    pub scroll: usize,

    /// Playback commands (e.g., `toggle`)
    #[command(subcommand)]
    pub command: Option<PlayerSubcommand>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum PlayerSubcommand {
    /// Resume playback
    Play,
    /// Pause playback
    Pause,
    /// Skip to the next track
    Next,
    /// Go back to the previous track
    Previous,
    /// Pause if playing, resume otherwise
    Toggle,
    /// Flip the shuffle state
    Shuffle,
}

impl From<PlayerSubcommand> for PlayerAction {
    fn from(cmd: PlayerSubcommand) -> Self {
        match cmd {
            PlayerSubcommand::Play => PlayerAction::Play,
            PlayerSubcommand::Pause => PlayerAction::Pause,
            PlayerSubcommand::Next => PlayerAction::Next,
            PlayerSubcommand::Previous => PlayerAction::Previous,
            PlayerSubcommand::Toggle => PlayerAction::Toggle,
            PlayerSubcommand::Shuffle => PlayerAction::Shuffle,
        }
    }
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

    if let Command::Completions(opt) = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    if let Err(e) = logging::init_logging() {
        warning!("Logging disabled. Err: {}", e);
    }

    let config = match AppConfig::from_env() {
        Ok(c) => Arc::new(c),
        Err(e) => error!("Invalid configuration. Err: {}", e),
    };
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "spotcli starting");

    match cli.command {
        Command::Connect => cli::connect(config).await,
        Command::Player(opt) => match opt.command {
            Some(action) => cli::control(config, action.into()).await,
            None => {
                let settings = PlayerSettings {
                    oneline: opt.oneline,
                    show_progress: !opt.no_progress,
                    scroll: opt.scroll,
                };
                cli::player(config, settings).await
            }
        },
        Command::Completions(_) => {}
    }
}
