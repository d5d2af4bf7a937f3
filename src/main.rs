use clap::{
    ArgAction, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use spotinsights::{cli, config, error, types::TimeRange, utils};

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
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    /// Print debug diagnostics to stderr (overrides RUST_LOG)
    #[clap(long, short, global = true)]
    verbose: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Log in with your Spotify account
    Auth,

    /// Remove the stored Spotify tokens
    Logout,

    /// Show the authentication state
    Status,

    /// Your most played tracks
    Tracks(RangeOptions),

    /// Your most played artists
    Artists(RangeOptions),

    /// Details of a single track
    Track(IdOption),

    /// Details and top tracks of an artist
    Artist(ArtistOptions),

    /// New albums and singles featured by Spotify
    Releases(ReleasesOptions),

    /// Track recommendations from artist, track and genre seeds
    Recommend(RecommendOptions),

    /// Genres available as recommendation seeds
    Genres,

    /// Listening statistics from Last.fm
    Stats(StatsOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct RangeOptions {
    /// Statistical window: short (4 weeks), medium (6 months) or long (all time)
    #[clap(long, short, default_value = "medium", value_parser = utils::parse_time_range)]
    pub time_range: TimeRange,

    /// Ignore the cache and fetch from Spotify
    #[clap(long)]
    pub refresh: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct IdOption {
    /// Spotify id
    pub id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct ArtistOptions {
    /// Spotify artist id
    pub id: String,

    /// Market (ISO 3166-1 alpha-2) for the artist's top tracks
    #[clap(long)]
    pub market: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct ReleasesOptions {
    /// Country (ISO 3166-1 alpha-2) to list releases for
    #[clap(long)]
    pub country: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct RecommendOptions {
    /// Seed genre; can be repeated (at most 5 seeds in total)
    #[clap(long = "genre", action = ArgAction::Append)]
    pub genres: Vec<String>,

    /// Seed artist id; can be repeated
    #[clap(long = "seed-artist", action = ArgAction::Append)]
    pub seed_artists: Vec<String>,

    /// Seed track id; can be repeated
    #[clap(long = "seed-track", action = ArgAction::Append)]
    pub seed_tracks: Vec<String>,

    /// Number of tracks (1-100)
    #[clap(long)]
    pub limit: Option<u32>,

    #[clap(long)]
    pub min_popularity: Option<u32>,

    #[clap(long)]
    pub max_popularity: Option<u32>,

    #[clap(long)]
    pub target_popularity: Option<u32>,
}

#[derive(Parser, Debug, Clone)]
pub struct StatsOptions {
    #[command(subcommand)]
    pub command: StatsSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum StatsSubcommand {
    /// The ten most used Last.fm tags
    Tags,

    /// Scrobbles per day among the most recent ones
    Plays {
        /// Last.fm user name (defaults to LASTFM_USER)
        #[clap(long)]
        user: Option<String>,
    },

    /// Last.fm information about an artist
    Artist {
        /// Artist name
        name: String,
    },
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("spotinsights=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    match cli.command {
        Command::Auth => cli::auth().await,
        Command::Logout => cli::logout().await,
        Command::Status => cli::status().await,
        Command::Tracks(opt) => cli::tracks(opt.time_range, opt.refresh).await,
        Command::Artists(opt) => cli::artists(opt.time_range, opt.refresh).await,
        Command::Track(opt) => cli::track(opt.id).await,
        Command::Artist(opt) => cli::artist(opt.id, opt.market).await,
        Command::Releases(opt) => cli::releases(opt.country).await,
        Command::Recommend(opt) => {
            cli::recommend(cli::RecommendOptions {
                genres: opt.genres,
                seed_artists: opt.seed_artists,
                seed_tracks: opt.seed_tracks,
                limit: opt.limit,
                min_popularity: opt.min_popularity,
                max_popularity: opt.max_popularity,
                target_popularity: opt.target_popularity,
            })
            .await
        }
        Command::Genres => cli::genres().await,
        Command::Stats(opt) => match opt.command {
            StatsSubcommand::Tags => cli::stats_tags().await,
            StatsSubcommand::Plays { user } => cli::stats_plays(user).await,
            StatsSubcommand::Artist { name } => cli::stats_artist(name).await,
        },
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
