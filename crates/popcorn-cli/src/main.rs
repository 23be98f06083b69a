use clap::{ArgAction, Parser, Subcommand};
use color_eyre::eyre::eyre;
use commands::{browse, config, movies, watched, AppContext};
use popcorn_config::{Config, PathManager};

mod commands;
mod logging;
mod output;
mod render;

#[derive(Parser)]
#[command(name = "popcorn")]
#[command(about = "usePopcorn - search movies and keep a list of what you watched")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search movies by title
    #[command(long_about = "Search the movie database by title. Queries shorter than the configured minimum (3 characters by default) are not sent.")]
    Search {
        /// Words of the title to search for
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Show details for one movie
    Show {
        /// IMDb id, e.g. tt1375666
        id: String,
    },
    /// Rate a movie and add it to your watched list
    Add {
        /// IMDb id, e.g. tt1375666
        id: String,

        /// Your rating from 1 to 10
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=10))]
        rating: u8,
    },
    /// Show your watched list and its summary
    Watched,
    /// Remove a movie from your watched list
    Remove {
        /// IMDb id of the entry to remove
        id: String,

        /// Do not ask for confirmation
        #[arg(short, long, action = ArgAction::SetTrue)]
        yes: bool,
    },
    /// Interactive search session
    #[command(long_about = "Start an interactive session: every line you type becomes the new search query, and only the latest query's results are shown. Open a result, rate it, and add it to your watched list without leaving the session.")]
    Browse,
    /// View or change configuration
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration (masks the API key)
    Show {
        /// Show the API key unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
    /// Save the OMDb API key to the config file
    SetApiKey {
        /// API key (if not provided, will prompt)
        #[arg(long)]
        key: Option<String>,
    },
    /// Print the config and data file locations
    Path,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let paths = PathManager::default();
    let loaded = Config::load_or_default(&paths.config_file());

    // Logging comes up before a bad config file is reported.
    let (level, log_file) = match &loaded {
        Ok(config) => (config.logging.level.clone(), config.logging.file.clone()),
        Err(_) => (None, None),
    };
    logging::init_logging(cli.verbose, cli.quiet, level.as_deref(), log_file.as_deref())
        .map_err(|e| eyre!("{}", e))?;

    let config = loaded.map_err(|e| eyre!("{}", e))?;
    let ctx = AppContext::new(paths, config);
    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Search { query } => movies::run_search(&ctx, &query.join(" "), &output).await,
        Commands::Show { id } => movies::run_show(&ctx, &id, &output).await,
        Commands::Add { id, rating } => movies::run_add(&ctx, &id, rating, &output).await,
        Commands::Watched => watched::run_watched(&ctx, &output).await,
        Commands::Remove { id, yes } => watched::run_remove(&ctx, &id, yes, &output).await,
        Commands::Browse => browse::run_browse(&ctx, &output).await,
        Commands::Config { cmd } => config::run_config(&ctx, cmd, &output).await,
    }
}
