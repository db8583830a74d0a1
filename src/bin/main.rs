use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use movie_finder::config::Config;
use movie_finder::ServerError;

#[derive(Parser, Debug)]
#[command(name = "movie-finder")]
#[command(about = "Movie discovery server backed by TMDB", long_about = None)]
struct Args {
    #[arg(short, long, default_value = "movie-finder.yaml")]
    config: String,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Search movies by title
    Search { query: String },
    /// List most-watched movies
    Browse {
        #[arg(long)]
        year: Option<i32>,
        /// Genre name or id
        #[arg(long)]
        genre: Option<String>,
        /// Minimum vote average
        #[arg(long)]
        score: Option<f64>,
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Manage favorites
    Favorites {
        #[command(subcommand)]
        command: FavoritesCommand,
    },
}

#[derive(Subcommand, Debug)]
enum FavoritesCommand {
    List,
    Toggle { id: i64 },
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let default_filter = if args.debug {
        "movie_finder=debug,tower_http=debug"
    } else {
        "movie_finder=info,tower_http=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = dispatch(args).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn dispatch(args: Args) -> Result<(), ServerError> {
    let command = match args.command {
        None | Some(Command::Serve) => return movie_finder::run(&args.config, args.debug).await,
        Some(command) => command,
    };

    let config = Config::load(&args.config)?;
    match command {
        Command::Search { query } => movie_finder::cli::search(&config, &query).await,
        Command::Browse {
            year,
            genre,
            score,
            pages,
        } => {
            let filter = movie_finder::cli::browse_filter(year, genre.as_deref(), score)?;
            movie_finder::cli::browse(&config, filter, pages.max(1)).await
        }
        Command::Favorites { command } => match command {
            FavoritesCommand::List => movie_finder::cli::list_favorites(&config).await,
            FavoritesCommand::Toggle { id } => movie_finder::cli::toggle_favorite(&config, id).await,
        },
        Command::Serve => movie_finder::run(&args.config, args.debug).await,
    }
}
