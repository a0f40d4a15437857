use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use collab_graph::Config;
use collab_graph::network::{CachedSource, FileSource, SnapshotRequest};
use collab_graph::recommend::{Favorites, parse_directory, recommend_for};
use collab_graph::view::{NetworkView, Refresh, search_nodes};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON file overriding layout, edge style and recommendation defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Lay out a network payload and print the styled graph.
    Layout {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        include_isolated: bool,
        /// Node to focus before rendering.
        #[arg(long)]
        select: Option<String>,
    },
    /// Print the detail panel for one node.
    Details {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        node: String,
        #[arg(long)]
        include_isolated: bool,
    },
    /// Fuzzy search over node labels, affiliations and expertise.
    Search {
        #[arg(long)]
        input: PathBuf,
        query: String,
        #[arg(long, default_value_t = 20)]
        limit: usize,
        #[arg(long)]
        include_isolated: bool,
    },
    /// Recommend entities from a directory listing based on favorites.
    Recommend {
        #[arg(long)]
        people: PathBuf,
        #[arg(long)]
        favorites: PathBuf,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Edit or list the favorites store.
    Favorites {
        #[arg(long)]
        store: PathBuf,
        #[command(subcommand)]
        action: FavoritesAction,
    },
}

#[derive(Debug, Subcommand)]
enum FavoritesAction {
    List,
    Add { id: String },
    Remove { id: String },
    Toggle { id: String },
    Clear,
}

/// Printed instead of a graph so callers can tell "no data" from a failure.
#[derive(Serialize)]
struct EmptyResult {
    empty: bool,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("failed to encode output")?;
    println!("{out}");
    Ok(())
}

fn load_view(config: &Config, input: &Path, include_isolated: bool) -> Result<(NetworkView, Refresh)> {
    let mut source = CachedSource::new(FileSource::new(input));
    let mut view = NetworkView::new(config.clone());
    let request = SnapshotRequest {
        include_isolated,
        force_rebuild: false,
    };
    let outcome = view
        .refresh(&mut source, &request)
        .with_context(|| format!("failed to load network from {}", input.display()))?;
    Ok((view, outcome))
}

fn run(args: Args) -> Result<()> {
    let config = Config::load(args.config.as_deref()).context("failed to load configuration")?;

    match args.command {
        Command::Layout {
            input,
            include_isolated,
            select,
        } => {
            let (mut view, outcome) = load_view(&config, &input, include_isolated)?;
            if outcome == Refresh::Empty {
                return print_json(&EmptyResult { empty: true });
            }
            if let Some(id) = select
                && !view.activate_node(&id)
            {
                bail!("node {id} is not part of the network");
            }
            print_json(&view.render())
        }
        Command::Details {
            input,
            node,
            include_isolated,
        } => {
            let (mut view, _) = load_view(&config, &input, include_isolated)?;
            if !view.activate_node(&node) {
                bail!("node {node} is not part of the network");
            }
            match view.details() {
                Some(details) => print_json(&details),
                None => bail!("no details available for node {node}"),
            }
        }
        Command::Search {
            input,
            query,
            limit,
            include_isolated,
        } => {
            let (view, _) = load_view(&config, &input, include_isolated)?;
            print_json(&search_nodes(view.snapshot(), &query, limit))
        }
        Command::Recommend {
            people,
            favorites,
            limit,
        } => {
            let raw = fs::read_to_string(&people)
                .with_context(|| format!("failed to read directory {}", people.display()))?;
            let directory = parse_directory(&raw)
                .with_context(|| format!("failed to parse directory {}", people.display()))?;
            let favorites = Favorites::load(&favorites);
            let limit = limit.unwrap_or(config.recommend.limit);

            let results = recommend_for(&favorites, &directory, limit);
            info!(
                favorites = favorites.len(),
                candidates = directory.len(),
                results = results.len(),
                "computed recommendations"
            );
            if results.is_empty() {
                return print_json(&EmptyResult { empty: true });
            }
            print_json(&results)
        }
        Command::Favorites { store, action } => {
            let mut favorites = Favorites::load(&store);
            match action {
                FavoritesAction::List => return print_json(&favorites),
                FavoritesAction::Add { id } => {
                    favorites.add(id);
                }
                FavoritesAction::Remove { id } => {
                    favorites.remove(&id);
                }
                FavoritesAction::Toggle { id } => {
                    favorites.toggle(&id);
                }
                FavoritesAction::Clear => favorites.clear(),
            }
            favorites
                .save(&store)
                .with_context(|| format!("failed to write favorites to {}", store.display()))?;
            print_json(&favorites)
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);
    run(args)
}
