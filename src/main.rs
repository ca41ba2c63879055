use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use podbook::feed::rss;
use podbook::model::BookId;
use podbook::tags::{LoftyTagReader, NullTagReader, TagReader};
use podbook::validation::validate_export;
use podbook::{ExportPipeline, Library, LibraryConfig, ListingOrder};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "podbook")]
#[command(about = "Publish a directory of audiobooks as podcast feeds", long_about = None)]
struct Args {
    /// Books directory, laid out as author/title/track
    #[arg(short = 'b', long, env = "BOOKS_DIRECTORY", default_value = "books")]
    books_directory: String,

    /// Namespace for book ids; set it to keep feed URLs stable across runs
    #[arg(long, env = "UUID_NAMESPACE")]
    namespace: Option<Uuid>,

    /// Prefix for feed and media URLs (e.g. https://books.example.org)
    #[arg(long, env = "BASE_URL", default_value = "")]
    base_url: String,

    /// Audio extensions to include (repeat the flag, or comma-separate)
    #[arg(
        long = "format",
        env = "AUDIO_FORMATS",
        value_delimiter = ',',
        default_values = ["mp3", "m4b"]
    )]
    formats: Vec<String>,

    /// Sort directory listings by name instead of filesystem order
    #[arg(long, env = "SORTED_LISTING")]
    sorted: bool,

    /// Minimum seconds between two id cache rescans
    #[arg(long, env = "REBUILD_COOLDOWN")]
    rebuild_cooldown: Option<u64>,

    /// Ignore audio tags (order and name episodes by file)
    #[arg(long)]
    no_tags: bool,

    /// Verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List books grouped by author
    List {
        /// Print the books-by-author JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print the id of a book
    Id { author: String, title: String },

    /// Print the book behind an id
    Resolve { id: String },

    /// Render the feed of a book
    Feed {
        id: String,

        /// Write to a file instead of stdout
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },

    /// Export every feed and the listing as a static site
    Export {
        /// Target directory
        #[arg(short = 'o', long)]
        output: PathBuf,

        /// Skip post-export validation
        #[arg(long)]
        no_validate: bool,
    },

    /// Validate an existing export
    Validate {
        #[arg(short = 'o', long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = build_config(&args);

    if args.no_tags {
        run(args.command, Library::new(config, NullTagReader::new()))
    } else {
        run(args.command, Library::new(config, LoftyTagReader::new()))
    }
}

fn build_config(args: &Args) -> LibraryConfig {
    // Expand ~ in paths
    let root = shellexpand::tilde(&args.books_directory);

    let mut config = LibraryConfig::new(PathBuf::from(root.as_ref()))
        .with_formats(&args.formats)
        .with_base_url(&args.base_url);

    match args.namespace {
        Some(namespace) => config = config.with_namespace(namespace),
        None => log::warn!(
            "UUID_NAMESPACE not set, using {}; book ids will change on restart",
            config.namespace
        ),
    }
    if args.sorted {
        config = config.with_listing_order(ListingOrder::Lexical);
    }
    if let Some(secs) = args.rebuild_cooldown {
        config = config.with_rebuild_cooldown(Duration::from_secs(secs));
    }

    log::debug!("Configuration: {:?}", config);
    config
}

fn run<R: TagReader>(command: Command, library: Library<R>) -> Result<()> {
    match command {
        Command::List { json } => {
            let listing = library.listing();
            if json {
                println!("{}", serde_json::to_string_pretty(listing)?);
            } else {
                for shelf in listing.shelves() {
                    println!("{}", shelf.author);
                    for book in &shelf.books {
                        println!("  {}  {}", book.uuid, book.title);
                    }
                }
            }
        }

        Command::Id { author, title } => {
            println!("{}", library.book_id(&author, &title));
        }

        Command::Resolve { id } => {
            let book = library.resolve(id.parse::<BookId>()?)?;
            println!("{}\t{}", book.author, book.title);
        }

        Command::Feed { id, output } => {
            let feed = library.feed(id.parse::<BookId>()?)?;
            let xml = rss::render(&feed)?;
            match output {
                Some(path) => {
                    fs::write(&path, xml).with_context(|| format!("Failed to write {:?}", path))?;
                    log::info!("Wrote {} episodes to {:?}", feed.entries.len(), path);
                }
                None => print!("{}", xml),
            }
        }

        Command::Export {
            output,
            no_validate,
        } => {
            log::info!("Loading library from {:?}", library.config().root);
            let pipeline = ExportPipeline::new(output.clone());
            pipeline.export(&library)?;

            if !no_validate {
                log::info!("Running post-export validation...");
                validate_export(&output)?;
                log::info!("Validation passed");
            }
        }

        Command::Validate { output } => {
            validate_export(&output)?;
            log::info!("Validation passed");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn env_of(id: &str) -> Option<String> {
        Args::command()
            .get_arguments()
            .find(|arg| arg.get_id() == id)
            .and_then(|arg| arg.get_env())
            .map(|env| env.to_string_lossy().into_owned())
    }

    #[test]
    fn test_every_config_flag_reads_env() {
        assert_eq!(env_of("books_directory").as_deref(), Some("BOOKS_DIRECTORY"));
        assert_eq!(env_of("namespace").as_deref(), Some("UUID_NAMESPACE"));
        assert_eq!(env_of("base_url").as_deref(), Some("BASE_URL"));
        assert_eq!(env_of("formats").as_deref(), Some("AUDIO_FORMATS"));
        assert_eq!(env_of("sorted").as_deref(), Some("SORTED_LISTING"));
        assert_eq!(env_of("rebuild_cooldown").as_deref(), Some("REBUILD_COOLDOWN"));
    }

    #[test]
    fn test_build_config_from_flags() {
        let args = Args::try_parse_from([
            "podbook",
            "--books-directory",
            "/srv/books",
            "--format",
            "ogg,FLAC",
            "--sorted",
            "--rebuild-cooldown",
            "30",
            "list",
        ])
        .unwrap();
        let config = build_config(&args);

        assert_eq!(config.root, PathBuf::from("/srv/books"));
        assert_eq!(config.formats, vec!["ogg", "flac"]);
        assert_eq!(config.listing_order, ListingOrder::Lexical);
        assert_eq!(config.rebuild_cooldown, Some(Duration::from_secs(30)));
    }
}
