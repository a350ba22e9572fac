use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use decksmith::{config, Decksmith};

/// Build Magic: The Gathering decks from the Scryfall database.
#[derive(Parser, Debug)]
#[command(name = "decksmith", version, about)]
struct Args {
    /// Deck store file (defaults to the platform data directory)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Scryfall API base URL
    #[arg(long, global = true, default_value = config::API_BASE)]
    api_base: String,

    /// HTTP timeout in seconds
    #[arg(long, global = true, default_value_t = 30)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search for cards
    Search {
        query: String,
        /// Result pages to fetch
        #[arg(long, default_value_t = 1)]
        pages: usize,
    },
    /// Import a deck list file
    Import {
        file: PathBuf,
        /// Save the imported deck under this name
        #[arg(long)]
        save: Option<String>,
    },
    /// Export a saved deck to decklist.txt
    Export {
        name: String,
        /// Directory to write decklist.txt into
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// List saved decks
    List,
    /// Print a saved deck as a deck list
    Show { name: String },
    /// Add a printing to a saved deck, creating the deck if needed
    Add {
        deck: String,
        set: String,
        number: String,
        #[arg(
            long,
            default_value_t = 1,
            value_parser = clap::value_parser!(u32).range(1..=config::MAX_COPIES_PER_LINE as i64)
        )]
        count: u32,
    },
    /// Remove the entry at a position (0-based) from a saved deck
    Remove { deck: String, index: usize },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();

    let pages = match &args.command {
        Command::Search { pages, .. } => *pages,
        _ => config::DEFAULT_MAX_SEARCH_PAGES,
    };
    let mut builder = Decksmith::builder()
        .api_base(&args.api_base)
        .timeout(Duration::from_secs(args.timeout_secs))
        .max_search_pages(pages);
    if let Some(store) = &args.store {
        builder = builder.store_path(store);
    }
    let mut ds = builder.build().context("failed to initialise decksmith")?;

    match args.command {
        Command::Search { query, .. } => {
            let results = ds
                .search(&query)
                .await
                .with_context(|| format!("no results for {:?}", query))?;
            for (i, card) in results.iter().enumerate() {
                println!(
                    "{:>3}  {} ({}) {}",
                    i,
                    card.name,
                    card.set_code(),
                    card.collector_number
                );
            }
        }
        Command::Import { file, save } => {
            let text = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("reading {}", file.display()))?;
            let report = ds.import(&text).await;
            for warning in &report.warnings {
                eprintln!("warning: {}", warning);
            }
            for diagnostic in &report.diagnostics {
                eprintln!("{}", diagnostic);
            }
            eprintln!(
                "imported {} cards ({} lines skipped)",
                ds.deck().len(),
                report.diagnostics.len()
            );
            match save {
                Some(name) => ds.save(&name).with_context(|| format!("saving {:?}", name))?,
                None => println!("{}", ds.export()),
            }
        }
        Command::Export { name, out } => {
            load_existing(&mut ds, &name)?;
            let path = ds.export_to_file(&out)?;
            println!("{}", path.display());
        }
        Command::List => {
            for name in ds.saved_decks()? {
                println!("{}", name);
            }
        }
        Command::Show { name } => {
            load_existing(&mut ds, &name)?;
            println!("{}", ds.export());
        }
        Command::Add {
            deck,
            set,
            number,
            count,
        } => {
            ds.load(&deck)?;
            let card = ds
                .lookup()
                .card_by_set_number(&set.to_lowercase(), &number)
                .await
                .with_context(|| format!("looking up ({}) {}", set.to_uppercase(), number))?;
            ds.add_copies(&card, count)?;
            ds.save(&deck)?;
            println!("{} x {} -> {} ({} cards)", count, card.name, deck, ds.deck().len());
        }
        Command::Remove { deck, index } => {
            load_existing(&mut ds, &deck)?;
            let Some(card) = ds.remove_from_deck(index) else {
                bail!("deck {:?} has no entry {} ({} cards)", deck, index, ds.deck().len());
            };
            ds.save(&deck)?;
            println!("removed {} ({}) {}", card.name, card.set_code(), card.collector_number);
        }
    }

    Ok(())
}

fn load_existing(ds: &mut Decksmith, name: &str) -> anyhow::Result<()> {
    if !ds.load(name)? {
        bail!("no saved deck named {:?}", name);
    }
    Ok(())
}
