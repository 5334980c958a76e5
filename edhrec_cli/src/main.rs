use anyhow::Result;
use clap::{Parser, Subcommand};
use edhrec::{ClientOptions, EdhRec};
use tracing_subscriber::EnvFilter;

mod card;
mod commander;
mod deck;

#[derive(Parser)]
#[command(author, version)]
struct Cli {
    /// EDHREC `userState` session cookie, with or without the `userState=` prefix.
    #[arg(long, global = true, env = "EDHREC_COOKIE", hide_env_values = true)]
    cookie: Option<String>,

    /// Print raw JSON instead of formatted text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get the recommended cards for a commander.
    ///
    /// Make sure the commander's name is surrounded by quotation marks if it includes spaces or non-letter characters.
    /// For example, "Atraxa, Praetors' Voice".
    Commander(commander::CommanderArgs),

    /// Get the combos listed for a card.
    Combos(commander::CombosArgs),

    /// Get a commander's average deck.
    AverageDeck(deck::AverageDeckArgs),

    /// Get the deck lists page for a commander.
    Decks(deck::DecksArgs),

    /// Get EDHREC's data for a single card.
    Card(card::CardArgs),

    /// Look up several cards at once.
    Cards(card::CardsArgs),

    /// Print the link to a card's EDHREC page.
    Link(card::LinkArgs),

    #[clap(hide = true)]
    BuildId,
}

pub(crate) fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn run() -> Result<()> {
    let args = Cli::parse();

    let mut opts = ClientOptions::default();
    if let Some(cookie) = args.cookie {
        opts = opts.with_cookie(cookie);
    }
    let client = EdhRec::with_options(opts);
    let json = args.json;

    match args.command {
        Commands::Commander(args) => commander::run(args, &client, json)?,
        Commands::Combos(args) => commander::run_combos(args, &client)?,
        Commands::AverageDeck(args) => deck::run_average(args, &client, json)?,
        Commands::Decks(args) => deck::run_decks(args, &client)?,
        Commands::Card(args) => card::run(args, &client)?,
        Commands::Cards(args) => card::run_batch(args, &client)?,
        Commands::Link(args) => card::run_link(args, &client),
        Commands::BuildId => println!("{}", client.build_id()),
    }

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Encountered error: {e:#}");
        std::process::exit(1)
    }
}
