use anyhow::{Result, anyhow};
use clap::Args;
use edhrec::{Budget, EdhRec};

#[derive(Args)]
pub struct AverageDeckArgs {
    /// Commander to look up
    name: String,

    /// "budget" or "expensive" version of the deck
    #[arg(short, long, value_parser = str::parse::<Budget>)]
    budget: Option<Budget>,
}

pub(crate) fn run_average(args: AverageDeckArgs, client: &EdhRec, json: bool) -> Result<()> {
    let deck = client.get_commanders_average_deck(&args.name, args.budget)?;

    if json {
        crate::print_json(&deck)
    } else {
        print!("{deck}");
        Ok(())
    }
}

#[derive(Args)]
pub struct DecksArgs {
    /// Commander to look up
    name: String,

    /// "budget" or "expensive" decks only
    #[arg(short, long, value_parser = str::parse::<Budget>)]
    budget: Option<Budget>,
}

pub(crate) fn run_decks(args: DecksArgs, client: &EdhRec) -> Result<()> {
    let decks = client
        .get_commander_decks(&args.name, args.budget)?
        .ok_or_else(|| anyhow!("No decks found for \"{}\".", args.name))?;

    crate::print_json(&decks)
}
