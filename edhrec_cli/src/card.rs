use anyhow::Result;
use clap::Args;
use edhrec::EdhRec;

#[derive(Args)]
pub(crate) struct CardArgs {
    /// Card to look up
    name: String,
}

pub(crate) fn run(args: CardArgs, client: &EdhRec) -> Result<()> {
    let details = client.get_card_details(&args.name)?;
    crate::print_json(&details)
}

#[derive(Args)]
pub(crate) struct CardsArgs {
    /// Exact card names
    #[arg(required = true)]
    names: Vec<String>,
}

pub(crate) fn run_batch(args: CardsArgs, client: &EdhRec) -> Result<()> {
    let cards = client.get_card_list(&args.names)?;
    crate::print_json(&cards)
}

#[derive(Args)]
pub(crate) struct LinkArgs {
    /// Card to link to
    name: String,
}

pub(crate) fn run_link(args: LinkArgs, client: &EdhRec) {
    println!("{}", client.get_card_link(&args.name));
}
