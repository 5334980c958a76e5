use anyhow::{Result, anyhow};
use clap::Args;
use edhrec::{CardList, EdhRec, Tag};

#[derive(Args)]
pub struct CommanderArgs {
    /// Commander to look up
    name: String,

    /// Only show one card group, e.g. "topcards", "creatures", "manaartifacts"
    #[arg(short, long, value_parser = str::parse::<Tag>)]
    tag: Option<Tag>,

    /// Free-form filter passed through to EDHREC
    #[arg(short, long)]
    filter: Option<String>,

    /// Look at one of the commander's theme pages instead
    #[arg(short = 'T', long)]
    theme: Option<String>,

    /// Print card links.
    #[arg(short, long)]
    links: bool,
}

pub(crate) fn run(args: CommanderArgs, client: &EdhRec, json: bool) -> Result<()> {
    let lists = match &args.theme {
        Some(theme) => {
            let data = client.get_commander_theme_data(&args.name, theme, args.filter.as_deref())?;
            CardList::from_commander_data(data, args.tag)
        }
        None => client.get_card_lists(&args.name, args.tag, args.filter.as_deref())?,
    };

    if lists.is_empty() {
        return Err(anyhow!("No cards found for \"{}\". Check your spelling.", args.name));
    }

    if json {
        crate::print_json(&lists)
    } else {
        if args.links {
            print!("{lists:#}");
        } else {
            print!("{lists}");
        }
        Ok(())
    }
}

#[derive(Args)]
pub struct CombosArgs {
    /// Card to look up
    name: String,
}

pub(crate) fn run_combos(args: CombosArgs, client: &EdhRec) -> Result<()> {
    let combos = client
        .get_card_combos(&args.name)?
        .ok_or_else(|| anyhow!("No combos found for \"{}\".", args.name))?;

    crate::print_json(&combos)
}
