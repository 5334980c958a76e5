use crate::{
    route::{Budget, Endpoint, NextRoute},
    EdhRec, Transport,
};
use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use serde_json::Value;
use std::fmt::{self, Display, Formatter};

/// A commander's average deck.
///
/// `decklist` is the page's `deck` entry exactly as the site sent it,
/// usually a list of lines like `"1 Sol Ring"`. It is `None` when the page
/// has no deck.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AverageDeck {
    pub commander: String,
    pub decklist: Option<Value>,
}

impl AverageDeck {
    fn from_page(commander: &str, data: Option<Value>) -> Self {
        let decklist = data
            .and_then(|mut d| d.get_mut("deck").map(Value::take))
            .filter(|deck| !deck.is_null());

        Self { commander: commander.to_owned(), decklist }
    }
}

impl Display for AverageDeck {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "\t{}", self.commander.bold())?;
        match &self.decklist {
            Some(Value::Array(lines)) => {
                for line in lines {
                    match line.as_str() {
                        Some(line) => writeln!(f, "{line}")?,
                        None => writeln!(f, "{line}")?,
                    }
                }
            }
            Some(other) => writeln!(f, "{other}")?,
            None => writeln!(f, "{}", "No average deck available.".italic())?,
        }
        Ok(())
    }
}

impl<T: Transport> EdhRec<T> {
    pub fn get_commanders_average_deck(&self, card_name: &str, budget: Option<Budget>) -> Result<AverageDeck> {
        let key = (card_name.to_owned(), budget);

        self.caches.average_deck.get_or_try_insert(key, || {
            let route = NextRoute::new(Endpoint::AverageDecks, card_name).with_budget(budget);
            let data = self.get_page_data(&route)?;

            Ok(AverageDeck::from_page(card_name, data))
        })
    }

    /// The unwrapped deck-list page for a commander.
    pub fn get_commander_decks(&self, card_name: &str, budget: Option<Budget>) -> Result<Option<Value>> {
        let key = (card_name.to_owned(), budget);

        self.caches.decks.get_or_try_insert(key, || {
            let route = NextRoute::new(Endpoint::Decks, card_name).with_budget(budget);
            self.get_page_data(&route)
        })
    }
}

#[cfg(test)]
mod deck_tests {
    use super::*;
    use crate::{
        test_utils::{data_uri, envelope, home_page, FakeTransport},
        ClientOptions, BASE_URL,
    };
    use serde_json::json;

    const BUILD: &str = "deck-build";

    #[test]
    fn test_average_deck() -> Result<()> {
        let transport = FakeTransport::new()
            .with_response(BASE_URL, home_page(BUILD))
            .with_json(
                &data_uri(BUILD, "average-decks/krenko-mob-boss/budget"),
                &envelope(json!({ "deck": ["1 Krenko, Mob Boss", "1 Skullclamp", "30 Mountain"] })),
            );
        let client = EdhRec::with_transport(transport, ClientOptions::default());

        let deck = client.get_commanders_average_deck("Krenko, Mob Boss", Some(Budget::Budget))?;
        assert_eq!(deck.commander, "Krenko, Mob Boss");
        assert_eq!(deck.decklist.as_ref().and_then(Value::as_array).map(Vec::len), Some(3));

        client.get_commanders_average_deck("Krenko, Mob Boss", Some(Budget::Budget))?;
        let uri = data_uri(BUILD, "average-decks/krenko-mob-boss/budget");
        assert_eq!(client.transport().count(&uri), 1);

        let calls = client.transport().calls();
        assert!(calls.iter().any(|c| c.uri == uri && c.query.contains(&("themeName", "budget".to_owned()))));
        Ok(())
    }

    #[test]
    fn test_average_deck_without_deck() {
        let deck = AverageDeck::from_page("Krenko, Mob Boss", Some(json!({ "cards": [] })));
        assert_eq!(deck.decklist, None);

        let deck = AverageDeck::from_page("Krenko, Mob Boss", None);
        assert_eq!(deck, AverageDeck { commander: "Krenko, Mob Boss".into(), decklist: None });

        let deck = AverageDeck::from_page("Krenko, Mob Boss", Some(json!({ "deck": null })));
        assert_eq!(deck.decklist, None);
    }

    #[test]
    fn test_average_deck_shape_is_kept() {
        let deck = AverageDeck::from_page("Krenko, Mob Boss", Some(json!({ "deck": "garbled" })));
        assert_eq!(deck.decklist, Some(json!("garbled")));

        let entries = json!([{ "name": "Sol Ring", "count": 1 }, "1 Skullclamp"]);
        let deck = AverageDeck::from_page("Krenko, Mob Boss", Some(json!({ "deck": entries.clone() })));
        assert_eq!(deck.decklist, Some(entries));

        colored::control::set_override(false);
        assert_eq!(
            deck.to_string(),
            "\tKrenko, Mob Boss\n{\"count\":1,\"name\":\"Sol Ring\"}\n1 Skullclamp\n"
        );
    }

    #[test]
    fn test_commander_decks_cached_per_budget() -> Result<()> {
        let transport = FakeTransport::new()
            .with_response(BASE_URL, home_page(BUILD))
            .with_json(&data_uri(BUILD, "decks/krenko-mob-boss"), &envelope(json!({ "table": [] })))
            .with_json(&data_uri(BUILD, "decks/krenko-mob-boss/expensive"), &envelope(json!({ "table": [1] })));
        let client = EdhRec::with_transport(transport, ClientOptions::default());

        assert_eq!(client.get_commander_decks("Krenko, Mob Boss", None)?, Some(json!({ "table": [] })));
        assert_eq!(
            client.get_commander_decks("Krenko, Mob Boss", Some(Budget::Expensive))?,
            Some(json!({ "table": [1] }))
        );
        client.get_commander_decks("Krenko, Mob Boss", None)?;
        client.get_commander_decks("Krenko, Mob Boss", Some(Budget::Expensive))?;

        assert_eq!(client.transport().count(&data_uri(BUILD, "decks/krenko-mob-boss")), 1);
        assert_eq!(client.transport().count(&data_uri(BUILD, "decks/krenko-mob-boss/expensive")), 1);
        Ok(())
    }
}
