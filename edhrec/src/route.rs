use crate::helpers::format_card_name;
use anyhow::anyhow;
use itertools::Itertools;
use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

/// Price qualifier for the deck pages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Budget {
    Budget,
    Expensive,
}
impl Budget {
    pub const ALL: [Self; 2] = [Self::Budget, Self::Expensive];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Budget => "budget",
            Self::Expensive => "expensive",
        }
    }
}
impl Display for Budget {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
impl FromStr for Budget {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "budget" | "cheap" | "b" => Ok(Self::Budget),
            "expensive" | "e" => Ok(Self::Expensive),
            _ => Err(anyhow!(
                "Unknown budget \"{s}\". Expected one of: {}",
                Self::ALL.iter().join(", ")
            )),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Endpoint {
    Commanders,
    Combos,
    AverageDecks,
    Decks,
}
impl Endpoint {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Commanders => "commanders",
            Self::Combos => "combos",
            Self::AverageDecks => "average-decks",
            Self::Decks => "decks",
        }
    }
}

pub(crate) type Query = Vec<(&'static str, String)>;

/// One request against the site's build-versioned `/_next/data` tree.
pub(crate) struct NextRoute<'a> {
    endpoint: Endpoint,
    card_name: &'a str,
    theme: Option<&'a str>,
    budget: Option<Budget>,
    filter: Option<&'a str>,
}

impl<'a> NextRoute<'a> {
    pub const fn new(endpoint: Endpoint, card_name: &'a str) -> Self {
        Self { endpoint, card_name, theme: None, budget: None, filter: None }
    }
    pub const fn with_theme(self, theme: Option<&'a str>) -> Self {
        Self { theme, ..self }
    }
    pub const fn with_budget(self, budget: Option<Budget>) -> Self {
        Self { budget, ..self }
    }
    pub const fn with_filter(self, filter: Option<&'a str>) -> Self {
        Self { filter, ..self }
    }

    pub fn build(&self, base_url: &str, build_id: &str) -> (String, Query) {
        let slug = format_card_name(self.card_name);

        let mut uri = format!("{base_url}/_next/data/{build_id}/{}/{slug}", self.endpoint.as_str());
        let mut query: Query = vec![("commanderName", slug.clone())];

        if let Some(theme) = self.theme {
            uri.push('/');
            uri.push_str(theme);
            if self.budget.is_none() {
                query.push(("themeName", theme.to_owned()));
            }
        }

        match self.budget {
            Some(budget) => {
                uri.push_str(&format!("/{budget}.json"));
                query.push(("themeName", budget.to_string()));
            }
            None => uri.push_str(".json"),
        }

        if self.endpoint == Endpoint::Combos {
            query.push(("colors", slug));
        }

        if let Some(filter) = self.filter {
            query.push(("f", filter.to_owned()));
        }

        (uri, query)
    }
}
