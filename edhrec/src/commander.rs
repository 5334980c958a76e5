use crate::{
    route::{Endpoint, NextRoute},
    EdhRec, Transport,
};
use anyhow::{anyhow, Result};
use colored::Colorize;
use itertools::Itertools;
use serde::{ser::SerializeMap, Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};
use unicode_width::UnicodeWidthStr;

// ====================
// Tags
// ====================

/// The card groups on a commander page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tag {
    NewCards,
    HighSynergyCards,
    TopCards,
    Creatures,
    Instants,
    Sorceries,
    UtilityArtifacts,
    ManaArtifacts,
    Enchantments,
    Battles,
    Planeswalkers,
    Lands,
    UtilityLands,
}

impl Tag {
    pub const ALL: [Self; 13] = [
        Self::NewCards,
        Self::HighSynergyCards,
        Self::TopCards,
        Self::Creatures,
        Self::Instants,
        Self::Sorceries,
        Self::UtilityArtifacts,
        Self::ManaArtifacts,
        Self::Enchantments,
        Self::Battles,
        Self::Planeswalkers,
        Self::Lands,
        Self::UtilityLands,
    ];

    /// The tag as it appears in the page data.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NewCards => "newcards",
            Self::HighSynergyCards => "highsynergycards",
            Self::TopCards => "topcards",
            Self::Creatures => "creatures",
            Self::Instants => "instants",
            Self::Sorceries => "sorceries",
            Self::UtilityArtifacts => "utilityartifacts",
            Self::ManaArtifacts => "manaartifacts",
            Self::Enchantments => "enchantments",
            Self::Battles => "battles",
            Self::Planeswalkers => "planeswalkers",
            Self::Lands => "lands",
            Self::UtilityLands => "utilitylands",
        }
    }
}
impl Display for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
impl FromStr for Tag {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let squashed = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_ascii_lowercase();

        let tag = match squashed.as_str() {
            "new" => Self::NewCards,
            "synergy" | "highsynergy" => Self::HighSynergyCards,
            "top" => Self::TopCards,
            "artifacts" => Self::UtilityArtifacts,
            "manarocks" => Self::ManaArtifacts,
            other => Self::ALL
                .into_iter()
                .find(|t| t.as_str() == other)
                .ok_or_else(|| anyhow!("Unknown tag \"{s}\". Expected one of: {}", Self::ALL.iter().join(", ")))?,
        };

        Ok(tag)
    }
}

// ====================
// Card Views
// ====================

/// One card entry in a card group. Every field is optional since the site
/// doesn't promise any of them.
///
/// Decoding never fails: a field of an unexpected type stays in `extra`
/// under its own key.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(from = "Value")]
pub struct CardView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sanitized: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synergy: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inclusion: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_decks: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub potential_decks: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Whatever else the site sent along.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Moves `key` out of `extra` if `read` accepts its value. Otherwise the
/// entry stays where it is.
fn take_field<T>(extra: &mut Map<String, Value>, key: &str, read: fn(&Value) -> Option<T>) -> Option<T> {
    let value = extra.get(key).and_then(read)?;
    extra.remove(key);
    Some(value)
}

fn read_text(v: &Value) -> Option<String> {
    v.as_str().map(str::to_owned)
}

impl From<Value> for CardView {
    fn from(value: Value) -> Self {
        let Value::Object(mut extra) = value else {
            return Self::default();
        };

        Self {
            name: take_field(&mut extra, "name", read_text),
            sanitized: take_field(&mut extra, "sanitized", read_text),
            url: take_field(&mut extra, "url", read_text),
            synergy: take_field(&mut extra, "synergy", Value::as_f64),
            inclusion: take_field(&mut extra, "inclusion", Value::as_u64),
            num_decks: take_field(&mut extra, "num_decks", Value::as_u64),
            potential_decks: take_field(&mut extra, "potential_decks", Value::as_u64),
            label: take_field(&mut extra, "label", read_text),
            extra,
        }
    }
}

impl Display for CardView {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = self.name.as_deref().unwrap_or("Unknown Card");
        let padding = 32_usize.saturating_sub(name.width());

        write!(f, "{}{:padding$}", name.bold(), "")?;

        if let Some(synergy) = self.synergy {
            let synergy = format!("{:+.0}% synergy", synergy * 100.0);
            let synergy = if synergy.starts_with('-') { synergy.red() } else { synergy.green() };
            write!(f, " {synergy:>14}")?;
        }

        match (self.num_decks.or(self.inclusion), self.potential_decks) {
            #[allow(clippy::cast_precision_loss)]
            (Some(decks), Some(potential)) if potential > 0 => write!(
                f,
                "  in {decks}/{potential} decks ({:.0}%)",
                decks as f64 / potential as f64 * 100.0
            )?,
            (Some(decks), _) => write!(f, "  in {decks} decks")?,
            _ => {}
        }

        if f.alternate() {
            if let Some(url) = &self.url {
                write!(f, "\n\t{}", url.underline().bright_blue())?;
            }
        }

        Ok(())
    }
}

/// Card groups keyed by their header, in the order the page lists them.
///
/// Inserting a header that is already present replaces its cards in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardList {
    groups: Vec<(String, Vec<CardView>)>,
}

impl CardList {
    pub fn insert(&mut self, header: String, cards: Vec<CardView>) {
        match self.groups.iter_mut().find(|(h, _)| *h == header) {
            Some((_, slot)) => *slot = cards,
            None => self.groups.push((header, cards)),
        }
    }

    #[must_use]
    pub fn get(&self, header: &str) -> Option<&[CardView]> {
        self.groups.iter().find(|(h, _)| h == header).map(|(_, c)| c.as_slice())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(h, _)| h.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[CardView])> {
        self.groups.iter().map(|(h, c)| (h.as_str(), c.as_slice()))
    }

    /// Card groups out of data from [`EdhRec::get_commander_data`] or
    /// [`EdhRec::get_commander_theme_data`].
    #[must_use]
    pub fn from_commander_data(data: Option<Value>, tag: Option<Tag>) -> Self {
        collect_card_lists(data, tag.map(Tag::as_str))
    }
}

impl FromIterator<(String, Vec<CardView>)> for CardList {
    fn from_iter<I: IntoIterator<Item = (String, Vec<CardView>)>>(iter: I) -> Self {
        let mut list = Self::default();
        for (header, cards) in iter {
            list.insert(header, cards);
        }
        list
    }
}

impl IntoIterator for CardList {
    type Item = (String, Vec<CardView>);
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

impl Serialize for CardList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for (header, cards) in &self.groups {
            map.serialize_entry(header, cards)?;
        }
        map.end()
    }
}

impl Display for CardList {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (header, cards) in &self.groups {
            writeln!(f, "\t{}", header.bold().green())?;
            for card in cards {
                if f.alternate() {
                    writeln!(f, "{card:#}")?;
                } else {
                    writeln!(f, "{card}")?;
                }
            }
        }
        Ok(())
    }
}

// ====================
// Page Shape
// ====================

/// Header and cards of one `cardlists` entry. A missing header reads as
/// empty, as does anything other than an array under `cardviews`.
fn into_entry(group: Value) -> (String, Vec<CardView>) {
    let Value::Object(mut group) = group else {
        return (String::new(), Vec::new());
    };

    let header = group.get("header").and_then(Value::as_str).unwrap_or_default().to_owned();
    let cards = match group.remove("cardviews") {
        Some(Value::Array(cards)) => cards.into_iter().map(CardView::from).collect(),
        _ => Vec::new(),
    };

    (header, cards)
}

/// Reads `container.json_dict.cardlists` out of commander data.
///
/// With a tag, keeps only the first group carrying it. Without one, keeps
/// every group, later headers overwriting earlier ones. Each group is read on
/// its own, so one odd group never hides the others. Anything that doesn't
/// look like a commander page gives an empty list.
fn collect_card_lists(data: Option<Value>, tag: Option<&str>) -> CardList {
    let groups = match data.and_then(|mut d| d.pointer_mut("/container/json_dict/cardlists").map(Value::take)) {
        Some(Value::Array(groups)) => groups,
        _ => return CardList::default(),
    };

    let mut groups = groups.into_iter();

    match tag {
        Some(tag) => groups
            .find(|g| g.get("tag").and_then(Value::as_str) == Some(tag))
            .map(|g| std::iter::once(into_entry(g)).collect())
            .unwrap_or_default(),
        None => groups.map(into_entry).collect(),
    }
}

// ====================
// Accessors
// ====================

impl<T: Transport> EdhRec<T> {
    /// The unwrapped data of a commander's page, optionally narrowed by a
    /// free-form filter (passed through as `f`).
    pub fn get_commander_data(&self, card_name: &str, filter: Option<&str>) -> Result<Option<Value>> {
        self.commander_page(card_name, None, filter)
    }

    /// Same as [`Self::get_commander_data`], for one of the commander's theme pages.
    pub fn get_commander_theme_data(
        &self,
        card_name: &str,
        theme: &str,
        filter: Option<&str>,
    ) -> Result<Option<Value>> {
        self.commander_page(card_name, Some(theme), filter)
    }

    fn commander_page(
        &self,
        card_name: &str,
        theme: Option<&str>,
        filter: Option<&str>,
    ) -> Result<Option<Value>> {
        let key = (card_name.to_owned(), theme.map(str::to_owned), filter.map(str::to_owned));

        self.caches.commander.get_or_try_insert(key, || {
            let route = NextRoute::new(Endpoint::Commanders, card_name)
                .with_theme(theme)
                .with_filter(filter);
            self.get_page_data(&route)
        })
    }

    /// Card groups on a commander's page. See [`CardList`].
    pub fn get_card_lists(&self, card_name: &str, tag: Option<Tag>, filter: Option<&str>) -> Result<CardList> {
        let data = self.get_commander_data(card_name, filter)?;
        Ok(CardList::from_commander_data(data, tag))
    }

    /// Every card group on the commander's page.
    pub fn get_commander_cards(&self, card_name: &str) -> Result<CardList> {
        self.get_card_lists(card_name, None, None)
    }

    pub fn get_new_cards(&self, card_name: &str, filter: Option<&str>) -> Result<CardList> {
        self.get_card_lists(card_name, Some(Tag::NewCards), filter)
    }

    pub fn get_high_synergy_cards(&self, card_name: &str) -> Result<CardList> {
        self.get_card_lists(card_name, Some(Tag::HighSynergyCards), None)
    }

    pub fn get_top_cards(&self, card_name: &str) -> Result<CardList> {
        self.get_card_lists(card_name, Some(Tag::TopCards), None)
    }

    pub fn get_top_creatures(&self, card_name: &str) -> Result<CardList> {
        self.get_card_lists(card_name, Some(Tag::Creatures), None)
    }

    pub fn get_top_instants(&self, card_name: &str) -> Result<CardList> {
        self.get_card_lists(card_name, Some(Tag::Instants), None)
    }

    pub fn get_top_sorceries(&self, card_name: &str) -> Result<CardList> {
        self.get_card_lists(card_name, Some(Tag::Sorceries), None)
    }

    /// Non-mana artifacts (`utilityartifacts`).
    pub fn get_top_artifacts(&self, card_name: &str) -> Result<CardList> {
        self.get_card_lists(card_name, Some(Tag::UtilityArtifacts), None)
    }

    pub fn get_top_mana_artifacts(&self, card_name: &str) -> Result<CardList> {
        self.get_card_lists(card_name, Some(Tag::ManaArtifacts), None)
    }

    pub fn get_top_enchantments(&self, card_name: &str) -> Result<CardList> {
        self.get_card_lists(card_name, Some(Tag::Enchantments), None)
    }

    pub fn get_top_battles(&self, card_name: &str) -> Result<CardList> {
        self.get_card_lists(card_name, Some(Tag::Battles), None)
    }

    pub fn get_top_planeswalkers(&self, card_name: &str) -> Result<CardList> {
        self.get_card_lists(card_name, Some(Tag::Planeswalkers), None)
    }

    pub fn get_top_lands(&self, card_name: &str) -> Result<CardList> {
        self.get_card_lists(card_name, Some(Tag::Lands), None)
    }

    pub fn get_top_utility_lands(&self, card_name: &str) -> Result<CardList> {
        self.get_card_lists(card_name, Some(Tag::UtilityLands), None)
    }
}
