use crate::{helpers::format_card_name, EdhRec, Transport};
use anyhow::{Context, Result};
use serde_json::{json, Value};

impl<T: Transport> EdhRec<T> {
    /// Static card page data from EDHREC's JSON host, returned as-is.
    pub fn get_card_details(&self, card_name: &str) -> Result<Value> {
        self.caches.card_details.get_or_try_insert(card_name.to_owned(), || {
            let uri = format!("{}/{}", self.options.json_base_url, format_card_name(card_name));
            self.get_json(&uri, &[])
        })
    }

    /// Looks up several cards at once. Names go through unformatted.
    pub fn get_card_list<S: AsRef<str>>(&self, card_names: &[S]) -> Result<Value> {
        let uri = format!("{}/api/cards", self.options.base_url);
        let names = card_names.iter().map(AsRef::as_ref).collect::<Vec<&str>>();
        let body = json!({ "format": "dict", "names": names });

        let res = self.transport.post_json(&uri, &body)?;
        serde_json::from_str(&res).with_context(|| format!("failed to parse response from {uri}"))
    }

    /// Link to the card's page on the site.
    #[must_use]
    pub fn get_card_link(&self, card_name: &str) -> String {
        format!("{}/cards/{}", self.options.base_url, format_card_name(card_name))
    }
}
