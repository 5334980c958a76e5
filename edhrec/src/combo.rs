use crate::{
    route::{Endpoint, NextRoute},
    EdhRec, Transport,
};
use anyhow::Result;
use serde_json::Value;

impl<T: Transport> EdhRec<T> {
    /// The unwrapped combos page for a card.
    pub fn get_card_combos(&self, card_name: &str) -> Result<Option<Value>> {
        self.caches.combos.get_or_try_insert(card_name.to_owned(), || {
            self.get_page_data(&NextRoute::new(Endpoint::Combos, card_name))
        })
    }

    /// Absolute link for a combo path as found in combo data.
    #[must_use]
    pub fn get_combo_url(&self, combo_url: &str) -> String {
        let base = self.base_url();
        if combo_url.starts_with('/') {
            format!("{base}{combo_url}")
        } else {
            format!("{base}/{combo_url}")
        }
    }
}
