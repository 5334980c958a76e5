//! A client for [EDHREC](https://edhrec.com)'s commander recommendations.
//!
//! EDHREC has no public API. Its pages are rendered by Next.js, and every page
//! has a JSON twin under `/_next/data/{build id}/...`. This crate builds those
//! URIs, unwraps the page envelope and memoizes the results.
//!
//! The routing scheme and the envelope are whatever the site happens to use
//! today. When they change, accessors return `None` or empty lists rather than
//! errors, so callers should check what they get back.

use anyhow::{Context, Result};
use compact_str::CompactString;
use parking_lot::RwLock;
use serde_json::Value;

mod cache;
pub mod card;
pub mod combo;
pub mod commander;
pub mod deck;
mod helpers;
mod route;
pub mod transport;

#[cfg(test)]
mod test_utils;

pub use commander::{CardList, CardView, Tag};
pub use deck::AverageDeck;
pub use helpers::format_card_name;
pub use route::Budget;
pub use transport::{random_user_agent, HttpTransport, Transport};

use cache::Memo;
use route::NextRoute;

pub const BASE_URL: &str = "https://edhrec.com";
pub const JSON_BASE_URL: &str = "https://json.edhrec.com/cards";
pub const DEFAULT_BUILD_ID: &str = "mI7k8IZ23x74LocK_h-qe";
const ONE_DAY: u64 = 86400;

#[derive(Clone, Debug)]
pub struct ClientOptions {
    base_url: String,
    json_base_url: String,
    default_build_id: String,
    cookie: Option<String>,
    user_agent: Option<String>,
    cache_lifespan: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.into(),
            json_base_url: JSON_BASE_URL.into(),
            default_build_id: DEFAULT_BUILD_ID.into(),
            cookie: None,
            user_agent: None,
            cache_lifespan: ONE_DAY,
        }
    }
}

impl ClientOptions {
    /// EDHREC `userState` session token, with or without the `userState=` prefix.
    #[must_use]
    pub fn with_cookie(self, cookie: impl Into<String>) -> Self {
        Self { cookie: Some(cookie.into()), ..self }
    }
    #[must_use]
    pub fn with_base_url(self, base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into().trim_end_matches('/').to_owned(), ..self }
    }
    #[must_use]
    pub fn with_json_base_url(self, json_base_url: impl Into<String>) -> Self {
        Self { json_base_url: json_base_url.into().trim_end_matches('/').to_owned(), ..self }
    }
    /// Build id used when the homepage can't be scraped for the current one.
    #[must_use]
    pub fn with_default_build_id(self, default_build_id: impl Into<String>) -> Self {
        Self { default_build_id: default_build_id.into(), ..self }
    }
    /// Overrides the randomly picked User-Agent.
    #[must_use]
    pub fn with_user_agent(self, user_agent: impl Into<String>) -> Self {
        Self { user_agent: Some(user_agent.into()), ..self }
    }
    /// How long, in seconds, accessor results are kept.
    #[must_use]
    pub fn with_cache_lifespan(self, cache_lifespan: u64) -> Self {
        Self { cache_lifespan, ..self }
    }
}

struct Caches {
    commander: Memo<(String, Option<String>, Option<String>), Option<Value>>,
    combos: Memo<String, Option<Value>>,
    average_deck: Memo<(String, Option<Budget>), AverageDeck>,
    decks: Memo<(String, Option<Budget>), Option<Value>>,
    card_details: Memo<String, Value>,
}

impl Caches {
    fn new(lifespan: u64) -> Self {
        Self {
            commander: Memo::new("commander", lifespan),
            combos: Memo::new("combos", lifespan),
            average_deck: Memo::new("average_deck", lifespan),
            decks: Memo::new("decks", lifespan),
            card_details: Memo::new("card_details", lifespan),
        }
    }
}

pub struct EdhRec<T = HttpTransport> {
    transport: T,
    options: ClientOptions,
    build_id: RwLock<Option<CompactString>>,
    caches: Caches,
}

impl EdhRec {
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(ClientOptions::default())
    }

    #[must_use]
    pub fn with_options(options: ClientOptions) -> Self {
        let user_agent = options.user_agent.clone().unwrap_or_else(|| random_user_agent().into());
        let transport = HttpTransport::new(user_agent, options.cookie.as_deref());

        Self::with_transport(transport, options)
    }
}

impl Default for EdhRec {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> EdhRec<T> {
    #[must_use]
    pub fn with_transport(transport: T, options: ClientOptions) -> Self {
        let caches = Caches::new(options.cache_lifespan);
        Self { transport, options, build_id: RwLock::new(None), caches }
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.options.base_url
    }

    /// The site's current build id. Looked up once per client; falls back to
    /// the configured default when the homepage doesn't give one up.
    #[must_use]
    pub fn build_id(&self) -> CompactString {
        let known = self.build_id.read().clone();
        if let Some(id) = known {
            return id;
        }

        let id = self.discover_build_id().unwrap_or_else(|| {
            tracing::warn!(
                fallback = %self.options.default_build_id,
                "Could not find the current build id. Using the fallback."
            );
            self.options.default_build_id.as_str().into()
        });

        self.build_id.write().get_or_insert(id).clone()
    }

    fn discover_build_id(&self) -> Option<CompactString> {
        let home_page = self
            .transport
            .get(&self.options.base_url, &[])
            .inspect_err(|e| tracing::warn!("Failed to fetch the homepage: {e:#}"))
            .ok()?;

        helpers::extract_build_id(&home_page).map(CompactString::from)
    }

    /// Empties every memoized accessor. The build id is kept.
    pub fn clear_cache(&self) {
        self.caches.commander.clear();
        self.caches.combos.clear();
        self.caches.average_deck.clear();
        self.caches.decks.clear();
        self.caches.card_details.clear();
    }

    fn get_json(&self, uri: &str, query: &[(&'static str, String)]) -> Result<Value> {
        let body = self.transport.get(uri, query)?;
        serde_json::from_str(&body).with_context(|| format!("failed to parse response from {uri}"))
    }

    fn get_page_data(&self, route: &NextRoute<'_>) -> Result<Option<Value>> {
        let (uri, query) = route.build(&self.options.base_url, &self.build_id());
        let res = self.get_json(&uri, &query)?;

        Ok(helpers::unwrap_page_data(res))
    }
}

#[cfg(test)]
mod client_tests {
    use super::*;
    use crate::test_utils::{home_page, FakeTransport};

    #[test]
    fn test_build_id_scraped_once() {
        let transport = FakeTransport::new().with_response(BASE_URL, home_page("fresh-build"));
        let client = EdhRec::with_transport(transport, ClientOptions::default());

        assert_eq!(client.build_id(), "fresh-build");
        assert_eq!(client.build_id(), "fresh-build");
        assert_eq!(client.transport().count(BASE_URL), 1);
    }

    #[test]
    fn test_build_id_fallback_on_bad_page() {
        let transport = FakeTransport::new().with_response(BASE_URL, "<html>maintenance</html>");
        let client = EdhRec::with_transport(transport, ClientOptions::default());

        assert_eq!(client.build_id(), DEFAULT_BUILD_ID);
        assert_eq!(client.build_id(), DEFAULT_BUILD_ID);
        assert_eq!(client.transport().count(BASE_URL), 1);
    }

    #[test]
    fn test_build_id_fallback_on_http_error() {
        // nothing registered for the homepage, so the fake answers 404
        let client = EdhRec::with_transport(
            FakeTransport::new(),
            ClientOptions::default().with_default_build_id("configured"),
        );

        assert_eq!(client.build_id(), "configured");
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let opts = ClientOptions::default().with_base_url("http://localhost:3000/");
        let client = EdhRec::with_transport(FakeTransport::new(), opts);

        assert_eq!(client.base_url(), "http://localhost:3000");
    }
}
