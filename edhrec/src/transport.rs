use anyhow::{Context, Result};
use rand::seq::SliceRandom;
use serde_json::Value;
use ureq::{Agent, RequestBuilder};

/// The HTTP session the client talks through.
///
/// Implementations return the body of a successful response and fail on
/// anything else, non-2xx statuses included.
pub trait Transport: Send + Sync {
    fn get(&self, uri: &str, query: &[(&'static str, String)]) -> Result<String>;

    fn post_json(&self, uri: &str, body: &Value) -> Result<String>;
}

const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:128.0) Gecko/20100101 Firefox/128.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36 Edg/126.0.0.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.5 Safari/605.1.15",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14.5; rv:127.0) Gecko/20100101 Firefox/127.0",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:127.0) Gecko/20100101 Firefox/127.0",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_5 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.5 Mobile/15E148 Safari/604.1",
    "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Mobile Safari/537.36",
];

/// A browser User-Agent string picked at random.
#[must_use]
pub fn random_user_agent() -> &'static str {
    USER_AGENTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(USER_AGENTS[0])
}

/// Accepts the session token with or without its `userState=` prefix.
pub(crate) fn normalize_cookie(cookie: &str) -> &str {
    cookie.strip_prefix("userState=").unwrap_or(cookie)
}

/// [`Transport`] over a long-lived `ureq` agent.
pub struct HttpTransport {
    agent: Agent,
    user_agent: String,
    user_state: Option<String>,
}

impl HttpTransport {
    #[must_use]
    pub fn new(user_agent: impl Into<String>, cookie: Option<&str>) -> Self {
        Self {
            agent: Agent::new_with_defaults(),
            user_agent: user_agent.into(),
            user_state: cookie.map(|c| normalize_cookie(c).to_owned()),
        }
    }

    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    fn prepare<B>(&self, req: RequestBuilder<B>) -> RequestBuilder<B> {
        let req = req
            .header("Accept", "application/json")
            .header("User-Agent", self.user_agent.as_str());

        match &self.user_state {
            Some(token) => req.header("Cookie", format!("userState={token}")),
            None => req,
        }
    }
}

impl Transport for HttpTransport {
    fn get(&self, uri: &str, query: &[(&'static str, String)]) -> Result<String> {
        tracing::debug!(uri, ?query, "GET");

        let body = self
            .prepare(self.agent.get(uri))
            .query_pairs(query.iter().map(|(k, v)| (*k, v.as_str())))
            .call()
            .with_context(|| format!("GET {uri} failed"))?
            .body_mut()
            .read_to_string()
            .with_context(|| format!("failed to read response from {uri}"))?;

        Ok(body)
    }

    fn post_json(&self, uri: &str, body: &Value) -> Result<String> {
        tracing::debug!(uri, "POST");

        let body = self
            .prepare(self.agent.post(uri))
            .send_json(body)
            .with_context(|| format!("POST {uri} failed"))?
            .body_mut()
            .read_to_string()
            .with_context(|| format!("failed to read response from {uri}"))?;

        Ok(body)
    }
}

#[cfg(test)]
mod transport_tests {
    use super::*;

    #[test]
    fn test_cookie_prefix_is_optional() {
        assert_eq!(normalize_cookie("userState=abc123"), "abc123");
        assert_eq!(normalize_cookie("abc123"), "abc123");
    }

    #[test]
    fn test_random_user_agent_from_pool() {
        for _ in 0..20 {
            assert!(USER_AGENTS.contains(&random_user_agent()));
        }
    }

    #[test]
    fn test_transport_keeps_token_only() {
        let transport = HttpTransport::new("test-agent", Some("userState=tok"));
        assert_eq!(transport.user_state.as_deref(), Some("tok"));
        assert_eq!(transport.user_agent(), "test-agent");
    }
}
