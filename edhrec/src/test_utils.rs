use crate::Transport;
use anyhow::{anyhow, Result};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Call {
    pub method: &'static str,
    pub uri: String,
    pub query: Vec<(&'static str, String)>,
    pub body: Option<Value>,
}

/// Answers from canned bodies keyed by exact URI and records every request.
/// Unknown URIs fail like a 404 would.
#[derive(Default)]
pub(crate) struct FakeTransport {
    responses: HashMap<String, String>,
    calls: Mutex<Vec<Call>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(mut self, uri: &str, body: impl Into<String>) -> Self {
        self.responses.insert(uri.to_owned(), body.into());
        self
    }

    pub fn with_json(self, uri: &str, body: &Value) -> Self {
        self.with_response(uri, body.to_string())
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn count(&self, uri: &str) -> usize {
        self.calls.lock().iter().filter(|c| c.uri == uri).count()
    }

    fn answer(&self, call: Call) -> Result<String> {
        let res = self
            .responses
            .get(&call.uri)
            .cloned()
            .ok_or_else(|| anyhow!("http status: 404 for {}", call.uri));
        self.calls.lock().push(call);
        res
    }
}

impl Transport for FakeTransport {
    fn get(&self, uri: &str, query: &[(&'static str, String)]) -> Result<String> {
        self.answer(Call { method: "GET", uri: uri.to_owned(), query: query.to_vec(), body: None })
    }

    fn post_json(&self, uri: &str, body: &Value) -> Result<String> {
        self.answer(Call { method: "POST", uri: uri.to_owned(), query: Vec::new(), body: Some(body.clone()) })
    }
}

pub(crate) fn home_page(build_id: &str) -> String {
    format!(
        r#"<!DOCTYPE html><html><body><div id="__next"></div><script id="__NEXT_DATA__" type="application/json">{{"props":{{"pageProps":{{}}}},"page":"/","query":{{}},"buildId":"{build_id}","isFallback":false}}</script></body></html>"#
    )
}

/// Data URI for a page under the given build id.
pub(crate) fn data_uri(build_id: &str, path: &str) -> String {
    format!("{}/_next/data/{build_id}/{path}.json", crate::BASE_URL)
}

pub(crate) fn envelope(data: Value) -> Value {
    serde_json::json!({ "pageProps": { "data": data }, "__N_SSG": true })
}
