use nom::{
    bytes::complete::{tag, take_until},
    sequence::{pair, preceded},
    IResult,
};
use serde::Deserialize;
use serde_json::Value;

// ====================
// Card Names
// ====================

/// Turns a card name into the slug EDHREC uses in its URLs.
///
/// Lowercases, swaps spaces for hyphens, drops apostrophes, commas and double
/// quotes, and keeps only the front face of double-faced cards.
///
/// ```
/// assert_eq!(edhrec::format_card_name("Fblthp, the Lost"), "fblthp-the-lost");
/// ```
#[must_use]
pub fn format_card_name(card_name: &str) -> String {
    let slug = card_name
        .to_lowercase()
        .replace(' ', "-")
        .replace(['\'', ',', '"'], "");

    match slug.split_once("-//-") {
        Some((front, _)) => front.to_owned(),
        None => slug,
    }
}

// ====================
// Build ID
// ====================

const NEXT_DATA_OPEN: &str = r#"<script id="__NEXT_DATA__" type="application/json">"#;
const SCRIPT_CLOSE: &str = "</script>";

fn next_data_block(i: &str) -> IResult<&str, &str> {
    preceded(
        pair(take_until(NEXT_DATA_OPEN), tag(NEXT_DATA_OPEN)),
        take_until(SCRIPT_CLOSE),
    )(i)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NextData {
    build_id: Option<String>,
}

/// Pulls `buildId` out of the Next.js data block embedded in a page.
pub(crate) fn extract_build_id(html: &str) -> Option<String> {
    let (_, props) = next_data_block(html).ok()?;

    serde_json::from_str::<NextData>(props)
        .ok()?
        .build_id
        .filter(|id| !id.is_empty())
}

// ====================
// Envelope
// ====================

/// `pageProps.data`, or nothing when the envelope doesn't have that shape.
pub(crate) fn unwrap_page_data(mut response: Value) -> Option<Value> {
    response
        .get_mut("pageProps")?
        .get_mut("data")
        .map(Value::take)
        .filter(|data| !data.is_null())
}
