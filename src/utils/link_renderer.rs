//! Rendering of outbound link targets.
//!
//! A target is stored as an opaque string. When the visitor asked about a
//! specific stock symbol, the pre-filled message in the target's `text` query
//! parameter is extended with a sentence naming it.

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// Accepted stock symbol shape: 1-12 characters of letters, digits, `.` and `-`.
pub static STOCK_SYMBOL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9.-]{1,12}$").unwrap());

/// Query parameter holding the pre-filled message.
const TEXT_PARAM: &str = "text";

/// Trims and upper-cases a stock symbol, rejecting malformed input.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_stock_symbol(" nvda "), Some("NVDA".to_string()));
/// assert_eq!(normalize_stock_symbol("BRK.B"), Some("BRK.B".to_string()));
/// assert_eq!(normalize_stock_symbol("<script>"), None);
/// ```
pub fn normalize_stock_symbol(raw: &str) -> Option<String> {
    let symbol = raw.trim();
    STOCK_SYMBOL_REGEX
        .is_match(symbol)
        .then(|| symbol.to_ascii_uppercase())
}

/// Renders `target` for a visitor, optionally naming a stock symbol.
///
/// Without a symbol the target is returned unchanged. With one, the sentence
/// `" I'm particularly interested in {SYMBOL}."` is appended to the `text`
/// query parameter, which is added if missing. Targets that do not parse as
/// absolute URLs are returned unchanged.
pub fn render_target(target: &str, stock_symbol: Option<&str>) -> String {
    let Some(symbol) = stock_symbol else {
        return target.to_string();
    };

    let Ok(mut url) = Url::parse(target) else {
        return target.to_string();
    };

    let sentence = format!("I'm particularly interested in {symbol}.");

    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    match pairs.iter_mut().find(|(k, _)| k == TEXT_PARAM) {
        Some((_, text)) if text.is_empty() => *text = sentence,
        Some((_, text)) => {
            text.push(' ');
            text.push_str(&sentence);
        }
        None => pairs.push((TEXT_PARAM.to_string(), sentence)),
    }

    url.query_pairs_mut().clear().extend_pairs(&pairs);
    url.to_string()
}
