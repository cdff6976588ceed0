//! Visitor timezone detection from HTTP request headers.

use axum::http::{HeaderMap, header};

/// Headers that may carry an IANA timezone set by an edge proxy.
const TIMEZONE_HEADERS: &[&str] = &["cf-timezone", "timezone", "x-timezone"];

/// US timezone abbreviations accepted verbatim.
const US_ABBREVIATIONS: &[&str] = &[
    "EST", "EDT", "CST", "CDT", "MST", "MDT", "PST", "PDT", "AKST", "AKDT", "HST",
];

/// Pacific zones that belong to US states or territories.
const US_PACIFIC_ZONES: &[&str] = &["Honolulu", "Johnston", "Guam", "Saipan"];

/// Extracts the visitor's timezone from request headers.
///
/// Proxy-provided timezone headers are checked first. Without one, an
/// `Accept-Language` containing `en-US` is read as `America/New_York`.
/// Returns `None` when nothing identifies the timezone.
pub fn visitor_timezone(headers: &HeaderMap) -> Option<String> {
    let from_header = TIMEZONE_HEADERS.iter().find_map(|name| {
        headers
            .get(*name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    });

    if let Some(tz) = from_header {
        return Some(tz.to_string());
    }

    headers
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok())
        .filter(|v| v.contains("en-US"))
        .map(|_| "America/New_York".to_string())
}

/// Returns true if `timezone` is a US (or US-adjacent North American) zone.
///
/// Any `America/` or `US/` zone is accepted, along with the US Pacific
/// territories and the common US abbreviations. An unknown timezone is
/// rejected.
pub fn is_us_timezone(timezone: Option<&str>) -> bool {
    let Some(tz) = timezone.map(str::trim).filter(|tz| !tz.is_empty()) else {
        return false;
    };

    if US_ABBREVIATIONS.contains(&tz) {
        return true;
    }

    if tz.starts_with("America/") || tz.starts_with("US/") {
        return true;
    }

    tz.strip_prefix("Pacific/")
        .is_some_and(|zone| US_PACIFIC_ZONES.iter().any(|us| zone.contains(us)))
}
