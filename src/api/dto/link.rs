//! DTOs for the link rotation endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::services::LinkSelection;
use crate::domain::entities::LinkEntry;
use crate::domain::strategy::Strategy;

/// Query parameters for `GET /api/whatsapp/link`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct LinkQuery {
    /// Strategy name; unknown names resolve to `weighted_random`.
    pub strategy: Option<String>,

    /// Visitor region code for the `specialization` strategy.
    #[validate(length(max = 32))]
    pub region: Option<String>,

    /// Stock symbol the visitor is interested in. Blank or unrenderable
    /// values are ignored rather than rejected.
    pub stock: Option<String>,
}

/// Public projection of the selected entry.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkSummary {
    pub id: String,
    pub label: Option<String>,
    pub description: Option<String>,
    pub specialization: Option<String>,
    pub region: Option<String>,
}

impl From<LinkEntry> for LinkSummary {
    fn from(entry: LinkEntry) -> Self {
        Self {
            id: entry.id,
            label: entry.label,
            description: entry.description,
            specialization: entry.specialization,
            region: entry.region,
        }
    }
}

/// Successful rotation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkResponse {
    pub url: String,
    pub link: LinkSummary,
    pub strategy: Strategy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_symbol: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl LinkResponse {
    pub fn new(selection: LinkSelection, stock_symbol: Option<String>) -> Self {
        Self {
            url: selection.url,
            link: selection.entry.into(),
            strategy: selection.strategy,
            stock_symbol,
            timestamp: selection.timestamp,
        }
    }
}

/// Returned with `503` when no entry is available.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnavailableResponse {
    pub error: String,
    pub fallback_url: String,
}

/// Returned with `200` when rotation failed for any other reason.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackResponse {
    pub url: String,
    pub link: Option<LinkSummary>,
    pub strategy: &'static str,
    pub error: String,
}
