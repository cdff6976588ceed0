//! DTOs for the admin link configuration endpoint.

use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use validator::Validate;

use crate::domain::entities::{LinkEntry, LinkEntryPatch, NewLinkEntry};

/// Request body for `POST /api/whatsapp/config`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkRequest {
    /// Destination link, e.g. a `https://wa.me/...` deep link.
    #[serde(alias = "url")]
    #[validate(length(min = 1, max = 2048, message = "Target must not be empty"))]
    pub target: String,

    #[serde(alias = "name")]
    #[validate(length(max = 200))]
    pub label: Option<String>,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    #[validate(range(min = 1, message = "Weight must be at least 1"))]
    pub weight: Option<u32>,

    pub enabled: Option<bool>,

    #[serde(alias = "maxDailyClicks")]
    #[validate(range(min = 1, message = "Daily quota must be a positive integer"))]
    pub max_daily_quota: Option<u32>,

    pub region: Option<String>,

    pub specialization: Option<String>,
}

impl From<CreateLinkRequest> for NewLinkEntry {
    fn from(req: CreateLinkRequest) -> Self {
        Self {
            target: req.target,
            label: req.label,
            description: req.description,
            weight: req.weight,
            enabled: req.enabled,
            max_daily_quota: req.max_daily_quota,
            region: req.region,
            specialization: req.specialization,
        }
    }
}

/// Request body for `PUT /api/whatsapp/config`.
///
/// Only provided fields are changed. For optional attributes:
///
/// - **Absent** → leave existing value unchanged
/// - **`null`** → clear the value
/// - **Value** → set new value
#[serde_as]
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLinkRequest {
    /// Entry to update; never changed itself.
    #[validate(length(min = 1, message = "Link ID required"))]
    pub id: String,

    #[serde(alias = "url")]
    #[validate(length(min = 1, max = 2048, message = "Target must not be empty"))]
    pub target: Option<String>,

    #[serde(default, alias = "name", with = "::serde_with::rust::double_option")]
    pub label: Option<Option<String>>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub description: Option<Option<String>>,

    #[validate(range(min = 1, message = "Weight must be at least 1"))]
    pub weight: Option<u32>,

    pub enabled: Option<bool>,

    #[serde(
        default,
        alias = "maxDailyClicks",
        with = "::serde_with::rust::double_option"
    )]
    pub max_daily_quota: Option<Option<u32>>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub region: Option<Option<String>>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub specialization: Option<Option<String>>,
}

impl UpdateLinkRequest {
    /// Splits the request into the target id and the patch to apply.
    pub fn into_parts(self) -> (String, LinkEntryPatch) {
        let patch = LinkEntryPatch {
            target: self.target,
            label: self.label,
            description: self.description,
            weight: self.weight,
            enabled: self.enabled,
            max_daily_quota: self.max_daily_quota,
            region: self.region,
            specialization: self.specialization,
        };
        (self.id, patch)
    }
}

/// Request body for `DELETE /api/whatsapp/config`.
#[derive(Debug, Deserialize, Validate)]
pub struct DeleteLinkRequest {
    #[validate(length(min = 1, message = "Link ID required"))]
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct LinkListResponse {
    pub links: Vec<LinkEntry>,
}

#[derive(Debug, Serialize)]
pub struct LinkMutationResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<LinkEntry>,
}
