//! DTOs for the click recording endpoint.

use serde::{Deserialize, Serialize};

/// Request body for `POST /api/whatsapp/click`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickRequest {
    /// Id of the clicked entry. Blank ids are rejected by the service.
    #[serde(default, alias = "accountId")]
    pub link_id: String,

    /// Counted under popular symbols when it normalizes; ignored otherwise.
    pub stock_symbol: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ClickResponse {
    pub success: bool,
    pub message: &'static str,
}
