//! Common types shared across EIAM API models.
//!
//! This module contains the uniform response envelope and the offset page
//! wrapper. It does NOT contain resource-specific models.

use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};
use crate::serde_helpers::u64_from_string_or_number;

/// Uniform response wrapper used by every console endpoint.
///
/// `{ success, result?, errorCode?, errorMessage? }`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEnvelope<T> {
    pub success: bool,
    pub result: Option<T>,
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Unwrap the payload or turn the failure fields into [`ClientError::Api`].
    ///
    /// A `success: true` envelope without a `result` is an invalid response.
    pub fn into_result(self, status: u16, url: &str) -> Result<T> {
        if !self.success {
            return Err(ClientError::Api {
                status,
                url: url.to_string(),
                error_code: self.error_code,
                message: self
                    .error_message
                    .unwrap_or_else(|| "request failed".to_string()),
            });
        }

        self.result.ok_or_else(|| {
            ClientError::InvalidResponse(format!("Envelope from {url} has no result"))
        })
    }
}

/// Raw `{ list, total }` page as it appears on the wire.
///
/// Rows stay as JSON values so one malformed record does not fail the page.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WirePage {
    #[serde(default)]
    pub list: Vec<serde_json::Value>,
    #[serde(deserialize_with = "u64_from_string_or_number")]
    pub total: u64,
}

/// One page of an offset-paginated listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub list: Vec<T>,
    /// Server-reported number of matching records across all pages.
    pub total: u64,
    /// 1-based page number that was requested.
    pub page: u32,
    pub page_size: u32,
}

impl<T> Page<T> {
    /// Number of pages needed to cover `total`.
    pub fn page_count(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.page_size))
    }

    /// True when a later page exists.
    pub fn has_next(&self) -> bool {
        u64::from(self.page) < self.page_count()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}
