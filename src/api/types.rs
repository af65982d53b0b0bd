//! REST API types
//!
//! Request and response types for the calculator endpoints (/api/v1/*).
//!
//! Note: the dashboard's number inputs submit their values as strings, so
//! quantity and markup fields use custom deserializers that accept both JSON
//! numbers and numeric strings. Anything non-numeric is rejected at this
//! boundary, which is what keeps NaN out of the ledger.

use crate::catalog::CatalogResult;
use crate::ledger::LineItem;
use crate::pricing::BidSummary;
use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// Custom Deserializers for Dashboard Compatibility
// ============================================================================

/// Deserialize a value that can be either a number or a string representation
/// of a number
fn deserialize_flexible_i32<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum FlexibleInt {
        Int(i32),
        Float(f64),
        Str(String),
    }

    match FlexibleInt::deserialize(deserializer)? {
        FlexibleInt::Int(i) => Ok(i),
        FlexibleInt::Float(f) => Ok(f as i32),
        FlexibleInt::Str(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

fn deserialize_flexible_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum FlexibleFloat {
        Float(f64),
        Int(i64),
        Str(String),
    }

    let value = match FlexibleFloat::deserialize(deserializer)? {
        FlexibleFloat::Float(f) => f,
        FlexibleFloat::Int(i) => i as f64,
        FlexibleFloat::Str(s) => s.trim().parse().map_err(serde::de::Error::custom)?,
    };

    // "NaN" and "inf" parse as valid f64s; they are still not numbers we want
    if !value.is_finite() {
        return Err(serde::de::Error::custom("value must be a finite number"));
    }

    Ok(value)
}

// ============================================================================
// Common Types
// ============================================================================

/// Standard API response format
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success() -> Self {
        Self {
            status: "success".to_string(),
            message: None,
            data: None,
        }
    }

    pub fn success_with_message(message: &str) -> Self {
        Self {
            status: "success".to_string(),
            message: Some(message.to_string()),
            data: None,
        }
    }

    pub fn success_with_data(data: T) -> Self {
        Self {
            status: "success".to_string(),
            message: None,
            data: Some(data),
        }
    }
}

/// Empty data type for responses without data
#[derive(Debug, Clone, Serialize)]
pub struct Empty {}

// ============================================================================
// Request Types
// ============================================================================

/// Close session request - POST /api/v1/session/close
#[derive(Debug, Clone, Deserialize)]
pub struct CloseSessionRequest {
    pub session_id: String,
}

/// Catalog search request - POST /api/v1/search
#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequest {
    pub session_id: String,
    pub query: String,
}

/// Add item request - POST /api/v1/bid/add
#[derive(Debug, Clone, Deserialize)]
pub struct AddItemRequest {
    pub session_id: String,
    pub result_id: String,
}

/// Remove item request - POST /api/v1/bid/remove
#[derive(Debug, Clone, Deserialize)]
pub struct RemoveItemRequest {
    pub session_id: String,
    pub entry_id: String,
}

/// Update quantity request - POST /api/v1/bid/quantity
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateQuantityRequest {
    pub session_id: String,
    pub entry_id: String,
    #[serde(deserialize_with = "deserialize_flexible_i32")]
    pub quantity: i32,
}

/// Update markup request - POST /api/v1/bid/markup
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateMarkupRequest {
    pub session_id: String,
    pub entry_id: String,
    #[serde(deserialize_with = "deserialize_flexible_f64")]
    pub markup: f64,
}

/// Global markup request - POST /api/v1/bid/globalmarkup
#[derive(Debug, Clone, Deserialize)]
pub struct GlobalMarkupRequest {
    pub session_id: String,
    #[serde(deserialize_with = "deserialize_flexible_f64")]
    pub markup: f64,
}

/// Session-only request (for bid snapshot and export)
#[derive(Debug, Clone, Deserialize)]
pub struct SessionRequest {
    pub session_id: String,
}

// ============================================================================
// Response Data Types
// ============================================================================

/// Catalog search data
#[derive(Debug, Clone, Serialize)]
pub struct SearchData {
    pub query: String,
    pub results: Vec<CatalogResult>,
    pub stale: bool,
}

/// Single bid entry data
#[derive(Debug, Clone, Serialize)]
pub struct ItemData {
    pub item: LineItem,
}

/// Global markup data
#[derive(Debug, Clone, Serialize)]
pub struct GlobalMarkupData {
    pub global_markup: f64,
}

/// Full bid data: entries plus derived summary
#[derive(Debug, Clone, Serialize)]
pub struct BidData {
    pub session_id: String,
    pub items: Vec<LineItem>,
    pub global_markup: f64,
    pub summary: BidSummary,
}
