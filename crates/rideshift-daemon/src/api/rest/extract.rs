//! Extractors that report rejections in the API error format

use crate::error::{ApiError, ApiResult};
use axum::extract::{FromRequest, FromRequestParts};

/// JSON body; malformed or mistyped bodies become `400 BAD_REQUEST`
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Query string; unparseable parameters become `400 BAD_REQUEST`
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// A mandatory string field. Blank values count as missing.
pub fn required(value: Option<String>, field: &str) -> ApiResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApiError::Validation(format!("{field} is required"))),
    }
}

/// Parse an optional enum value, rejecting anything outside the enum
pub fn parse_enum<T>(value: Option<&str>) -> ApiResult<Option<T>>
where
    T: std::str::FromStr<Err = rideshift_types::DomainError>,
{
    value
        .filter(|v| !v.is_empty())
        .map(str::parse)
        .transpose()
        .map_err(ApiError::from)
}

/// Equality filter on an enum field. `None` means the value names no
/// variant, so no record can match; `Some(None)` means no filter.
pub fn enum_filter<T: std::str::FromStr>(value: Option<&str>) -> Option<Option<T>> {
    match value.filter(|v| !v.is_empty()) {
        None => Some(None),
        Some(v) => v.parse().ok().map(Some),
    }
}
