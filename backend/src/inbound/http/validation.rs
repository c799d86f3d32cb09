//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every request-shape failure becomes an `invalid_request` error whose
//! details name the offending field and a stable code.

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{HttpRequest, web};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use serde_json::json;

use crate::domain::{
    CategoryValidationError, Error, PhotoUpload, RecipeValidationError, RoleValidationError,
    UserValidationError,
};

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

/// Build an `invalid_request` error for `field`.
pub(crate) fn field_error(field: FieldName, code: &str, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code,
    }))
}

pub(crate) fn user_field_error(err: UserValidationError) -> Error {
    field_error(FieldName::new(err.field()), err.code(), err.to_string())
}

pub(crate) fn recipe_field_error(err: RecipeValidationError) -> Error {
    field_error(FieldName::new(err.field()), err.code(), err.to_string())
}

pub(crate) fn category_field_error(err: CategoryValidationError) -> Error {
    field_error(FieldName::new("name"), err.code(), err.to_string())
}

pub(crate) fn role_field_error(err: RoleValidationError) -> Error {
    field_error(FieldName::new("name"), err.code(), err.to_string())
}

/// Convert the revision a client read before editing.
///
/// Every update must carry one. Revisions start at 1, so anything else can
/// never match a stored row.
pub(crate) fn parse_revision(raw: Option<i64>) -> Result<u32, Error> {
    raw.and_then(|value| u32::try_from(value).ok())
        .filter(|revision| *revision > 0)
        .ok_or_else(|| {
            field_error(
                FieldName::new("revision"),
                "invalid_revision",
                "revision must be the positive integer last read",
            )
        })
}

/// `?page=` query shared by paginated listings.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// 1-based page number; missing or non-positive values mean page 1.
    pub page: Option<i64>,
}

/// Photo attachment as carried in JSON bodies.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PhotoPayload {
    /// Client-side filename; only its extension is kept.
    pub file_name: String,
    /// Standard base64 of the image bytes.
    pub content_base64: String,
}

/// Decode an optional photo attachment. An empty payload means "no photo".
pub(crate) fn decode_photo(payload: Option<PhotoPayload>) -> Result<Option<PhotoUpload>, Error> {
    let Some(payload) = payload else {
        return Ok(None);
    };
    let bytes = STANDARD.decode(payload.content_base64.trim()).map_err(|_| {
        field_error(
            FieldName::new("photo"),
            "invalid_base64",
            "photo content must be base64 encoded",
        )
    })?;
    Ok(PhotoUpload::new(payload.file_name, bytes))
}

fn malformed_body(err: &JsonPayloadError) -> Error {
    Error::invalid_request(format!("malformed request body: {err}"))
        .with_details(json!({ "code": "malformed_body" }))
}

/// JSON extractor configuration that reports body errors in the API envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req: &HttpRequest| malformed_body(&err).into())
}

/// Query extractor configuration that reports parameter errors in the API
/// envelope.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err: QueryPayloadError, _req: &HttpRequest| {
        Error::invalid_request(format!("invalid query string: {err}"))
            .with_details(json!({ "code": "invalid_query" }))
            .into()
    })
}

/// Path extractor configuration that reports malformed ids as `404`.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|_err: PathError, _req: &HttpRequest| {
        Error::not_found("resource not found").into()
    })
}
