//! axum integration.
//!
//! `Search<T>` binds the page, filter and sort blocks of a request's query
//! string. Prefixes come from a `SearchPrefixes` request extension, falling
//! back to the defaults when none is installed.
//!
//! A rejected query string becomes a `400 Bad Request` whose body lists
//! every message under the query key that caused it:
//!
//! ```text
//! {"title":"One or more validation errors occurred.","status":400,
//!  "errors":{"f.Nope.eq":["Property does not exist on entity 'User'"]}}
//! ```

use std::collections::BTreeMap;

use axum::Json;
use axum::extract::FromRequestParts;
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::binding::{BindingErrors, SearchPrefixes, SearchRequest};
use crate::schema::Entity;

/// Title used for validation failures.
pub const VALIDATION_TITLE: &str = "One or more validation errors occurred.";

/// Extracts a bound `SearchRequest<T>` from the query string.
#[derive(Debug)]
pub struct Search<T>(pub SearchRequest<T>);

impl<T, S> FromRequestParts<S> for Search<T>
where
    T: Entity,
    S: Send + Sync,
{
    type Rejection = BindingRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts.uri.query().unwrap_or_default();
        let defaults = SearchPrefixes::default();
        let prefixes = parts.extensions.get::<SearchPrefixes>().unwrap_or(&defaults);

        SearchRequest::from_query(raw, prefixes)
            .map(Search)
            .map_err(BindingRejection)
    }
}

/// Problem body returned for failed requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProblemDetails {
    pub title: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
}

impl ProblemDetails {
    /// A problem with no per-key errors.
    #[must_use]
    pub fn new(status: StatusCode, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            status: status.as_u16(),
            errors: None,
        }
    }

    /// A `400 Bad Request` listing binding errors by query key.
    #[must_use]
    pub fn validation(errors: &BindingErrors) -> Self {
        Self {
            title: VALIDATION_TITLE.to_string(),
            status: StatusCode::BAD_REQUEST.as_u16(),
            errors: Some(errors.messages_by_key()),
        }
    }
}

impl IntoResponse for ProblemDetails {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// Rejection for `Search<T>`.
#[derive(Debug)]
pub struct BindingRejection(pub BindingErrors);

impl IntoResponse for BindingRejection {
    fn into_response(self) -> Response {
        tracing::debug!("rejecting search request: {}", self.0);
        ProblemDetails::validation(&self.0).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use axum::http::Request;

    use super::*;
    use crate::testing::Item;

    fn extract(uri: &str, prefixes: Option<SearchPrefixes>) -> Result<Search<Item>, BindingRejection> {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let mut request = Request::builder().uri(uri).body(()).unwrap();
        if let Some(prefixes) = prefixes {
            request.extensions_mut().insert(prefixes);
        }
        let (mut parts, ()) = request.into_parts();
        runtime.block_on(Search::<Item>::from_request_parts(&mut parts, &()))
    }

    #[test]
    fn test_extracts_with_default_prefixes() {
        let Search(request) = extract("/items?f.Id.eq=3&s.Name=asc", None).unwrap();
        assert_eq!(request.filter.unwrap().len(), 1);
        assert_eq!(request.sort.unwrap().len(), 1);
        assert!(request.page.is_none());
    }

    #[test]
    fn test_no_query_string() {
        let Search(request) = extract("/items", None).unwrap();
        assert!(request.filter.is_none());
    }

    #[test]
    fn test_prefixes_from_extension() {
        let prefixes = SearchPrefixes {
            page: "pg".to_string(),
            filter: "q".to_string(),
            sort: "o".to_string(),
        };
        let Search(request) = extract("/items?q.Id.eq=3&f.Id.eq=4", Some(prefixes)).unwrap();
        let filter = request.filter.unwrap();
        assert_eq!(filter.to_query_string("q"), "q.Id.Eq=3");
    }

    #[test]
    fn test_rejection_body() {
        let rejection = extract("/items?f.Nope.eq=1&f.Id=2", None).unwrap_err();
        let response = rejection.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let runtime = tokio::runtime::Runtime::new().unwrap();
        let bytes = runtime
            .block_on(to_bytes(response.into_body(), usize::MAX))
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "title": "One or more validation errors occurred.",
                "status": 400,
                "errors": {
                    "f.Id": ["Invalid filter data, missing property or filter"],
                    "f.Nope.eq": ["Property does not exist on entity 'Item'"],
                }
            })
        );
    }
}
