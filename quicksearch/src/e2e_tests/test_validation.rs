//! Test the validation error response.

use axum::http::StatusCode;

use crate::e2e_tests::helpers::TestClient;

/// Every rejected parameter from every block is reported at once.
#[test]
fn test_all_errors_reported() {
    let client = TestClient::new();
    let (status, body) =
        client.get("/users/complete?f.Nope.eq=1&f.Id=2&f.Id.eq=abc&s.Id=up&s.=asc&p.Number=0");

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        serde_json::json!({
            "title": "One or more validation errors occurred.",
            "status": 400,
            "errors": {
                "f.Id": ["Invalid filter data, missing property or filter"],
                "f.Id.eq": ["Invalid filter value for property type"],
                "f.Nope.eq": ["Property does not exist on entity 'User'"],
                "p.Number": ["Page value must be an integer greater than or equal to 1"],
                "s.": ["Missing entity property"],
                "s.Id": ["Unrecognized sort direction value"],
            }
        })
    );
}

/// An unknown operator on an unknown property reports both.
#[test]
fn test_unknown_operator_and_property() {
    let client = TestClient::new();
    let (status, body) = client.get("/users/filtered?f.Nope.between=1&f.Id.between=2");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["errors"],
        serde_json::json!({
            "f.Id.between": ["Invalid filter type"],
            "f.Nope.between": [
                "Invalid filter type",
                "Property does not exist on entity 'User'",
            ],
        })
    );
}

#[test]
fn test_valid_query_is_not_rejected() {
    let client = TestClient::new();
    let (status, _) = client.get("/users/complete?f.Id.eq=1&s.Id=asc&p.Size=1");
    assert_eq!(status, StatusCode::OK);
}
