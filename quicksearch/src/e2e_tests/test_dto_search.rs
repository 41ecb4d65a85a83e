//! Test DTO searches through `/users/complete/dto`.
//!
//! `UserDto.AccountBalance` is declared to live at `User.Account.Balance`.
//! Every other DTO property falls back to the same path on `User`.

use axum::http::StatusCode;

use crate::app::models::{User, UserDto};
use crate::e2e_tests::helpers::{TestClient, balance};

#[test]
fn test_mapped_property() {
    let client = TestClient::new();
    let mut expected: Vec<&User> = client
        .users()
        .iter()
        .filter(|u| balance(u).is_some_and(|b| b >= 500))
        .collect();
    expected.sort_by(|a, b| balance(b).cmp(&balance(a)));
    let expected: Vec<UserDto> = expected.into_iter().take(5).map(UserDto::from).collect();

    let page = client.get_page(
        "/users/complete/dto?f.accountBalance.gte=500&s.accountBalance=desc&p.Size=5",
    );

    assert_eq!(page["items"], serde_json::to_value(&expected).unwrap());
    let balances: Vec<i64> = expected.iter().map(|dto| dto.account_balance).collect();
    assert!(balances.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn test_identity_fallback() {
    let client = TestClient::new();
    let mut expected: Vec<&User> = client
        .users()
        .iter()
        .filter(|u| u.first_name == "Yvette")
        .collect();
    expected.sort_by(|a, b| a.last_name.cmp(&b.last_name));
    let expected: Vec<UserDto> = expected.into_iter().map(UserDto::from).collect();

    let page = client.get_page(
        "/users/complete/dto?f.FirstName.eq=Yvette&s.LastName=asc&p.Size=100",
    );
    assert_eq!(page["items"], serde_json::to_value(&expected).unwrap());
}

/// Properties that only exist on `User` are not searchable through the DTO.
#[test]
fn test_unknown_dto_property() {
    let client = TestClient::new();
    let (status, body) = client.get("/users/complete/dto?f.CompanyName.eq=Acme");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["errors"]["f.CompanyName.eq"],
        serde_json::json!(["Property does not exist on entity 'UserDto'"])
    );
}
