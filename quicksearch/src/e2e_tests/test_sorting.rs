//! Test sorting through `/users/sorted`.

use std::cmp::Ordering;

use axum::http::StatusCode;

use crate::app::models::User;
use crate::e2e_tests::helpers::{TestClient, balance, user_ids};

fn sorted_by(users: &[User], compare: impl Fn(&User, &User) -> Ordering) -> Vec<i64> {
    let mut users: Vec<&User> = users.iter().collect();
    users.sort_by(|a, b| compare(a, b));
    user_ids(users)
}

/// First name ascending, then balance descending.
#[test]
fn test_sort_by_two_keys() {
    let client = TestClient::new();
    let expected = sorted_by(client.users(), |a, b| {
        a.first_name
            .cmp(&b.first_name)
            .then_with(|| balance(b).cmp(&balance(a)))
    });

    assert_eq!(
        client.get_ids("/users/sorted?s.firstName=asc&s.account.balance=desc"),
        expected
    );
}

/// The first sort key wins and later keys only break ties.
#[test]
fn test_key_order_is_precedence() {
    let client = TestClient::new();
    let expected = sorted_by(client.users(), |a, b| {
        balance(b)
            .cmp(&balance(a))
            .then_with(|| a.first_name.cmp(&b.first_name))
    });

    let found = client.get_ids("/users/sorted?s.account.balance=desc&s.firstName=asc");
    assert_eq!(found, expected);
    assert_ne!(
        found,
        client.get_ids("/users/sorted?s.firstName=asc&s.account.balance=desc")
    );
}

/// Users without an account sort first when ascending.
#[test]
fn test_missing_values_sort_first() {
    let client = TestClient::new();
    let expected = sorted_by(client.users(), |a, b| balance(a).cmp(&balance(b)));
    assert_eq!(
        client.get_ids("/users/sorted?s.Account.Balance=ASC"),
        expected
    );
}

#[test]
fn test_descending_ids() {
    let client = TestClient::with_users(5);
    assert_eq!(client.get_ids("/users/sorted?s.Id=desc"), vec![4, 3, 2, 1, 0]);
}

#[test]
fn test_conflicting_directions_are_rejected() {
    let client = TestClient::new();
    let (status, body) = client.get("/users/sorted?s.Id=asc&s.Id=desc");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["errors"]["s.Id"],
        serde_json::json!(["Property cannot have multiple sorting directions"])
    );
}
