//! Test filtering through `/users/filtered`.

use crate::e2e_tests::helpers::{TestClient, balance, user_ids};

/// Repeated values of one operator are alternatives.
///
/// Query: `Id eq 49` or `Id eq 51`
/// Expected: users 49 and 51
#[test]
fn test_same_operator_values_are_ored() {
    let client = TestClient::new();
    assert_eq!(
        client.get_ids("/users/filtered?f.Id.eq=49&f.Id.eq=51"),
        vec![49, 51]
    );
}

/// Different operators on one property must all hold.
///
/// Query: `Id gt 49` and `Id lt 51`
/// Expected: user 50
#[test]
fn test_different_operators_are_anded() {
    let client = TestClient::new();
    assert_eq!(client.get_ids("/users/filtered?f.id.gt=49&f.ID.lt=51"), vec![50]);
}

/// Property paths and operators ignore case, values do not.
#[test]
fn test_like_on_job_title() {
    let client = TestClient::new();
    let expected = user_ids(
        client
            .users()
            .iter()
            .filter(|u| u.job_title.contains("Central")),
    );

    let found = client.get_ids("/users/filtered?f.jobTitle.LIKE=Central");
    assert!(!found.is_empty());
    assert_eq!(found, expected);
    assert!(client.get_ids("/users/filtered?f.jobTitle.like=central").is_empty());
}

#[test]
fn test_nlike_is_complement_of_like() {
    let client = TestClient::new();
    let like = client.get_ids("/users/filtered?f.JobTitle.like=Central");
    let nlike = client.get_ids("/users/filtered?f.JobTitle.nlike=Central");
    assert_eq!(like.len() + nlike.len(), client.users().len());
    assert!(like.iter().all(|id| !nlike.contains(id)));
}

/// A composite property compares against `null`.
#[test]
fn test_missing_account_matches_null() {
    let client = TestClient::new();
    let without_account = user_ids(client.users().iter().filter(|u| u.account.is_none()));
    let with_account = user_ids(client.users().iter().filter(|u| u.account.is_some()));

    assert_eq!(
        client.get_ids("/users/filtered?f.account.eq=null"),
        without_account
    );
    assert_eq!(
        client.get_ids("/users/filtered?f.account.neq=null"),
        with_account
    );
}

/// Ordered comparisons on a nested property never match a missing parent.
#[test]
fn test_nested_range_filter() {
    let client = TestClient::new();
    let expected = user_ids(
        client
            .users()
            .iter()
            .filter(|u| balance(u).is_some_and(|b| (250..750).contains(&b))),
    );

    assert_eq!(
        client.get_ids("/users/filtered?f.Account.Balance.gte=250&f.Account.Balance.lt=750"),
        expected
    );
}

/// Every single-operator filter agrees with the direct comparison.
#[test]
fn test_single_clause_matches_direct_comparison() {
    let client = TestClient::new();
    let users = client.users();
    let cases: [(&str, fn(i64) -> bool); 6] = [
        ("lt", |b| b < 500),
        ("lte", |b| b <= 500),
        ("gt", |b| b > 500),
        ("gte", |b| b >= 500),
        ("eq", |b| b == 500),
        ("neq", |b| b != 500),
    ];

    for (operator, holds) in cases {
        let expected = user_ids(users.iter().filter(|u| match balance(u) {
            Some(b) => holds(b),
            // Only inequality matches a missing value.
            None => operator == "neq",
        }));
        let uri = format!("/users/filtered?f.Account.Balance.{operator}=500");
        assert_eq!(client.get_ids(&uri), expected, "operator {operator}");
    }
}

/// `/users/filtered/manual` applies a filter built in code.
#[test]
fn test_manual_filter() {
    let client = TestClient::new();
    let expected = user_ids(client.users().iter().filter(|u| u.email.contains("Yvette")));
    assert_eq!(client.get_ids("/users/filtered/manual"), expected);
}

/// Without a filter block every user is returned.
#[test]
fn test_no_filter_returns_everything() {
    let client = TestClient::new();
    assert_eq!(
        client.get_ids("/users/filtered"),
        user_ids(client.users())
    );
    assert_eq!(client.get_ids("/users"), user_ids(client.users()));
}
