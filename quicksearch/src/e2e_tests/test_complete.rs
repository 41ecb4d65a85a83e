//! Test combined filter, sort and page through `/users/complete`.

use crate::app::models::User;
use crate::e2e_tests::helpers::{TestClient, balance, ids_of, user_ids};

/// The page window applies after filtering and sorting, and the total
/// counts every filtered user.
#[test]
fn test_filter_sort_page() {
    let client = TestClient::new();
    let mut expected: Vec<&User> = client
        .users()
        .iter()
        .filter(|u| balance(u).is_some_and(|b| b >= 300))
        .collect();
    expected.sort_by(|a, b| balance(b).cmp(&balance(a)).then(a.id.cmp(&b.id)));
    let total = expected.len();

    let page = client.get_page(
        "/users/complete?f.Account.Balance.gte=300&s.Account.Balance=desc&s.Id=asc&p.Number=2&p.Size=5",
    );

    assert_eq!(
        ids_of(&page["items"]),
        user_ids(expected.iter().skip(5).take(5).copied())
    );
    assert_eq!(page["totalItems"], total);
    assert_eq!(page["totalPages"], total.div_ceil(5));
    assert_eq!(page["currentPage"], 2);
}

/// An empty query behaves like a plain paged listing.
#[test]
fn test_empty_query() {
    let client = TestClient::new();
    assert_eq!(
        client.get_page("/users/complete"),
        client.get_page("/users/paged")
    );
}

#[test]
fn test_serialized_users_keep_nested_account() {
    let client = TestClient::with_users(20);
    let page = client.get_page("/users/complete?f.Account.eq=null&p.Size=20");
    let items = page["items"].as_array().unwrap();
    assert!(items.iter().all(|item| item["account"].is_null()));

    let page = client.get_page("/users/complete?f.Account.neq=null&p.Size=20");
    let items = page["items"].as_array().unwrap();
    assert!(items.iter().all(|item| item["account"]["balance"].is_i64()));
}
