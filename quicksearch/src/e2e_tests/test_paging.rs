//! Test paging through `/users/paged`.

use axum::http::StatusCode;

use crate::e2e_tests::helpers::{TestClient, ids_of};

/// 12 users at page size 10 give pages of 10, 2 and 0 items.
#[test]
fn test_pages_of_twelve_users() {
    let client = TestClient::with_users(12);

    let first = client.get_page("/users/paged?p.Number=1&p.Size=10");
    assert_eq!(ids_of(&first["items"]), (0..10).collect::<Vec<_>>());
    assert_eq!(first["currentPage"], 1);
    assert_eq!(first["pageSize"], 10);
    assert_eq!(first["totalItems"], 12);
    assert_eq!(first["totalPages"], 2);

    let second = client.get_page("/users/paged?p.number=2&p.size=10");
    assert_eq!(ids_of(&second["items"]), vec![10, 11]);
    assert_eq!(second["totalPages"], 2);

    let third = client.get_page("/users/paged?p.Number=3&p.Size=10");
    assert!(ids_of(&third["items"]).is_empty());
    assert_eq!(third["currentPage"], 3);
    assert_eq!(third["totalItems"], 12);
}

/// Without a page block the default page applies.
#[test]
fn test_default_page() {
    let client = TestClient::new();
    let page = client.get_page("/users/paged");
    assert_eq!(page["currentPage"], 1);
    assert_eq!(page["pageSize"], 25);
    assert_eq!(page["totalItems"], 100);
    assert_eq!(page["totalPages"], 4);
    assert_eq!(ids_of(&page["items"]), (0..25).collect::<Vec<_>>());
}

/// A missing page key takes its default.
#[test]
fn test_partial_page_block() {
    let client = TestClient::new();
    let page = client.get_page("/users/paged?p.Number=3&p.Size=15");
    assert_eq!(ids_of(&page["items"]), (30..45).collect::<Vec<_>>());
    assert_eq!(page["totalPages"], 7);

    let page = client.get_page("/users/paged?p.Size=40");
    assert_eq!(page["currentPage"], 1);
    assert_eq!(ids_of(&page["items"]).len(), 40);
}

#[test]
fn test_empty_source() {
    let client = TestClient::with_users(0);
    let page = client.get_page("/users/paged?p.Size=10");
    assert_eq!(page["totalItems"], 0);
    assert_eq!(page["totalPages"], 0);
    assert!(ids_of(&page["items"]).is_empty());
}

#[test]
fn test_invalid_page_values() {
    let client = TestClient::new();
    for query in ["p.Size=0", "p.Number=0", "p.Number=-1", "p.Size=ten"] {
        let (status, _) = client.get(&format!("/users/paged?{query}"));
        assert_eq!(status, StatusCode::BAD_REQUEST, "query {query}");
    }
}
