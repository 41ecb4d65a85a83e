//! Test custom query prefixes.

use crate::binding::SearchPrefixes;
use crate::e2e_tests::helpers::{TestClient, ids_of};

fn client() -> TestClient {
    TestClient::with_prefixes(SearchPrefixes {
        page: "page".to_string(),
        filter: "where".to_string(),
        sort: "order".to_string(),
    })
}

#[test]
fn test_custom_prefixes_bind() {
    let client = client();
    let page = client.get_page("/users/complete?where.Id.lt=10&order.Id=desc&page.Size=3");
    assert_eq!(ids_of(&page["items"]), vec![9, 8, 7]);
    assert_eq!(page["totalItems"], 10);
}

/// Parameters under the default prefixes are ignored.
#[test]
fn test_default_prefixes_ignored() {
    let client = client();
    let page = client.get_page("/users/complete?f.Id.lt=10&s.Id=desc&p.Size=3&f.Nope=1");
    assert_eq!(ids_of(&page["items"]), (0..25).collect::<Vec<_>>());
    assert_eq!(page["pageSize"], 25);
    assert_eq!(page["totalItems"], 100);
}

#[test]
fn test_prefixes_ignore_case() {
    let client = client();
    assert_eq!(client.get_ids("/users/filtered?WHERE.id.eq=4"), vec![4]);
}
