//! Common helpers for end-to-end tests.

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use crate::app::models::User;
use crate::app::seed::generate_users;
use crate::app::{AppState, configure_maps, router};
use crate::binding::SearchPrefixes;
use crate::mapping::PropertyMapRegistry;

/// Seed used for every test client.
pub const TEST_SEED: u64 = 12345;

/// Number of users served by `TestClient::new`.
pub const TEST_USERS: usize = 100;

/// Drives the demo router in-process.
pub struct TestClient {
    pub runtime: tokio::runtime::Runtime,
    router: Router,
    users: Vec<User>,
}

impl TestClient {
    /// Create a client serving `TEST_USERS` users with the default prefixes.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(TEST_USERS, SearchPrefixes::default())
    }

    /// Create a client serving `count` users.
    #[must_use]
    pub fn with_users(count: usize) -> Self {
        Self::with_options(count, SearchPrefixes::default())
    }

    /// Create a client whose search routes use `prefixes`.
    #[must_use]
    pub fn with_prefixes(prefixes: SearchPrefixes) -> Self {
        Self::with_options(TEST_USERS, prefixes)
    }

    fn with_options(count: usize, prefixes: SearchPrefixes) -> Self {
        let registry = Arc::new(PropertyMapRegistry::new());
        #[allow(clippy::expect_used)]
        registry
            .initialize(configure_maps)
            .expect("Failed to initialize property maps");

        let users = generate_users(TEST_SEED, count);
        let state = AppState::new(users.clone(), registry);

        #[allow(clippy::expect_used)]
        let runtime = tokio::runtime::Runtime::new().expect("Failed to create runtime");

        Self {
            runtime,
            router: router(state, prefixes),
            users,
        }
    }

    /// The users the server was started with, in id order.
    #[must_use]
    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Send a GET request and decode the JSON body.
    ///
    /// An empty body decodes to `Value::Null`.
    pub fn get(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        #[allow(clippy::expect_used)]
        let request = Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("Failed to build request");

        self.runtime.block_on(async {
            #[allow(clippy::expect_used)]
            let response = self
                .router
                .clone()
                .oneshot(request)
                .await
                .expect("Router is infallible");
            let status = response.status();

            #[allow(clippy::expect_used)]
            let bytes = to_bytes(response.into_body(), usize::MAX)
                .await
                .expect("Failed to read body");
            if bytes.is_empty() {
                return (status, serde_json::Value::Null);
            }

            #[allow(clippy::expect_used)]
            let body = serde_json::from_slice(&bytes).expect("Body should be JSON");
            (status, body)
        })
    }

    /// Send a GET request that must succeed with a JSON array of users, and
    /// return their ids in response order.
    pub fn get_ids(&self, uri: &str) -> Vec<i64> {
        let (status, body) = self.get(uri);
        assert_eq!(status, StatusCode::OK, "GET {uri} failed: {body}");
        ids_of(&body)
    }

    /// Send a GET request that must succeed with a page, and return it.
    pub fn get_page(&self, uri: &str) -> serde_json::Value {
        let (status, body) = self.get(uri);
        assert_eq!(status, StatusCode::OK, "GET {uri} failed: {body}");
        body
    }
}

/// Ids of a JSON array of users.
pub fn ids_of(items: &serde_json::Value) -> Vec<i64> {
    items
        .as_array()
        .expect("Expected a JSON array")
        .iter()
        .map(|item| item["id"].as_i64().expect("Expected an integer id"))
        .collect()
}

/// Ids of users, in order.
pub fn user_ids<'a>(users: impl IntoIterator<Item = &'a User>) -> Vec<i64> {
    users.into_iter().map(|u| u.id).collect()
}

/// Account balance of a user, `None` without an account.
pub fn balance(user: &User) -> Option<i64> {
    user.account.as_ref().map(|a| a.balance)
}
