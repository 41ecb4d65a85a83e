//! HTTP routes for the demo service.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Extension, Json, Router};

use crate::app::models::{User, UserDto};
use crate::binding::SearchPrefixes;
use crate::filter::{FilterOperator, FilterSpecification};
use crate::http::{ProblemDetails, Search};
use crate::mapping::{MappingError, PropertyMap, PropertyMapRegistry, RegistryBuilder};
use crate::pagination::{AsyncPageSource, Page};
use crate::query::{Queryable, SharedCollection};

/// Email fragment used by `/users/filtered/manual`.
const MANUAL_EMAIL_FILTER: &str = "Yvette";

#[derive(Clone)]
#[allow(clippy::disallowed_methods)] // Arc::clone is safe and expected for shared state
pub struct AppState {
    /// Every user, shared by all handlers.
    users: SharedCollection<User>,
    /// Property maps for DTO queries.
    registry: Arc<PropertyMapRegistry>,
}

impl AppState {
    #[must_use]
    pub fn new(users: Vec<User>, registry: Arc<PropertyMapRegistry>) -> Self {
        Self {
            users: SharedCollection::new(users),
            registry,
        }
    }
}

/// Register the property maps used by the demo routes.
///
/// # Errors
///
/// Returns a `MappingError` if a map is declared twice.
pub fn configure_maps(builder: &mut RegistryBuilder) -> Result<(), MappingError> {
    builder.register(
        PropertyMap::<UserDto, User>::new().map(UserDto::ACCOUNT_BALANCE, User::ACCOUNT_BALANCE)?,
    )?;
    Ok(())
}

/// Build the router. `prefixes` apply to every search route.
pub fn router(state: AppState, prefixes: SearchPrefixes) -> Router {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/sorted", get(sorted_users))
        .route("/users/filtered", get(filtered_users))
        .route("/users/filtered/manual", get(manually_filtered_users))
        .route("/users/paged", get(paged_users))
        .route("/users/complete", get(complete_users))
        .route("/users/complete/dto", get(complete_user_dtos))
        .layer(Extension(prefixes))
        .with_state(state)
}

async fn list_users(State(state): State<AppState>) -> Json<Vec<User>> {
    Json(state.users.query().to_vec().await)
}

async fn sorted_users(
    State(state): State<AppState>,
    Search(request): Search<User>,
) -> Json<Vec<User>> {
    let query = state.users.query().sorted(request.sort.as_ref());
    Json(query.to_vec().await)
}

async fn filtered_users(
    State(state): State<AppState>,
    Search(request): Search<User>,
) -> Json<Vec<User>> {
    let query = state.users.query().filtered(request.filter.as_ref());
    Json(query.to_vec().await)
}

async fn manually_filtered_users(State(state): State<AppState>) -> Json<Vec<User>> {
    let filter = FilterSpecification::new().add(
        User::EMAIL,
        FilterOperator::Like,
        MANUAL_EMAIL_FILTER.to_string(),
    );
    let query = state.users.query().filtered(Some(&filter));
    Json(query.to_vec().await)
}

async fn paged_users(
    State(state): State<AppState>,
    Search(request): Search<User>,
) -> Json<Page<User>> {
    let Ok(page) = state.users.query().paged_async(request.page).await;
    Json(page)
}

async fn complete_users(
    State(state): State<AppState>,
    Search(request): Search<User>,
) -> Json<Page<User>> {
    let query = state
        .users
        .query()
        .filtered(request.filter.as_ref())
        .sorted(request.sort.as_ref());
    let Ok(page) = query.paged_async(request.page).await;
    Json(page)
}

async fn complete_user_dtos(
    State(state): State<AppState>,
    Search(request): Search<UserDto>,
) -> Result<Json<Page<UserDto>>, ProblemDetails> {
    let filter = request
        .filter
        .map(|filter| filter.map_to::<User>(&state.registry))
        .transpose()
        .map_err(|e| mapping_problem(&e))?;
    let sort = request
        .sort
        .map(|sort| sort.map_to::<User>(&state.registry))
        .transpose()
        .map_err(|e| mapping_problem(&e))?;

    let query = state
        .users
        .query()
        .filtered(filter.as_ref())
        .sorted(sort.as_ref());
    let Ok(page) = query.paged_async(request.page).await;
    Ok(Json(page.map(|user| UserDto::from(&user))))
}

fn mapping_problem(error: &MappingError) -> ProblemDetails {
    match error {
        MappingError::UnresolvedProperty { .. }
        | MappingError::InvalidValue { .. }
        | MappingError::ConflictingSort { .. } => {
            ProblemDetails::new(StatusCode::BAD_REQUEST, error.to_string())
        }
        MappingError::AlreadyMapped { .. }
        | MappingError::AlreadyRegistered { .. }
        | MappingError::NotInitialized
        | MappingError::MapNotFound { .. }
        | MappingError::LockPoisoned => {
            tracing::error!("Failed to remap search request: {error}");
            ProblemDetails::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}
