//! Demo service.
//!
//! A small user directory served over HTTP. It exercises every search
//! surface of the crate: sorted, filtered and paged listings, a combined
//! search, and a DTO search that is remapped onto the stored entity.
//!
//! # Routes
//!
//! - `GET /users`: every user
//! - `GET /users/sorted`: sort block only
//! - `GET /users/filtered`: filter block only
//! - `GET /users/filtered/manual`: a filter built in code
//! - `GET /users/paged`: page block only
//! - `GET /users/complete`: page, filter and sort over `User`
//! - `GET /users/complete/dto`: page, filter and sort over `UserDto`

pub mod models;
pub mod seed;

mod routes;

pub use routes::{AppState, configure_maps, router};
