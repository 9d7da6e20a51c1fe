//! Dosewise API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes,
//! auth, collaborators) so integration tests and the binary entrypoint
//! can both access them.

pub mod advisor;
pub mod auth;
pub mod background;
pub mod config;
pub mod error;
pub mod handlers;
pub mod mailer;
pub mod oauth;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
