//! DevLink - GraphQL API server for the developer network
//!
//! DevLink backs a social network for developers: accounts with
//! cookie-based JWT sessions, public profiles with embedded work and
//! education history, and a post feed with likes and comments, all over
//! MongoDB behind a single /graphql endpoint.
//!
//! ## Layers
//!
//! - **auth**: argon2 password hashing, JWT session/reset tokens, cookies
//! - **db**: typed MongoDB collections with schema-declared indexes
//! - **store**: persistence operations over the collections
//! - **validation**: per-field input checks surfaced as GraphQL extensions
//! - **graphql**: the schema and resolvers
//! - **routes/server**: hyper HTTP front with CORS and cookie plumbing

pub mod auth;
pub mod avatar;
pub mod config;
pub mod db;
pub mod graphql;
pub mod mail;
pub mod routes;
pub mod server;
pub mod store;
pub mod types;
pub mod validation;

pub use config::Args;
pub use server::{run, AppState};
pub use types::{DevLinkError, Result};
