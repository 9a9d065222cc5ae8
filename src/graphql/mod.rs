//! GraphQL schema: roots, shared context data, and resolver helpers
//!
//! The schema holds the long-lived services (stores, token service,
//! mailer, cookie settings); each request additionally carries a
//! `Session` and a `CookieSink` the HTTP layer drains into Set-Cookie
//! headers after execution.

pub mod posts;
pub mod profiles;
pub mod users;

use std::sync::{Arc, Mutex};

use async_graphql::{Context, EmptySubscription, MergedObject, Schema, SimpleObject};
use bson::oid::ObjectId;

use crate::auth::cookies::{session_cookies, CookieSettings, Session};
use crate::auth::jwt::{Claims, TokenService};
use crate::db::schemas::UserDoc;
use crate::mail::Mailer;
use crate::store::Stores;
use crate::types::DevLinkError;

pub use posts::{PostMutation, PostQuery};
pub use profiles::{ProfileMutation, ProfileQuery};
pub use users::{UserMutation, UserQuery};

/// Combined query root
#[derive(MergedObject, Default)]
pub struct QueryRoot(UserQuery, ProfileQuery, PostQuery);

/// Combined mutation root
#[derive(MergedObject, Default)]
pub struct MutationRoot(UserMutation, ProfileMutation, PostMutation);

/// The executable schema type
pub type DevLinkSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Front-end base URL for composing password-reset links
#[derive(Clone)]
pub struct ResetLinkBase(pub String);

/// Shared mail transport handle stored in schema data
pub type SharedMailer = Arc<dyn Mailer>;

/// Acknowledgement payload for mutations with no natural return value
#[derive(SimpleObject)]
pub struct MutationResult {
    pub result: String,
}

impl MutationResult {
    pub fn ok() -> Self {
        Self {
            result: "success".to_string(),
        }
    }
}

/// Set-Cookie values pushed by resolvers during one request
#[derive(Default)]
pub struct CookieSink(Mutex<Vec<String>>);

impl CookieSink {
    pub fn push_all(&self, cookies: Vec<String>) {
        if let Ok(mut pending) = self.0.lock() {
            pending.extend(cookies);
        }
    }

    /// Take everything pushed so far
    pub fn drain(&self) -> Vec<String> {
        self.0
            .lock()
            .map(|mut pending| std::mem::take(&mut *pending))
            .unwrap_or_default()
    }
}

/// Build the schema with its long-lived context data
pub fn build_schema(
    stores: Arc<Stores>,
    tokens: Arc<TokenService>,
    mailer: SharedMailer,
    cookie_settings: CookieSettings,
    app_url: String,
) -> DevLinkSchema {
    Schema::build(
        QueryRoot::default(),
        MutationRoot::default(),
        EmptySubscription,
    )
    .data(stores)
    .data(tokens)
    .data(mailer)
    .data(cookie_settings)
    .data(ResetLinkBase(app_url))
    .finish()
}

/// Fetch a schema- or request-level data entry
pub(crate) fn data<'a, T: Send + Sync + 'static>(
    ctx: &Context<'a>,
) -> Result<&'a T, DevLinkError> {
    ctx.data_opt::<T>()
        .ok_or_else(|| DevLinkError::Internal("Missing request context".into()))
}

/// Claims of the authenticated caller, or an authentication error
pub(crate) fn require_auth(ctx: &Context<'_>) -> Result<Claims, DevLinkError> {
    ctx.data_opt::<Session>()
        .and_then(|session| session.0.clone())
        .ok_or_else(|| DevLinkError::Authentication("User not authenticated".into()))
}

/// Parse an id argument, mapping failure to the entity's not-found error
pub(crate) fn parse_object_id(value: &str, missing: &str) -> Result<ObjectId, DevLinkError> {
    ObjectId::parse_str(value).map_err(|_| DevLinkError::NotFound(missing.to_string()))
}

/// Push the session cookie pair for a freshly issued token
pub(crate) fn issue_session_cookies(
    ctx: &Context<'_>,
    user: &UserDoc,
) -> Result<(), DevLinkError> {
    let tokens = data::<Arc<TokenService>>(ctx)?;
    let settings = data::<CookieSettings>(ctx)?;
    let token = tokens.issue_session(user)?;
    push_cookies(ctx, session_cookies(settings, &token));
    Ok(())
}

/// Hand Set-Cookie values to the request's sink, if one is attached
pub(crate) fn push_cookies(ctx: &Context<'_>, cookies: Vec<String>) {
    if let Some(sink) = ctx.data_opt::<Arc<CookieSink>>() {
        sink.push_all(cookies);
    }
}

/// RFC 3339 rendering for stored timestamps
pub(crate) fn fmt_datetime(dt: bson::DateTime) -> String {
    dt.to_chrono().to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_sink_accumulates_and_drains() {
        let sink = CookieSink::default();
        sink.push_all(vec!["a=1".to_string()]);
        sink.push_all(vec!["b=2".to_string(), "c=3".to_string()]);

        let drained = sink.drain();
        assert_eq!(drained, vec!["a=1", "b=2", "c=3"]);
        assert!(sink.drain().is_empty());
    }

    #[test]
    fn object_id_parse_maps_to_not_found() {
        assert!(parse_object_id("507f1f77bcf86cd799439011", "Post not found").is_ok());
        let err = parse_object_id("nope", "Post not found").unwrap_err();
        assert_eq!(err.code(), "NOT_FOUND");
        assert_eq!(err.to_string(), "Post not found");
    }
}
