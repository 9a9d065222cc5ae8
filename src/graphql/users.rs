//! Account resolvers: registration, login, session refresh, password reset

use std::sync::Arc;

use async_graphql::{Context, ErrorExtensions, InputObject, Object, SimpleObject};
use tracing::info;

use crate::auth::cookies::{clear_cookies, CookieSettings};
use crate::auth::jwt::TokenService;
use crate::auth::password::{hash_password, verify_password};
use crate::avatar::avatar_url;
use crate::db::schemas::UserDoc;
use crate::graphql::{
    data, issue_session_cookies, parse_object_id, push_cookies, require_auth, MutationResult,
    ResetLinkBase, SharedMailer,
};
use crate::mail::reset_link;
use crate::store::Stores;
use crate::types::DevLinkError;
use crate::validation::{
    validate_email_input, validate_login, validate_new_password, validate_register,
};

/// Public account fields
#[derive(SimpleObject)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar: String,
}

impl From<&UserDoc> for User {
    fn from(doc: &UserDoc) -> Self {
        Self {
            id: doc.id_hex(),
            name: doc.name.clone(),
            email: doc.email.clone(),
            avatar: doc.avatar.clone(),
        }
    }
}

#[derive(InputObject)]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password2: String,
}

#[derive(InputObject)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(InputObject)]
pub struct ForgotPasswordInput {
    pub email: String,
}

#[derive(InputObject)]
pub struct ResetPasswordInput {
    pub password: String,
    pub password2: String,
}

#[derive(Default)]
pub struct UserQuery;

#[Object]
impl UserQuery {
    /// The authenticated caller, with session cookies reissued
    async fn current(&self, ctx: &Context<'_>) -> async_graphql::Result<User> {
        current(ctx).await.map_err(|e| e.extend())
    }
}

#[derive(Default)]
pub struct UserMutation;

#[Object]
impl UserMutation {
    /// Create an account and start a session
    async fn register(
        &self,
        ctx: &Context<'_>,
        input: RegisterInput,
    ) -> async_graphql::Result<User> {
        register(ctx, input).await.map_err(|e| e.extend())
    }

    /// Authenticate and start a session
    async fn login(&self, ctx: &Context<'_>, input: LoginInput) -> async_graphql::Result<User> {
        login(ctx, input).await.map_err(|e| e.extend())
    }

    /// End the session by expiring both cookies
    async fn logout(&self, ctx: &Context<'_>) -> async_graphql::Result<MutationResult> {
        let settings = data::<CookieSettings>(ctx).map_err(|e| e.extend())?;
        push_cookies(ctx, clear_cookies(settings));
        Ok(MutationResult::ok())
    }

    /// Email a password-reset link; unknown addresses succeed silently
    async fn forgot_password(
        &self,
        ctx: &Context<'_>,
        input: ForgotPasswordInput,
    ) -> async_graphql::Result<MutationResult> {
        forgot_password(ctx, input).await.map_err(|e| e.extend())
    }

    /// Set a new password using an emailed reset token
    async fn reset_password(
        &self,
        ctx: &Context<'_>,
        input: ResetPasswordInput,
    ) -> async_graphql::Result<MutationResult> {
        reset_password(ctx, input).await.map_err(|e| e.extend())
    }
}

async fn current(ctx: &Context<'_>) -> Result<User, DevLinkError> {
    let claims = require_auth(ctx)?;
    let stores = data::<Arc<Stores>>(ctx)?;

    let id = parse_object_id(&claims.sub, "User not found")?;
    let user = stores
        .users
        .find_by_id(&id)
        .await?
        .ok_or_else(|| DevLinkError::NotFound("User not found".into()))?;

    // Sliding session: every authenticated refresh reissues the cookie pair
    issue_session_cookies(ctx, &user)?;

    Ok(User::from(&user))
}

async fn register(ctx: &Context<'_>, input: RegisterInput) -> Result<User, DevLinkError> {
    validate_register(&input.name, &input.email, &input.password, &input.password2)?;

    let stores = data::<Arc<Stores>>(ctx)?;
    if stores.users.find_by_email(&input.email).await?.is_some() {
        return Err(DevLinkError::Conflict("Email already exists".into()));
    }

    let user = stores
        .users
        .insert(UserDoc::new(
            input.name,
            input.email.clone(),
            hash_password(&input.password)?,
            avatar_url(&input.email),
        ))
        .await?;

    info!("Registered user {}", user.id_hex());
    issue_session_cookies(ctx, &user)?;

    Ok(User::from(&user))
}

async fn login(ctx: &Context<'_>, input: LoginInput) -> Result<User, DevLinkError> {
    validate_login(&input.email, &input.password)?;

    let stores = data::<Arc<Stores>>(ctx)?;

    // Same message for unknown email and wrong password
    let denied = || DevLinkError::Authentication("Email or password incorrect".into());

    let user = stores
        .users
        .find_by_email(&input.email)
        .await?
        .ok_or_else(denied)?;

    if !verify_password(&input.password, &user.password_hash)? {
        return Err(denied());
    }

    issue_session_cookies(ctx, &user)?;

    Ok(User::from(&user))
}

async fn forgot_password(
    ctx: &Context<'_>,
    input: ForgotPasswordInput,
) -> Result<MutationResult, DevLinkError> {
    validate_email_input(&input.email)?;

    let stores = data::<Arc<Stores>>(ctx)?;

    // Unknown address still succeeds so callers cannot probe for accounts
    let Some(user) = stores.users.find_by_email(&input.email).await? else {
        return Ok(MutationResult::ok());
    };

    let tokens = data::<Arc<TokenService>>(ctx)?;
    let mailer = data::<SharedMailer>(ctx)?;
    let base = data::<ResetLinkBase>(ctx)?;

    let token = tokens.issue_reset(&user.id_hex())?;
    mailer
        .send_reset_link(&user.email, &reset_link(&base.0, &token))
        .await?;

    Ok(MutationResult::ok())
}

async fn reset_password(
    ctx: &Context<'_>,
    input: ResetPasswordInput,
) -> Result<MutationResult, DevLinkError> {
    // The reset token travels the same channel as a session token; an
    // absent or expired one surfaces as an invalid link
    let claims = require_auth(ctx)
        .map_err(|_| DevLinkError::Authentication("Reset link is invalid or has expired".into()))?;

    validate_new_password(&input.password, &input.password2)?;

    let stores = data::<Arc<Stores>>(ctx)?;
    let id = parse_object_id(&claims.sub, "User no longer exists")?;

    let user = stores
        .users
        .find_by_id(&id)
        .await?
        .ok_or_else(|| DevLinkError::NotFound("User no longer exists".into()))?;

    stores
        .users
        .set_password(&id, &hash_password(&input.password)?)
        .await?;

    info!("Password reset for user {}", user.id_hex());

    Ok(MutationResult::ok())
}
