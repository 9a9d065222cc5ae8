//! Authentication for DevLink
//!
//! Provides:
//! - JWT session and password-reset tokens
//! - Cookie extraction and the Set-Cookie pair (token + checkToken)
//! - Password hashing with Argon2

pub mod cookies;
pub mod jwt;
pub mod password;

pub use cookies::{clear_cookies, extract_token, session_cookies, CookieSettings, Session};
pub use jwt::{Claims, TokenService};
pub use password::{hash_password, verify_password};
