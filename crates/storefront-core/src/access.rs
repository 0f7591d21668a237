//! # Access Gate
//!
//! Session gate for admin paths. Only checks that a session cookie is
//! present; issuing and verifying sessions belongs to the web layer.
//!
//! ```text
//! request path ──► starts with /admin? ──no──► Allow
//!                        │
//!                       yes
//!                        │
//!                  session cookie? ──yes──► Allow
//!                        │
//!                        no
//!                        ▼
//!              RedirectToLogin (303 → /login)
//! ```

use serde::Serialize;

/// Name of the HttpOnly session cookie.
pub const SESSION_COOKIE: &str = "app.sid";

/// Path prefix that requires a session.
pub const ADMIN_PREFIX: &str = "/admin";

/// Where anonymous admin requests are sent.
pub const LOGIN_PATH: &str = "/login";

/// Status used for the login redirect (See Other).
pub const REDIRECT_STATUS: u16 = 303;

/// Outcome of the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "access", rename_all = "snake_case")]
pub enum Access {
    Allow,
    RedirectToLogin { status: u16, location: &'static str },
}

/// Decides whether a request may proceed.
///
/// ## Example
/// ```rust
/// use storefront_core::{authorize, Access};
///
/// assert_eq!(authorize("/produtos", None), Access::Allow);
/// assert_eq!(authorize("/admin/pedidos", Some("abc")), Access::Allow);
/// assert!(matches!(authorize("/admin", None), Access::RedirectToLogin { .. }));
/// ```
pub fn authorize(path: &str, session_id: Option<&str>) -> Access {
    let has_session = session_id.is_some_and(|id| !id.is_empty());

    if path.starts_with(ADMIN_PREFIX) && !has_session {
        return Access::RedirectToLogin {
            status: REDIRECT_STATUS,
            location: LOGIN_PATH,
        };
    }

    Access::Allow
}

/// `Set-Cookie` value that expires the session cookie on logout.
pub fn logout_cookie() -> String {
    format!(
        "{}=; Path=/; HttpOnly; Expires=Thu, 01 Jan 1970 00:00:00 GMT",
        SESSION_COOKIE
    )
}
