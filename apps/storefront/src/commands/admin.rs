//! # Admin Gate Commands
//!
//! Exposes the session gate and the logout cookie.

use serde::Serialize;
use tracing::debug;

use storefront_core::access::{logout_cookie, SESSION_COOKIE};
use storefront_core::{authorize, Access};

/// Result of checking a path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GateResponse {
    pub path: String,
    #[serde(flatten)]
    pub access: Access,
}

/// Response to a logout request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutResponse {
    pub cookie: &'static str,
    pub set_cookie: String,
}

/// Decides whether a request for `path` may proceed.
pub fn check_access(path: &str, session_id: Option<&str>) -> GateResponse {
    let access = authorize(path, session_id);
    debug!(path = %path, ?access, "check_access command");

    GateResponse {
        path: path.to_string(),
        access,
    }
}

/// Ends the session by expiring its cookie.
pub fn logout() -> LogoutResponse {
    debug!("logout command");

    LogoutResponse {
        cookie: SESSION_COOKIE,
        set_cookie: logout_cookie(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_json() {
        let json = serde_json::to_value(check_access("/admin/orders", None)).unwrap();
        assert_eq!(json["path"], "/admin/orders");
        assert_eq!(json["access"], "redirect_to_login");
        assert_eq!(json["status"], 303);
        assert_eq!(json["location"], "/login");

        let json = serde_json::to_value(check_access("/admin", Some("abc"))).unwrap();
        assert_eq!(json["access"], "allow");
    }

    #[test]
    fn test_logout_expires_cookie() {
        let response = logout();
        assert_eq!(response.cookie, "app.sid");
        assert!(response.set_cookie.starts_with("app.sid=;"));
    }
}
