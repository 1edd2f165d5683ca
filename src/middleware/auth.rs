use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};
use tower_cookies::Cookies;

use crate::{error::ApiError, utils::verify_token};

/// The authenticated identity attached to a request, decoded from the JWT.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: i64,
    pub role: String,
    pub name: String,
    pub staff_id: Option<i64>,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|t| t.to_string())
}

/// Resolve the current user from the Authorization header, falling back to
/// the auth_token cookie.
pub fn current_user(headers: &HeaderMap, cookies: &Cookies) -> Result<AuthUser, ApiError> {
    let token = bearer_token(headers)
        .or_else(|| cookies.get("auth_token").map(|c| c.value().to_string()))
        .ok_or(ApiError::Unauthorized)?;

    let claims = verify_token(&token).map_err(|_| ApiError::Unauthorized)?;

    Ok(AuthUser {
        id: claims.sub,
        role: claims.role,
        name: claims.name,
        staff_id: claims.staff_id,
    })
}

pub fn require_admin(user: &AuthUser) -> Result<(), ApiError> {
    if !user.is_admin() {
        return Err(ApiError::Forbidden("Admin access required".to_string()));
    }
    Ok(())
}
