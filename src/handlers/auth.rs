use axum::{extract::State, http::HeaderMap, response::Json};
use serde::Serialize;
use serde_json::{json, Value};
use sqlx::FromRow;
use tower_cookies::{Cookie, Cookies};

use crate::{
    database::Database,
    error::ApiError,
    middleware::current_user,
    models::{ChangePasswordRequest, LoginRequest, Staff, User},
    utils::{create_token, hash_password, verify_password, Claims},
};

#[derive(Debug, Serialize, FromRow)]
pub struct StaffName {
    pub id: i64,
    pub name: String,
}

pub async fn login(
    State(db): State<Database>,
    cookies: Cookies,
    Json(body): Json<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    let (Some(email), Some(password)) = (body.email, body.password) else {
        return Err(ApiError::validation("Email and password required"));
    };

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(&db)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    if !verify_password(&password, &user.password_hash).unwrap_or(false) {
        return Err(ApiError::Unauthorized);
    }

    let (claims, user_json) = if user.role == "staff" {
        let staff = sqlx::query_as::<_, Staff>(
            "SELECT * FROM staff WHERE id = $1 AND status = 'active'",
        )
        .bind(user.staff_id)
        .fetch_optional(&db)
        .await?
        .ok_or_else(|| ApiError::Forbidden("Staff inactive or not found".to_string()))?;

        (
            Claims::new(user.id, "staff".to_string(), staff.name.clone(), Some(staff.id)),
            json!({
                "id": user.id,
                "role": "staff",
                "staff_id": staff.id,
                "name": staff.name,
                "phone": staff.phone,
            }),
        )
    } else {
        (
            Claims::new(user.id, "admin".to_string(), user.name.clone(), None),
            json!({
                "id": user.id,
                "name": user.name,
                "role": "admin",
            }),
        )
    };

    let token = create_token(&claims).map_err(|err| {
        log::error!("token creation failed: {}", err);
        ApiError::Unauthorized
    })?;

    let cookie = Cookie::build(("auth_token", token.clone()))
        .path("/")
        .http_only(true)
        .max_age(time::Duration::hours(24))
        .build();
    cookies.add(cookie);

    Ok(Json(json!({ "token": token, "user": user_json })))
}

pub async fn logout(cookies: Cookies) -> Json<Value> {
    cookies.remove(Cookie::from("auth_token"));
    Json(json!({ "message": "Logged out" }))
}

pub async fn profile(
    State(db): State<Database>,
    headers: HeaderMap,
    cookies: Cookies,
) -> Result<Json<Value>, ApiError> {
    let user = current_user(&headers, &cookies)?;

    if user.role == "staff" {
        if let Some(staff_id) = user.staff_id {
            let staff = sqlx::query_as::<_, Staff>("SELECT * FROM staff WHERE id = $1")
                .bind(staff_id)
                .fetch_optional(&db)
                .await?
                .ok_or_else(|| ApiError::not_found("Staff not found"))?;

            return Ok(Json(json!({
                "id": user.id,
                "role": "staff",
                "staff_id": staff.id,
                "name": staff.name,
                "phone": staff.phone,
                "status": staff.status,
            })));
        }
    }

    Ok(Json(json!({
        "id": user.id,
        "role": user.role,
        "name": user.name,
    })))
}

pub async fn staff_list(State(db): State<Database>) -> Result<Json<Vec<StaffName>>, ApiError> {
    let staff = sqlx::query_as::<_, StaffName>(
        "SELECT id, name FROM staff WHERE status = 'active' ORDER BY name",
    )
    .fetch_all(&db)
    .await?;

    Ok(Json(staff))
}

pub async fn change_password(
    State(db): State<Database>,
    headers: HeaderMap,
    cookies: Cookies,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<Json<Value>, ApiError> {
    let user = current_user(&headers, &cookies)?;

    let (Some(current_password), Some(new_password)) = (body.current_password, body.new_password)
    else {
        return Err(ApiError::validation("Current and new password required"));
    };
    if new_password.len() < 6 {
        return Err(ApiError::validation(
            "Password must be at least 6 characters",
        ));
    }

    let password_hash =
        sqlx::query_scalar::<_, String>("SELECT password_hash FROM users WHERE id = $1")
            .bind(user.id)
            .fetch_optional(&db)
            .await?
            .ok_or_else(|| ApiError::not_found("User not found"))?;

    if !verify_password(&current_password, &password_hash).unwrap_or(false) {
        return Err(ApiError::Forbidden(
            "Current password is incorrect".to_string(),
        ));
    }

    let new_hash = hash_password(&new_password)
        .map_err(|_| ApiError::validation("Failed to process password"))?;

    sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2")
        .bind(&new_hash)
        .bind(user.id)
        .execute(&db)
        .await?;

    Ok(Json(json!({
        "message": "Password changed successfully. Please login again.",
    })))
}
