use axum::{extract::State, http::HeaderMap, response::Json};
use serde_json::{json, Value};
use tower_cookies::Cookies;

use crate::{
    database::Database,
    error::ApiError,
    middleware::{current_user, require_admin},
    models::{CreateStaff, StaffDisplay},
    utils::hash_password,
};

pub async fn list_staff(
    State(db): State<Database>,
    headers: HeaderMap,
    cookies: Cookies,
) -> Result<Json<Vec<StaffDisplay>>, ApiError> {
    let user = current_user(&headers, &cookies)?;
    require_admin(&user)?;

    let staff = sqlx::query_as::<_, StaffDisplay>(
        r#"
        SELECT
            s.id,
            s.name,
            s.phone,
            s.status,
            s.created_at,
            u.email
        FROM staff s
        LEFT JOIN users u ON u.staff_id = s.id AND u.role = 'staff'
        ORDER BY s.created_at DESC
        "#,
    )
    .fetch_all(&db)
    .await?;

    Ok(Json(staff))
}

/// Adding staff also provisions their login; both rows land or neither does.
pub async fn create_staff(
    State(db): State<Database>,
    headers: HeaderMap,
    cookies: Cookies,
    Json(body): Json<CreateStaff>,
) -> Result<Json<Value>, ApiError> {
    let user = current_user(&headers, &cookies)?;
    require_admin(&user)?;

    let (Some(name), Some(password)) = (body.name, body.password) else {
        return Err(ApiError::validation(
            "Name, phone number and password are required",
        ));
    };
    let name = name.trim().to_string();
    if name.is_empty() || body.phone.as_deref().unwrap_or("").is_empty() {
        return Err(ApiError::validation(
            "Name, phone number and password are required",
        ));
    }
    if password.len() < 6 {
        return Err(ApiError::validation(
            "Password must be at least 6 characters",
        ));
    }

    let password_hash = hash_password(&password)
        .map_err(|_| ApiError::validation("Failed to process password"))?;

    let mut tx = db.begin().await?;

    let staff_id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO staff (name, phone, status) VALUES ($1, $2, 'active') RETURNING id",
    )
    .bind(&name)
    .bind(&body.phone)
    .fetch_one(&mut *tx)
    .await?;

    let email = format!("staff{}@hotel.com", staff_id);

    sqlx::query(
        "INSERT INTO users (name, email, password_hash, role, staff_id) \
         VALUES ($1, $2, $3, 'staff', $4)",
    )
    .bind(&name)
    .bind(&email)
    .bind(&password_hash)
    .bind(staff_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(Json(json!({
        "id": staff_id,
        "name": name,
        "phone": body.phone,
        "status": "active",
    })))
}
