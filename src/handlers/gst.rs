use axum::{extract::State, http::HeaderMap, response::Json};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tower_cookies::Cookies;

use crate::{
    database::Database,
    error::ApiError,
    middleware::current_user,
    models::{GstSetting, GstSettingUpdate},
};

pub async fn get_settings(
    State(db): State<Database>,
    headers: HeaderMap,
    cookies: Cookies,
) -> Result<Json<Vec<GstSetting>>, ApiError> {
    current_user(&headers, &cookies)?;

    let settings = sqlx::query_as::<_, GstSetting>("SELECT * FROM gst_settings ORDER BY category")
        .fetch_all(&db)
        .await?;

    Ok(Json(settings))
}

pub async fn update_settings(
    State(db): State<Database>,
    headers: HeaderMap,
    cookies: Cookies,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    current_user(&headers, &cookies)?;

    if !body.is_array() {
        return Err(ApiError::validation("Invalid GST payload format"));
    }
    let settings: Vec<GstSettingUpdate> = serde_json::from_value(body)
        .map_err(|_| ApiError::validation("Invalid GST payload format"))?;

    let mut tx = db.begin().await?;

    for setting in &settings {
        let updated = sqlx::query(
            "UPDATE gst_settings SET gst_rate = $1, is_enabled = $2, updated_at = NOW() \
             WHERE category = $3",
        )
        .bind(setting.gst_rate.unwrap_or(Decimal::ZERO))
        .bind(setting.is_enabled.unwrap_or(false))
        .bind(&setting.category)
        .execute(&mut *tx)
        .await?;

        log::info!(
            "GST updated: {} -> rows affected: {}",
            setting.category,
            updated.rows_affected()
        );
    }

    tx.commit().await?;

    Ok(Json(json!({ "message": "GST settings updated successfully" })))
}
