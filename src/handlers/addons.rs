use axum::{
    extract::{Path, State},
    response::Json,
};
use serde_json::{json, Value};

use crate::{
    database::Database,
    error::ApiError,
    models::addon::{AddOn, AddOnInput},
};

pub async fn list_add_ons(State(db): State<Database>) -> Result<Json<Vec<AddOn>>, ApiError> {
    let add_ons = sqlx::query_as::<_, AddOn>("SELECT * FROM add_ons ORDER BY name")
        .fetch_all(&db)
        .await?;

    Ok(Json(add_ons))
}

pub async fn create_add_on(
    State(db): State<Database>,
    Json(body): Json<AddOnInput>,
) -> Result<Json<AddOn>, ApiError> {
    let (Some(name), Some(price)) = (body.name, body.price) else {
        return Err(ApiError::validation("Name and price are required"));
    };

    let add_on = sqlx::query_as::<_, AddOn>(
        "INSERT INTO add_ons (name, price) VALUES ($1, $2) RETURNING *",
    )
    .bind(&name)
    .bind(price)
    .fetch_one(&db)
    .await?;

    Ok(Json(add_on))
}

pub async fn update_add_on(
    State(db): State<Database>,
    Path(id): Path<i64>,
    Json(body): Json<AddOnInput>,
) -> Result<Json<Value>, ApiError> {
    let (Some(name), Some(price)) = (body.name, body.price) else {
        return Err(ApiError::validation("Name and price are required"));
    };

    let updated = sqlx::query("UPDATE add_ons SET name = $1, price = $2 WHERE id = $3")
        .bind(&name)
        .bind(price)
        .bind(id)
        .execute(&db)
        .await?;
    if updated.rows_affected() == 0 {
        return Err(ApiError::not_found("Add-on not found"));
    }

    Ok(Json(json!({ "updated": true })))
}

pub async fn delete_add_on(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let deleted = sqlx::query("DELETE FROM add_ons WHERE id = $1")
        .bind(id)
        .execute(&db)
        .await?;
    if deleted.rows_affected() == 0 {
        return Err(ApiError::not_found("Add-on not found"));
    }

    Ok(Json(json!({ "deleted": true })))
}
