use axum::{
    extract::{Path, State},
    response::Json,
};

use crate::{database::Database, error::ApiError, models::Billing};

pub async fn list_billings(State(db): State<Database>) -> Result<Json<Vec<Billing>>, ApiError> {
    let billings = sqlx::query_as::<_, Billing>("SELECT * FROM billings ORDER BY id DESC")
        .fetch_all(&db)
        .await?;

    Ok(Json(billings))
}

pub async fn get_billing(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> Result<Json<Billing>, ApiError> {
    let billing = sqlx::query_as::<_, Billing>("SELECT * FROM billings WHERE id = $1")
        .bind(id)
        .fetch_optional(&db)
        .await?
        .ok_or_else(|| ApiError::not_found("Billing not found"))?;

    Ok(Json(billing))
}
