use axum::{
    extract::{Path, State},
    response::Json,
};
use serde_json::{json, Value};

use crate::{
    database::Database,
    error::ApiError,
    models::{ActiveRoom, Room, RoomInput, RoomWithOccupancy},
};

pub async fn list_rooms(
    State(db): State<Database>,
) -> Result<Json<Vec<RoomWithOccupancy>>, ApiError> {
    let rooms = sqlx::query_as::<_, RoomWithOccupancy>(
        r#"
        SELECT
            r.*,
            COALESCE(SUM(b.people_count), 0) AS current_occupancy
        FROM rooms r
        LEFT JOIN bookings b
            ON b.room_id = r.id
            AND b.status IN ('Confirmed', 'Checked-in')
        GROUP BY r.id
        ORDER BY r.room_number
        "#,
    )
    .fetch_all(&db)
    .await?;

    Ok(Json(rooms))
}

pub async fn get_room(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> Result<Json<Room>, ApiError> {
    let room = sqlx::query_as::<_, Room>("SELECT * FROM rooms WHERE id = $1")
        .bind(id)
        .fetch_optional(&db)
        .await?
        .ok_or_else(|| ApiError::not_found("Room not found"))?;

    Ok(Json(room))
}

pub async fn create_room(
    State(db): State<Database>,
    Json(body): Json<RoomInput>,
) -> Result<Json<Value>, ApiError> {
    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO rooms (room_number, category, status, price_per_night, amenities, add_ons, capacity)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id
        "#,
    )
    .bind(&body.room_number)
    .bind(&body.category)
    .bind(body.status.as_deref().unwrap_or("Available"))
    .bind(body.price_per_night)
    .bind(sqlx::types::Json(body.amenities.unwrap_or_else(|| json!({}))))
    .bind(sqlx::types::Json(body.add_ons.unwrap_or_else(|| json!({}))))
    .bind(body.capacity.unwrap_or(2))
    .fetch_one(&db)
    .await?;

    Ok(Json(json!({ "id": id })))
}

pub async fn update_room(
    State(db): State<Database>,
    Path(id): Path<i64>,
    Json(body): Json<RoomInput>,
) -> Result<Json<Value>, ApiError> {
    let updated = sqlx::query(
        r#"
        UPDATE rooms
        SET room_number = $1, category = $2, status = $3, price_per_night = $4,
            amenities = $5, add_ons = $6, capacity = $7
        WHERE id = $8
        "#,
    )
    .bind(&body.room_number)
    .bind(&body.category)
    .bind(body.status.as_deref().unwrap_or("Available"))
    .bind(body.price_per_night)
    .bind(sqlx::types::Json(body.amenities.unwrap_or_else(|| json!({}))))
    .bind(sqlx::types::Json(body.add_ons.unwrap_or_else(|| json!({}))))
    .bind(body.capacity.unwrap_or(2))
    .bind(id)
    .execute(&db)
    .await?;

    if updated.rows_affected() == 0 {
        return Err(ApiError::not_found("Room not found"));
    }

    Ok(Json(json!({ "updated": true })))
}

pub async fn delete_room(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    // A room holding an active booking must not disappear from under it.
    let in_use = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM bookings WHERE room_id = $1 AND status IN ('Confirmed', 'Checked-in'))",
    )
    .bind(id)
    .fetch_one(&db)
    .await?;
    if in_use {
        return Err(ApiError::conflict("Room has an active booking"));
    }

    let deleted = sqlx::query("DELETE FROM rooms WHERE id = $1")
        .bind(id)
        .execute(&db)
        .await?;
    if deleted.rows_affected() == 0 {
        return Err(ApiError::not_found("Room not found"));
    }

    Ok(Json(json!({ "deleted": true })))
}

// Occupied rooms with the guest currently holding them
pub async fn active_rooms(State(db): State<Database>) -> Result<Json<Vec<ActiveRoom>>, ApiError> {
    let rooms = sqlx::query_as::<_, ActiveRoom>(
        r#"
        SELECT
            r.id AS room_id,
            r.room_number,
            b.booking_code,
            r.capacity,
            b.people_count,
            c.id AS customer_id,
            c.name AS customer_name
        FROM bookings b
        JOIN rooms r ON b.room_id = r.id
        JOIN customers c ON b.customer_id = c.id
        WHERE b.status IN ('Confirmed', 'Checked-in')
        ORDER BY b.id DESC
        "#,
    )
    .fetch_all(&db)
    .await?;

    Ok(Json(rooms))
}
