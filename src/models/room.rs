use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Room {
    pub id: i64,
    pub room_number: String,
    pub category: String,
    pub capacity: i32,
    pub price_per_night: Decimal,
    pub status: String,
    pub amenities: serde_json::Value,
    pub add_ons: serde_json::Value,
}

/// Room row joined with the occupant total of its active bookings.
#[derive(Debug, Serialize, FromRow)]
pub struct RoomWithOccupancy {
    pub id: i64,
    pub room_number: String,
    pub category: String,
    pub capacity: i32,
    pub price_per_night: Decimal,
    pub status: String,
    pub amenities: serde_json::Value,
    pub add_ons: serde_json::Value,
    pub current_occupancy: i64,
}

#[derive(Debug, Deserialize)]
pub struct RoomInput {
    pub room_number: String,
    pub category: String,
    pub capacity: Option<i32>,
    pub price_per_night: Decimal,
    pub status: Option<String>,
    pub amenities: Option<serde_json::Value>,
    pub add_ons: Option<serde_json::Value>,
}

/// One row per occupied room with the guest holding it.
#[derive(Debug, Serialize, FromRow)]
pub struct ActiveRoom {
    pub room_id: i64,
    pub room_number: String,
    pub booking_code: String,
    pub capacity: i32,
    pub people_count: i32,
    pub customer_id: i64,
    pub customer_name: String,
}
