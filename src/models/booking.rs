use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: i64,
    pub booking_code: String,
    pub customer_id: i64,
    pub room_id: i64,
    pub check_in: DateTime<Utc>,
    pub check_out: Option<DateTime<Utc>>,
    pub status: String,
    pub price: Decimal,
    pub advance_paid: Decimal,
    pub people_count: i32,
    pub add_ons: serde_json::Value,
    pub created_by_id: Option<i64>,
    pub created_by_name: Option<String>,
    pub created_by_role: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Booking joined with customer and room columns for list/detail views.
#[derive(Debug, Serialize, FromRow)]
pub struct BookingDisplay {
    pub id: i64,
    pub booking_code: String,
    pub check_in: DateTime<Utc>,
    pub check_out: Option<DateTime<Utc>>,
    pub status: String,
    pub price: Decimal,
    pub customer_name: String,
    pub customer_contact: Option<String>,
    pub room_number: String,
    pub room_category: String,
}

// All fields optional so missing ones surface as a 400 with the field list,
// not a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct CreateBooking {
    pub booking_code: Option<String>,
    pub customer_id: Option<i64>,
    pub room_id: Option<i64>,
    pub check_in: Option<DateTime<Utc>>,
    pub check_out: Option<DateTime<Utc>>,
    pub status: Option<String>,
    pub price: Option<Decimal>,
    pub advance_paid: Option<Decimal>,
    pub people_count: Option<i32>,
    pub add_ons: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBookingStatus {
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CheckoutRequest {
    pub check_out: Option<DateTime<Utc>>,
    // Kept loose on purpose: malformed add-ons degrade to an empty list and a
    // non-numeric total falls back to the computed one.
    pub add_ons: Option<serde_json::Value>,
    pub total_amount: Option<serde_json::Value>,
}
