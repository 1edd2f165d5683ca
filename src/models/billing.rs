use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Immutable invoice snapshot, written exactly once per checked-out booking.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Billing {
    pub id: i64,
    pub booking_id: i64,
    pub customer_id: i64,
    pub room_id: i64,
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
    pub room_price: Decimal,
    pub advance_paid: Decimal,
    pub add_ons: serde_json::Value,
    pub kitchen_orders: serde_json::Value,
    pub total_amount: Decimal,
    pub billed_by_id: Option<i64>,
    pub billed_by_name: Option<String>,
    pub billed_by_role: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A normalized ad-hoc charge attached at checkout time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddOnCharge {
    pub description: String,
    pub amount: Decimal,
}

/// One aggregated kitchen line: quantities summed per menu item, priced at
/// the item's current price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KitchenLine {
    pub item_id: i64,
    pub item_name: String,
    pub item_price: Decimal,
    pub quantity: i64,
}

#[derive(Debug, Serialize)]
pub struct BilledBy {
    pub id: i64,
    pub name: String,
    pub role: String,
}

#[derive(Debug, Serialize)]
pub struct BillingSummary {
    pub booking_code: String,
    pub booking_db_id: i64,
    pub room_id: i64,
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
    pub room_price: Decimal,
    pub advance_paid: Decimal,
    pub add_ons: Vec<AddOnCharge>,
    pub kitchen_orders: Vec<KitchenLine>,
    pub total_amount: Decimal,
    pub balance_due: Decimal,
    pub billed_by: BilledBy,
}
