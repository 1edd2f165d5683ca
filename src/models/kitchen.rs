use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct MenuItem {
    pub id: i64,
    pub name: String,
    pub category: Option<String>,
    pub price: Decimal,
    pub stock: i32,
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct MenuItemInput {
    pub name: String,
    pub category: Option<String>,
    pub price: Decimal,
    pub stock: Option<i32>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct MenuCategory {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct MenuCategoryInput {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct KitchenOrder {
    pub id: i64,
    pub booking_id: i64,
    pub room_id: Option<i64>,
    pub item_id: i64,
    pub quantity: i32,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Kitchen order joined with room, guest and menu item for the kitchen view.
#[derive(Debug, Serialize, FromRow)]
pub struct KitchenOrderDisplay {
    pub id: i64,
    pub quantity: i32,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub booking_id: i64,
    pub room_number: Option<String>,
    pub customer_name: String,
    pub item_name: String,
    pub price: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct CreateKitchenOrder {
    pub booking_id: Option<i64>,
    pub room_id: Option<i64>,
    pub item_id: Option<i64>,
    pub quantity: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateKitchenOrderStatus {
    pub status: Option<String>,
}
