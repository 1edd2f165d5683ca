use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Catalog entry for a bookable extra (spa, extra bed, late checkout).
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct AddOn {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct AddOnInput {
    pub name: Option<String>,
    pub price: Option<Decimal>,
}
