use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct GstSetting {
    pub id: i64,
    pub category: String,
    pub gst_rate: Decimal,
    pub is_enabled: bool,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct GstSettingUpdate {
    pub category: String,
    pub gst_rate: Option<Decimal>,
    pub is_enabled: Option<bool>,
}
