use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub contact: Option<String>,
    pub email: Option<String>,
    pub id_type: Option<String>,
    pub id_number: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CustomerInput {
    pub name: String,
    pub contact: Option<String>,
    pub email: Option<String>,
    pub id_type: Option<String>,
    pub id_number: Option<String>,
    pub address: Option<String>,
}
