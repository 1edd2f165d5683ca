use axum::{
    extract::{Path, State},
    response::Json,
};
use serde_json::{json, Value};

use crate::{
    database::Database,
    error::ApiError,
    models::{Customer, CustomerInput},
};

pub async fn list_customers(State(db): State<Database>) -> Result<Json<Vec<Customer>>, ApiError> {
    let customers = sqlx::query_as::<_, Customer>("SELECT * FROM customers ORDER BY id DESC")
        .fetch_all(&db)
        .await?;

    Ok(Json(customers))
}

pub async fn get_customer(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> Result<Json<Customer>, ApiError> {
    let customer = sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE id = $1")
        .bind(id)
        .fetch_optional(&db)
        .await?
        .ok_or_else(|| ApiError::not_found("Customer not found"))?;

    Ok(Json(customer))
}

pub async fn create_customer(
    State(db): State<Database>,
    Json(body): Json<CustomerInput>,
) -> Result<Json<Value>, ApiError> {
    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO customers (name, contact, email, id_type, id_number, address)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id
        "#,
    )
    .bind(&body.name)
    .bind(&body.contact)
    .bind(&body.email)
    .bind(&body.id_type)
    .bind(&body.id_number)
    .bind(&body.address)
    .fetch_one(&db)
    .await?;

    Ok(Json(json!({ "id": id, "message": "Customer added" })))
}

pub async fn update_customer(
    State(db): State<Database>,
    Path(id): Path<i64>,
    Json(body): Json<CustomerInput>,
) -> Result<Json<Value>, ApiError> {
    let updated = sqlx::query(
        r#"
        UPDATE customers
        SET name = $1, contact = $2, email = $3, id_type = $4, id_number = $5, address = $6
        WHERE id = $7
        "#,
    )
    .bind(&body.name)
    .bind(&body.contact)
    .bind(&body.email)
    .bind(&body.id_type)
    .bind(&body.id_number)
    .bind(&body.address)
    .bind(id)
    .execute(&db)
    .await?;

    if updated.rows_affected() == 0 {
        return Err(ApiError::not_found("Customer not found"));
    }

    Ok(Json(json!({ "message": "Customer updated" })))
}

pub async fn delete_customer(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let deleted = sqlx::query("DELETE FROM customers WHERE id = $1")
        .bind(id)
        .execute(&db)
        .await?;
    if deleted.rows_affected() == 0 {
        return Err(ApiError::not_found("Customer not found"));
    }

    Ok(Json(json!({ "message": "Customer deleted" })))
}
