use axum::{
    extract::{Path, State},
    response::Json,
};
use serde_json::{json, Value};

use crate::{
    database::Database,
    error::ApiError,
    models::{
        CreateKitchenOrder, KitchenOrderDisplay, MenuCategory, MenuCategoryInput, MenuItem,
        MenuItemInput, UpdateKitchenOrderStatus,
    },
};

// ================= MENU ITEMS =================

pub async fn list_menu_items(State(db): State<Database>) -> Result<Json<Vec<MenuItem>>, ApiError> {
    let items = sqlx::query_as::<_, MenuItem>("SELECT * FROM menu_items ORDER BY category, name")
        .fetch_all(&db)
        .await?;

    Ok(Json(items))
}

pub async fn get_menu_item(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> Result<Json<MenuItem>, ApiError> {
    let item = sqlx::query_as::<_, MenuItem>("SELECT * FROM menu_items WHERE id = $1")
        .bind(id)
        .fetch_optional(&db)
        .await?
        .ok_or_else(|| ApiError::not_found("Menu item not found"))?;

    Ok(Json(item))
}

pub async fn create_menu_item(
    State(db): State<Database>,
    Json(body): Json<MenuItemInput>,
) -> Result<Json<Value>, ApiError> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO menu_items (name, category, price, stock, status) VALUES ($1, $2, $3, $4, $5) RETURNING id",
    )
    .bind(&body.name)
    .bind(&body.category)
    .bind(body.price)
    .bind(body.stock.unwrap_or(0))
    .bind(body.status.as_deref().unwrap_or("Available"))
    .fetch_one(&db)
    .await?;

    Ok(Json(json!({ "id": id, "message": "Menu item created" })))
}

pub async fn update_menu_item(
    State(db): State<Database>,
    Path(id): Path<i64>,
    Json(body): Json<MenuItemInput>,
) -> Result<Json<Value>, ApiError> {
    let updated = sqlx::query(
        "UPDATE menu_items SET name = $1, category = $2, price = $3, stock = $4, status = $5 WHERE id = $6",
    )
    .bind(&body.name)
    .bind(&body.category)
    .bind(body.price)
    .bind(body.stock.unwrap_or(0))
    .bind(body.status.as_deref().unwrap_or("Available"))
    .bind(id)
    .execute(&db)
    .await?;

    if updated.rows_affected() == 0 {
        return Err(ApiError::not_found("Menu item not found"));
    }

    Ok(Json(json!({ "message": "Menu item updated" })))
}

pub async fn delete_menu_item(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let deleted = sqlx::query("DELETE FROM menu_items WHERE id = $1")
        .bind(id)
        .execute(&db)
        .await?;
    if deleted.rows_affected() == 0 {
        return Err(ApiError::not_found("Menu item not found"));
    }

    Ok(Json(json!({ "message": "Menu item deleted" })))
}

// ================= CATEGORIES =================

pub async fn list_categories(
    State(db): State<Database>,
) -> Result<Json<Vec<MenuCategory>>, ApiError> {
    let categories = sqlx::query_as::<_, MenuCategory>("SELECT * FROM categories ORDER BY name")
        .fetch_all(&db)
        .await?;

    Ok(Json(categories))
}

pub async fn create_category(
    State(db): State<Database>,
    Json(body): Json<MenuCategoryInput>,
) -> Result<Json<Value>, ApiError> {
    let id = sqlx::query_scalar::<_, i64>("INSERT INTO categories (name) VALUES ($1) RETURNING id")
        .bind(&body.name)
        .fetch_one(&db)
        .await?;

    Ok(Json(json!({ "id": id, "message": "Category created" })))
}

pub async fn delete_category(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let deleted = sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(id)
        .execute(&db)
        .await?;
    if deleted.rows_affected() == 0 {
        return Err(ApiError::not_found("Category not found"));
    }

    Ok(Json(json!({ "message": "Category deleted" })))
}

// ================= KITCHEN ORDERS =================

pub async fn list_kitchen_orders(
    State(db): State<Database>,
) -> Result<Json<Vec<KitchenOrderDisplay>>, ApiError> {
    let orders = sqlx::query_as::<_, KitchenOrderDisplay>(
        r#"
        SELECT
            ko.id,
            ko.quantity,
            ko.status,
            ko.created_at,
            ko.booking_id,
            r.room_number,
            c.name AS customer_name,
            mi.name AS item_name,
            mi.price AS price
        FROM kitchen_orders ko
        JOIN bookings b ON ko.booking_id = b.id
        LEFT JOIN rooms r ON ko.room_id = r.id
        JOIN customers c ON b.customer_id = c.id
        JOIN menu_items mi ON ko.item_id = mi.id
        ORDER BY ko.created_at DESC
        "#,
    )
    .fetch_all(&db)
    .await?;

    Ok(Json(orders))
}

pub async fn create_kitchen_order(
    State(db): State<Database>,
    Json(body): Json<CreateKitchenOrder>,
) -> Result<Json<Value>, ApiError> {
    let (Some(booking_id), Some(item_id), Some(quantity)) =
        (body.booking_id, body.item_id, body.quantity)
    else {
        return Err(ApiError::validation(
            "booking_id, item_id and quantity are required",
        ));
    };

    let booking_exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM bookings WHERE id = $1)")
            .bind(booking_id)
            .fetch_one(&db)
            .await?;
    if !booking_exists {
        return Err(ApiError::not_found("Booking not found"));
    }

    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO kitchen_orders (room_id, booking_id, item_id, quantity, status) \
         VALUES ($1, $2, $3, $4, 'Pending') RETURNING id",
    )
    .bind(body.room_id)
    .bind(booking_id)
    .bind(item_id)
    .bind(quantity)
    .fetch_one(&db)
    .await?;

    Ok(Json(json!({ "id": id, "message": "Order added" })))
}

pub async fn update_kitchen_order_status(
    State(db): State<Database>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateKitchenOrderStatus>,
) -> Result<Json<Value>, ApiError> {
    let status = body
        .status
        .ok_or_else(|| ApiError::validation("status is required"))?;

    // Settled marks billed consumption; only a checkout may assign it.
    match status.as_str() {
        "Pending" | "Served" | "Cancelled" => {}
        "Settled" => {
            return Err(ApiError::validation(
                "Settled is assigned by checkout, not directly",
            ));
        }
        other => {
            return Err(ApiError::validation(format!(
                "Unknown kitchen order status: {}",
                other
            )));
        }
    }

    let updated = sqlx::query("UPDATE kitchen_orders SET status = $1 WHERE id = $2")
        .bind(&status)
        .bind(id)
        .execute(&db)
        .await?;
    if updated.rows_affected() == 0 {
        return Err(ApiError::not_found("Kitchen order not found"));
    }

    Ok(Json(json!({ "message": "Kitchen order status updated" })))
}
