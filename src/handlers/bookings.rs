use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::PgConnection;
use tower_cookies::Cookies;

use crate::{
    database::Database,
    error::ApiError,
    middleware::{current_user, AuthUser},
    models::{
        AddOnCharge, BilledBy, BillingSummary, Booking, BookingDisplay, CheckoutRequest,
        CreateBooking, KitchenLine, UpdateBookingStatus,
    },
};

pub async fn list_bookings(
    State(db): State<Database>,
) -> Result<Json<Vec<BookingDisplay>>, ApiError> {
    let bookings = sqlx::query_as::<_, BookingDisplay>(
        r#"
        SELECT
            b.id,
            b.booking_code,
            b.check_in,
            b.check_out,
            b.status,
            b.price,
            c.name AS customer_name,
            c.contact AS customer_contact,
            r.room_number,
            r.category AS room_category
        FROM bookings b
        JOIN customers c ON b.customer_id = c.id
        JOIN rooms r ON b.room_id = r.id
        ORDER BY b.id DESC
        "#,
    )
    .fetch_all(&db)
    .await?;

    Ok(Json(bookings))
}

pub async fn get_booking(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> Result<Json<BookingDisplay>, ApiError> {
    let booking = sqlx::query_as::<_, BookingDisplay>(
        r#"
        SELECT
            b.id,
            b.booking_code,
            b.check_in,
            b.check_out,
            b.status,
            b.price,
            c.name AS customer_name,
            c.contact AS customer_contact,
            r.room_number,
            r.category AS room_category
        FROM bookings b
        JOIN customers c ON b.customer_id = c.id
        JOIN rooms r ON b.room_id = r.id
        WHERE b.id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(&db)
    .await?
    .ok_or_else(|| ApiError::not_found("Booking not found"))?;

    Ok(Json(booking))
}

pub async fn create_booking(
    State(db): State<Database>,
    headers: HeaderMap,
    cookies: Cookies,
    Json(body): Json<CreateBooking>,
) -> Result<Json<Value>, ApiError> {
    let user = current_user(&headers, &cookies)?;

    let (Some(booking_code), Some(customer_id), Some(room_id), Some(price)) = (
        body.booking_code.clone(),
        body.customer_id,
        body.room_id,
        body.price,
    ) else {
        return Err(ApiError::validation(
            "booking_code, customer_id, room_id and price are required",
        ));
    };

    let check_in = body.check_in.unwrap_or_else(Utc::now);
    let status = body.status.unwrap_or_else(|| "Confirmed".to_string());

    let mut tx = db.begin().await?;

    let room_exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM rooms WHERE id = $1)")
        .bind(room_id)
        .fetch_one(&mut *tx)
        .await?;
    if !room_exists {
        return Err(ApiError::not_found("Room not found"));
    }

    let customer_exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM customers WHERE id = $1)")
            .bind(customer_id)
            .fetch_one(&mut *tx)
            .await?;
    if !customer_exists {
        return Err(ApiError::not_found("Customer not found"));
    }

    if !room_is_available(&mut tx, room_id, check_in, body.check_out).await? {
        return Err(ApiError::conflict(
            "Room is not available for the requested dates",
        ));
    }

    let booking_id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO bookings
            (booking_code, customer_id, room_id, check_in, check_out, status, price,
             advance_paid, people_count, add_ons, created_by_id, created_by_name, created_by_role)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        RETURNING id
        "#,
    )
    .bind(&booking_code)
    .bind(customer_id)
    .bind(room_id)
    .bind(check_in)
    .bind(body.check_out)
    .bind(&status)
    .bind(price)
    .bind(body.advance_paid.unwrap_or_default())
    .bind(body.people_count.unwrap_or(1))
    .bind(sqlx::types::Json(body.add_ons.unwrap_or_else(|| json!([]))))
    .bind(user.id)
    .bind(&user.name)
    .bind(&user.role)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("UPDATE rooms SET status = $1 WHERE id = $2")
        .bind(room_status_for(&status))
        .bind(room_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(Json(json!({
        "id": booking_id,
        "booking_code": booking_code,
        "message": "Booking created and room status updated",
    })))
}

pub async fn update_booking_status(
    State(db): State<Database>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateBookingStatus>,
) -> Result<Json<Value>, ApiError> {
    let status = body
        .status
        .ok_or_else(|| ApiError::validation("No valid fields provided"))?;

    match status.as_str() {
        "Confirmed" | "Checked-in" => {}
        "Checked-out" => {
            return Err(ApiError::validation(
                "Checked-out is only reachable through the checkout endpoint",
            ));
        }
        other => {
            return Err(ApiError::validation(format!("Unknown booking status: {}", other)));
        }
    }

    let mut tx = db.begin().await?;

    let room_id = sqlx::query_scalar::<_, i64>("SELECT room_id FROM bookings WHERE id = $1")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| ApiError::not_found("Booking not found"))?;

    // Checked-out bookings are terminal; the guard keeps them that way.
    let updated = sqlx::query(
        "UPDATE bookings SET status = $1 WHERE id = $2 AND status != 'Checked-out'",
    )
    .bind(&status)
    .bind(id)
    .execute(&mut *tx)
    .await?;
    if updated.rows_affected() == 0 {
        return Err(ApiError::conflict("Booking is already checked out"));
    }

    sqlx::query("UPDATE rooms SET status = $1 WHERE id = $2")
        .bind(room_status_for(&status))
        .bind(room_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(Json(json!({ "message": "Status updated successfully" })))
}

pub async fn delete_booking(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let deleted = sqlx::query("DELETE FROM bookings WHERE id = $1")
        .bind(id)
        .execute(&db)
        .await?;
    if deleted.rows_affected() == 0 {
        return Err(ApiError::not_found("Booking not found"));
    }

    Ok(Json(json!({ "message": "Booking deleted" })))
}

/// Close out a stay: one transaction that flips the booking to Checked-out,
/// releases the room, folds unbilled kitchen consumption into the invoice,
/// writes the billing snapshot and settles the consumed orders. Concurrent
/// calls for the same booking are decided by the conditional status update:
/// exactly one of them commits a billing row.
pub async fn checkout(
    State(db): State<Database>,
    headers: HeaderMap,
    cookies: Cookies,
    Path(id): Path<i64>,
    body: Option<Json<CheckoutRequest>>,
) -> Result<Json<Value>, ApiError> {
    let user = current_user(&headers, &cookies)?;
    let req = body.map(|Json(b)| b).unwrap_or_default();

    let mut tx = db.begin().await?;

    // 1) Fresh booking row.
    let booking = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| ApiError::not_found("Booking not found"))?;

    // 2) Early refusal; the conditional update below closes the remaining race.
    if booking.status == "Checked-out" {
        return Err(ApiError::conflict("Booking already checked out"));
    }

    // 3) Request override, then the scheduled check-out, then now.
    let check_out = req.check_out.or(booking.check_out).unwrap_or_else(Utc::now);

    // 4) Compare-and-set: only one concurrent checkout observes a nonzero
    //    row count here; the loser rolls back.
    let updated = sqlx::query(
        "UPDATE bookings SET status = 'Checked-out', check_out = $1 \
         WHERE id = $2 AND status != 'Checked-out'",
    )
    .bind(check_out)
    .bind(id)
    .execute(&mut *tx)
    .await?;
    if updated.rows_affected() == 0 {
        return Err(ApiError::conflict(
            "Checkout conflict: booking status unchanged",
        ));
    }

    // 5) Release the room.
    sqlx::query("UPDATE rooms SET status = 'Available' WHERE id = $1")
        .bind(booking.room_id)
        .execute(&mut *tx)
        .await?;

    // 6) Aggregate unsettled kitchen consumption.
    let orders = unsettled_kitchen_orders(&mut tx, booking.id).await?;
    let order_ids: Vec<i64> = orders.iter().map(|o| o.id).collect();
    let kitchen_lines = fold_kitchen_orders(&orders);

    // 7) Ad-hoc add-on charges from the request body.
    let add_ons = normalize_add_ons(req.add_ons.as_ref());

    // 8) Caller-supplied numeric total wins over the computed one; the
    //    discrepancy is kept in the log as the audit trail.
    let computed_total = compute_total(booking.price, &kitchen_lines, &add_ons);
    let total_amount = match override_total(req.total_amount.as_ref()) {
        Some(explicit) => {
            if explicit != computed_total {
                log::warn!(
                    "checkout of booking {}: computed total {} overridden with {}",
                    booking.id,
                    computed_total,
                    explicit
                );
            }
            explicit
        }
        None => computed_total,
    };

    // 9) Stamp the billing with who performed the checkout.
    let billed_by = resolve_actor(&mut tx, &user).await?;

    // 10) The invoice snapshot.
    sqlx::query(
        r#"
        INSERT INTO billings
            (booking_id, customer_id, room_id, check_in, check_out, room_price,
             advance_paid, add_ons, kitchen_orders, total_amount,
             billed_by_id, billed_by_name, billed_by_role)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        "#,
    )
    .bind(booking.id)
    .bind(booking.customer_id)
    .bind(booking.room_id)
    .bind(booking.check_in)
    .bind(check_out)
    .bind(booking.price)
    .bind(booking.advance_paid)
    .bind(sqlx::types::Json(&add_ons))
    .bind(sqlx::types::Json(&kitchen_lines))
    .bind(total_amount)
    .bind(billed_by.id)
    .bind(&billed_by.name)
    .bind(&billed_by.role)
    .execute(&mut *tx)
    .await?;

    // 11) Settle what was billed so it is never billed again.
    if !order_ids.is_empty() {
        sqlx::query("UPDATE kitchen_orders SET status = 'Settled' WHERE id = ANY($1)")
            .bind(&order_ids)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    let summary = BillingSummary {
        booking_code: booking.booking_code,
        booking_db_id: booking.id,
        room_id: booking.room_id,
        check_in: booking.check_in,
        check_out,
        room_price: booking.price,
        advance_paid: booking.advance_paid,
        add_ons,
        kitchen_orders: kitchen_lines,
        total_amount,
        balance_due: total_amount - booking.advance_paid,
        billed_by,
    };

    Ok(Json(json!({
        "message": "Checked out successfully",
        "billing_summary": summary,
    })))
}

// ----------------- Availability -----------------

/// Half-open interval overlap; a missing check-out on either side is
/// open-ended.
fn overlaps(
    existing: (DateTime<Utc>, Option<DateTime<Utc>>),
    proposed: (DateTime<Utc>, Option<DateTime<Utc>>),
) -> bool {
    let existing_starts_before_proposed_ends = match proposed.1 {
        Some(proposed_end) => existing.0 < proposed_end,
        None => true,
    };
    let existing_ends_after_proposed_starts = match existing.1 {
        Some(existing_end) => existing_end > proposed.0,
        None => true,
    };
    existing_starts_before_proposed_ends && existing_ends_after_proposed_starts
}

async fn room_is_available(
    conn: &mut PgConnection,
    room_id: i64,
    check_in: DateTime<Utc>,
    check_out: Option<DateTime<Utc>>,
) -> Result<bool, sqlx::Error> {
    let active = sqlx::query_as::<_, (DateTime<Utc>, Option<DateTime<Utc>>)>(
        "SELECT check_in, check_out FROM bookings \
         WHERE room_id = $1 AND status IN ('Confirmed', 'Checked-in')",
    )
    .bind(room_id)
    .fetch_all(conn)
    .await?;

    Ok(!active
        .into_iter()
        .any(|existing| overlaps(existing, (check_in, check_out))))
}

fn room_status_for(booking_status: &str) -> &'static str {
    if booking_status == "Checked-in" {
        "Occupied"
    } else {
        "Booked"
    }
}

// ----------------- Kitchen aggregation -----------------

#[derive(Debug, sqlx::FromRow)]
struct UnsettledOrder {
    id: i64,
    item_id: i64,
    quantity: i32,
    item_name: String,
    item_price: Decimal,
}

/// Kitchen orders for the booking that have not been billed yet (Pending or
/// Served); Settled and Cancelled are excluded. Read-only; the returned ids
/// drive the settlement step.
async fn unsettled_kitchen_orders(
    conn: &mut PgConnection,
    booking_id: i64,
) -> Result<Vec<UnsettledOrder>, sqlx::Error> {
    sqlx::query_as::<_, UnsettledOrder>(
        r#"
        SELECT ko.id, ko.item_id, ko.quantity, mi.name AS item_name, mi.price AS item_price
        FROM kitchen_orders ko
        JOIN menu_items mi ON ko.item_id = mi.id
        WHERE ko.booking_id = $1
          AND ko.status IN ('Pending', 'Served')
        ORDER BY ko.id
        "#,
    )
    .bind(booking_id)
    .fetch_all(conn)
    .await
}

fn fold_kitchen_orders(orders: &[UnsettledOrder]) -> Vec<KitchenLine> {
    let mut lines: Vec<KitchenLine> = Vec::new();
    for order in orders {
        match lines.iter_mut().find(|l| l.item_id == order.item_id) {
            Some(line) => line.quantity += order.quantity as i64,
            None => lines.push(KitchenLine {
                item_id: order.item_id,
                item_name: order.item_name.clone(),
                item_price: order.item_price,
                quantity: order.quantity as i64,
            }),
        }
    }
    lines
}

// ----------------- Totals and add-ons -----------------

// The two accepted wire shapes for an add-on entry. Entries matching neither
// are dropped.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AddOnInput {
    Canonical { description: String, amount: Decimal },
    Named { name: String, price: Decimal },
}

/// Coerce the caller-supplied add-on list to `{description, amount}` pairs.
/// Accepts a JSON array, or a string containing one; anything else is an
/// empty list, never an error.
fn normalize_add_ons(value: Option<&Value>) -> Vec<AddOnCharge> {
    let parsed;
    let value = match value {
        Some(Value::String(raw)) => {
            parsed = serde_json::from_str::<Value>(raw).ok();
            parsed.as_ref()
        }
        other => other,
    };

    let Some(Value::Array(entries)) = value else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| match serde_json::from_value(entry.clone()) {
            Ok(AddOnInput::Canonical {
                description,
                amount,
            }) => Some(AddOnCharge {
                description,
                amount,
            }),
            Ok(AddOnInput::Named { name, price }) => Some(AddOnCharge {
                description: name,
                amount: price,
            }),
            Err(_) => None,
        })
        .collect()
}

fn kitchen_subtotal(lines: &[KitchenLine]) -> Decimal {
    lines
        .iter()
        .map(|l| l.item_price * Decimal::from(l.quantity))
        .sum()
}

fn compute_total(room_price: Decimal, kitchen: &[KitchenLine], add_ons: &[AddOnCharge]) -> Decimal {
    room_price + kitchen_subtotal(kitchen) + add_ons.iter().map(|a| a.amount).sum::<Decimal>()
}

/// A total override only counts when it is an actual JSON number.
fn override_total(value: Option<&Value>) -> Option<Decimal> {
    match value? {
        Value::Number(n) => Decimal::from_f64_retain(n.as_f64()?),
        _ => None,
    }
}

// ----------------- Actor resolution -----------------

async fn resolve_actor(
    conn: &mut PgConnection,
    user: &AuthUser,
) -> Result<BilledBy, sqlx::Error> {
    let name = if user.role == "staff" {
        match user.staff_id {
            Some(staff_id) => {
                sqlx::query_scalar::<_, String>("SELECT name FROM staff WHERE id = $1")
                    .bind(staff_id)
                    .fetch_optional(conn)
                    .await?
            }
            None => None,
        }
    } else {
        sqlx::query_scalar::<_, String>("SELECT name FROM users WHERE id = $1")
            .bind(user.id)
            .fetch_optional(conn)
            .await?
    };

    Ok(BilledBy {
        id: user.id,
        name: name.unwrap_or_else(|| user.name.clone()),
        role: user.role.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, d, 12, 0, 0).unwrap()
    }

    fn line(item_id: i64, price: i64, quantity: i64) -> KitchenLine {
        KitchenLine {
            item_id,
            item_name: format!("item-{}", item_id),
            item_price: Decimal::from(price),
            quantity,
        }
    }

    #[test]
    fn overlapping_intervals_conflict() {
        let existing = (day(10), Some(day(15)));
        assert!(overlaps(existing, (day(12), Some(day(14)))));
        assert!(overlaps(existing, (day(8), Some(day(11)))));
        assert!(overlaps(existing, (day(14), Some(day(20)))));
        assert!(overlaps(existing, (day(8), Some(day(20)))));
    }

    #[test]
    fn touching_intervals_do_not_conflict() {
        let existing = (day(10), Some(day(15)));
        // Half-open: a stay may start the day the previous one ends.
        assert!(!overlaps(existing, (day(15), Some(day(18)))));
        assert!(!overlaps(existing, (day(5), Some(day(10)))));
    }

    #[test]
    fn open_ended_existing_booking_blocks_everything_after_check_in() {
        let existing = (day(10), None);
        assert!(overlaps(existing, (day(20), Some(day(21)))));
        assert!(overlaps(existing, (day(20), None)));
        assert!(!overlaps(existing, (day(5), Some(day(10)))));
    }

    #[test]
    fn open_ended_proposal_conflicts_with_any_later_booking() {
        let existing = (day(20), Some(day(22)));
        assert!(overlaps(existing, (day(5), None)));
    }

    #[test]
    fn add_ons_accept_both_shapes() {
        let input = json!([
            { "description": "Late checkout", "amount": 200 },
            { "name": "Extra bed", "price": 150 },
        ]);
        let normalized = normalize_add_ons(Some(&input));
        assert_eq!(
            normalized,
            vec![
                AddOnCharge {
                    description: "Late checkout".to_string(),
                    amount: Decimal::from(200),
                },
                AddOnCharge {
                    description: "Extra bed".to_string(),
                    amount: Decimal::from(150),
                },
            ]
        );
    }

    #[test]
    fn add_ons_parse_json_encoded_string() {
        let input = Value::String(r#"[{"name":"Spa","price":500}]"#.to_string());
        let normalized = normalize_add_ons(Some(&input));
        assert_eq!(normalized.len(), 1);
        assert_eq!(normalized[0].description, "Spa");
        assert_eq!(normalized[0].amount, Decimal::from(500));
    }

    #[test]
    fn malformed_add_ons_degrade_to_empty() {
        assert!(normalize_add_ons(None).is_empty());
        assert!(normalize_add_ons(Some(&json!({ "name": "not an array" }))).is_empty());
        assert!(normalize_add_ons(Some(&json!(42))).is_empty());
        assert!(normalize_add_ons(Some(&Value::String("not json".to_string()))).is_empty());
    }

    #[test]
    fn unrecognized_add_on_entries_are_dropped() {
        let input = json!([
            { "name": "Valid", "price": 100 },
            { "foo": "bar" },
            "just a string",
        ]);
        let normalized = normalize_add_ons(Some(&input));
        assert_eq!(normalized.len(), 1);
        assert_eq!(normalized[0].description, "Valid");
    }

    #[test]
    fn fold_sums_quantities_per_item() {
        let orders = vec![
            UnsettledOrder {
                id: 1,
                item_id: 7,
                quantity: 2,
                item_name: "Masala dosa".to_string(),
                item_price: Decimal::from(80),
            },
            UnsettledOrder {
                id: 2,
                item_id: 9,
                quantity: 1,
                item_name: "Filter coffee".to_string(),
                item_price: Decimal::from(40),
            },
            UnsettledOrder {
                id: 3,
                item_id: 7,
                quantity: 3,
                item_name: "Masala dosa".to_string(),
                item_price: Decimal::from(80),
            },
        ];

        let lines = fold_kitchen_orders(&orders);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].item_id, 7);
        assert_eq!(lines[0].quantity, 5);
        assert_eq!(lines[1].item_id, 9);
        assert_eq!(lines[1].quantity, 1);
        assert_eq!(kitchen_subtotal(&lines), Decimal::from(440));
    }

    #[test]
    fn fold_of_nothing_is_nothing() {
        assert!(fold_kitchen_orders(&[]).is_empty());
        assert_eq!(kitchen_subtotal(&[]), Decimal::ZERO);
    }

    #[test]
    fn total_is_room_plus_kitchen_plus_add_ons() {
        let kitchen = vec![line(1, 100, 3)];
        let add_ons = vec![
            AddOnCharge {
                description: "A".to_string(),
                amount: Decimal::from(200),
            },
            AddOnCharge {
                description: "B".to_string(),
                amount: Decimal::from(150),
            },
        ];
        assert_eq!(
            compute_total(Decimal::from(1000), &kitchen, &add_ons),
            Decimal::from(1650)
        );
    }

    #[test]
    fn numeric_override_wins_anything_else_falls_back() {
        assert_eq!(
            override_total(Some(&json!(1800))),
            Some(Decimal::from(1800))
        );
        assert_eq!(override_total(Some(&json!("1800"))), None);
        assert_eq!(override_total(Some(&Value::Null)), None);
        assert_eq!(override_total(None), None);
    }

    #[test]
    fn booking_status_maps_to_room_status() {
        assert_eq!(room_status_for("Checked-in"), "Occupied");
        assert_eq!(room_status_for("Confirmed"), "Booked");
    }
}
