use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    database::Database,
    error::ApiError,
    models::{CreateExpense, Expense},
};

#[derive(Debug, Deserialize)]
pub struct ExpenseFilter {
    pub filter: Option<String>,
}

pub async fn create_expense(
    State(db): State<Database>,
    Json(body): Json<CreateExpense>,
) -> Result<(StatusCode, Json<Expense>), ApiError> {
    let (Some(title), Some(amount), Some(expense_date)) =
        (body.title, body.amount, body.expense_date)
    else {
        return Err(ApiError::validation("Required fields missing"));
    };

    let expense = sqlx::query_as::<_, Expense>(
        r#"
        INSERT INTO expenses (title, amount, category, expense_date)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(&title)
    .bind(amount)
    .bind(&body.category)
    .bind(expense_date)
    .fetch_one(&db)
    .await?;

    Ok((StatusCode::CREATED, Json(expense)))
}

pub async fn list_expenses(
    State(db): State<Database>,
    Query(params): Query<ExpenseFilter>,
) -> Result<Json<Vec<Expense>>, ApiError> {
    let where_clause = match params.filter.as_deref() {
        Some("today") => "WHERE expense_date = CURRENT_DATE",
        Some("week") => {
            "WHERE expense_date >= CURRENT_DATE - INTERVAL '6 days' AND expense_date <= CURRENT_DATE"
        }
        Some("month") => {
            "WHERE date_trunc('month', expense_date) = date_trunc('month', CURRENT_DATE)"
        }
        _ => "",
    };

    let query = format!(
        "SELECT * FROM expenses {} ORDER BY expense_date DESC",
        where_clause
    );

    let expenses = sqlx::query_as::<_, Expense>(&query).fetch_all(&db).await?;

    Ok(Json(expenses))
}

pub async fn delete_expense(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let deleted = sqlx::query("DELETE FROM expenses WHERE id = $1")
        .bind(id)
        .execute(&db)
        .await?;
    if deleted.rows_affected() == 0 {
        return Err(ApiError::not_found("Expense not found"));
    }

    Ok(Json(json!({ "message": "Expense deleted" })))
}
