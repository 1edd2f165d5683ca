mod database;
mod error;
mod handlers;
mod middleware;
mod models;
mod utils;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use dotenvy::dotenv;
use std::env;
use tower::ServiceBuilder;
use tower_cookies::CookieManagerLayer;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use database::{create_database_pool, run_migrations, Database};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    env_logger::init();

    // Initialize database
    let database_url = env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set");

    let db = create_database_pool(&database_url).await
        .expect("Failed to connect to database");

    run_migrations(&db).await
        .expect("Failed to run database migrations");

    println!("Database connection successful!");

    // Build the application router
    let app = create_router(db);

    // Get port from environment or use default
    let port = env::var("PORT").unwrap_or_else(|_| "5000".to_string());
    let addr = format!("0.0.0.0:{}", port);

    println!("🏨 Innkeeper server starting on http://{}", addr);

    // Start the server
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

fn create_router(db: Database) -> Router {
    Router::new()
        // Health check
        .route("/", get(|| async { "Hotel backend API is running!" }))

        // Auth routes
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route("/api/auth/profile", get(handlers::auth::profile))
        .route("/api/auth/staff-list", get(handlers::auth::staff_list))
        .route("/api/auth/change-password", put(handlers::auth::change_password))

        // Room routes (specific first, generic last)
        .route("/api/rooms/active", get(handlers::rooms::active_rooms))
        .route("/api/rooms", get(handlers::rooms::list_rooms))
        .route("/api/rooms", post(handlers::rooms::create_room))
        .route("/api/rooms/:id", get(handlers::rooms::get_room))
        .route("/api/rooms/:id", put(handlers::rooms::update_room))
        .route("/api/rooms/:id", delete(handlers::rooms::delete_room))

        // Customer routes
        .route("/api/customers", get(handlers::customers::list_customers))
        .route("/api/customers", post(handlers::customers::create_customer))
        .route("/api/customers/:id", get(handlers::customers::get_customer))
        .route("/api/customers/:id", put(handlers::customers::update_customer))
        .route("/api/customers/:id", delete(handlers::customers::delete_customer))

        // Booking routes
        .route("/api/bookings", get(handlers::bookings::list_bookings))
        .route("/api/bookings", post(handlers::bookings::create_booking))
        .route("/api/bookings/:id", get(handlers::bookings::get_booking))
        .route("/api/bookings/:id", put(handlers::bookings::update_booking_status))
        .route("/api/bookings/:id", delete(handlers::bookings::delete_booking))
        .route("/api/bookings/:id/checkout", post(handlers::bookings::checkout))

        // Kitchen routes
        .route("/api/kitchen/items", get(handlers::kitchen::list_menu_items))
        .route("/api/kitchen/items", post(handlers::kitchen::create_menu_item))
        .route("/api/kitchen/items/:id", get(handlers::kitchen::get_menu_item))
        .route("/api/kitchen/items/:id", put(handlers::kitchen::update_menu_item))
        .route("/api/kitchen/items/:id", delete(handlers::kitchen::delete_menu_item))
        .route("/api/kitchen/categories", get(handlers::kitchen::list_categories))
        .route("/api/kitchen/categories", post(handlers::kitchen::create_category))
        .route("/api/kitchen/categories/:id", delete(handlers::kitchen::delete_category))
        .route("/api/kitchen/orders", get(handlers::kitchen::list_kitchen_orders))
        .route("/api/kitchen/orders", post(handlers::kitchen::create_kitchen_order))
        .route("/api/kitchen/orders/:id", put(handlers::kitchen::update_kitchen_order_status))

        // Add-on catalog routes
        .route("/api/addons", get(handlers::addons::list_add_ons))
        .route("/api/addons", post(handlers::addons::create_add_on))
        .route("/api/addons/:id", put(handlers::addons::update_add_on))
        .route("/api/addons/:id", delete(handlers::addons::delete_add_on))

        // Billing routes (read-only; rows are written by checkout)
        .route("/api/billings", get(handlers::billings::list_billings))
        .route("/api/billings/:id", get(handlers::billings::get_billing))

        // Expense routes
        .route("/api/expenses", get(handlers::expenses::list_expenses))
        .route("/api/expenses", post(handlers::expenses::create_expense))
        .route("/api/expenses/:id", delete(handlers::expenses::delete_expense))

        // Staff routes
        .route("/api/staff", get(handlers::staff::list_staff))
        .route("/api/staff", post(handlers::staff::create_staff))

        // GST settings routes
        .route("/api/gst", get(handlers::gst::get_settings))
        .route("/api/gst", put(handlers::gst::update_settings))

        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CookieManagerLayer::new())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(2 * 1024 * 1024)) // 2MB
        )
        .with_state(db)
}
