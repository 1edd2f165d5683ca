pub mod addons;
pub mod auth;
pub mod billings;
pub mod bookings;
pub mod customers;
pub mod expenses;
pub mod gst;
pub mod kitchen;
pub mod rooms;
pub mod staff;
