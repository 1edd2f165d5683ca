pub mod auth;

pub use auth::{current_user, require_admin, AuthUser};
