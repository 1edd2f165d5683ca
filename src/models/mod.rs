pub mod addon;
pub mod billing;
pub mod booking;
pub mod customer;
pub mod expense;
pub mod gst;
pub mod kitchen;
pub mod room;
pub mod staff;

// Re-export only the types we actually use
pub use billing::{AddOnCharge, BilledBy, Billing, BillingSummary, KitchenLine};
pub use booking::{Booking, BookingDisplay, CheckoutRequest, CreateBooking, UpdateBookingStatus};
pub use customer::{Customer, CustomerInput};
pub use expense::{CreateExpense, Expense};
pub use gst::{GstSetting, GstSettingUpdate};
pub use kitchen::{
    CreateKitchenOrder, KitchenOrderDisplay, MenuCategory, MenuCategoryInput, MenuItem,
    MenuItemInput, UpdateKitchenOrderStatus,
};
pub use room::{ActiveRoom, Room, RoomInput, RoomWithOccupancy};
pub use staff::{ChangePasswordRequest, CreateStaff, LoginRequest, Staff, StaffDisplay, User};
