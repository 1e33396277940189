pub mod core;
pub mod gateway;
pub mod utils;
pub mod users;
pub mod items;
pub mod requests;
pub mod bookings;
pub mod comments;
