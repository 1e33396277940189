pub mod create_booking_cmd;
pub mod decide_booking_cmd;
pub mod get_booking_cmd;
pub mod list_bookings_cmd;
