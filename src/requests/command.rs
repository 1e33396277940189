pub mod add_request_cmd;
pub mod get_request_cmd;
pub mod list_requests_cmd;
