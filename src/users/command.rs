pub mod add_user_cmd;
pub mod get_user_cmd;
pub mod update_user_cmd;
pub mod delete_user_cmd;
pub mod list_users_cmd;
