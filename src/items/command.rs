pub mod add_item_cmd;
pub mod update_item_cmd;
pub mod get_item_cmd;
pub mod list_items_cmd;
pub mod search_items_cmd;
