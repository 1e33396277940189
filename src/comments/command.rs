pub mod add_comment_cmd;
