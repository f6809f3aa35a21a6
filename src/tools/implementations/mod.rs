// Tool implementations

pub mod get_user_info;

pub use get_user_info::GetUserInfoTool;
