pub mod json_extract;
pub mod session_token;
