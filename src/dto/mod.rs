pub mod quiz_dto;
pub mod session_dto;
