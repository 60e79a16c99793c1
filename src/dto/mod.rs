pub mod ai_dto;
pub mod auth_dto;
pub mod user_dto;
