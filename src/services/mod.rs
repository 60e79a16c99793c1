pub mod activity_service;
pub mod ai_service;
pub mod study_parser;
