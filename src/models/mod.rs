pub mod study;
pub mod user;
