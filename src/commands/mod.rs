pub mod export;
pub mod messages;
