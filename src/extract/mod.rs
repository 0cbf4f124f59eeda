pub mod classify;
pub mod group;
pub mod scenario;
