pub mod algorithm;
pub mod common;
pub mod config;
pub mod error;
pub mod map;
pub mod render;
pub mod scenario;
pub mod stat;
