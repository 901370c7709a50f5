pub mod config;
pub mod error;
pub mod file_system;
pub mod handlers;
pub mod models;
pub mod utils;
