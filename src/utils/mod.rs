pub mod config;
pub mod fs;
