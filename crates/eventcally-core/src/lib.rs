pub mod clock;
pub mod config;
pub mod constants;
pub mod error;
