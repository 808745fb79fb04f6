pub mod port;
pub mod repository;
pub mod types;
