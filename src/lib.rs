pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod persistence;
pub mod render;
pub mod store;
pub mod terminal;
pub mod types;
pub mod utils;
pub mod workout;
