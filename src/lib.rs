pub mod cli;
pub mod commands;
pub mod db;
pub mod errors;
pub mod models;
pub mod plan;
pub mod schedule;
pub mod storage;
pub mod types;
pub mod utils;
