pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod infrastructure;
pub mod logging;
pub mod models;
pub mod seed;
pub mod services;
