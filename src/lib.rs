#![doc = "The `tasklist` library crate."]
#![doc = ""]
#![doc = "Domain models, token authentication, persistence and routing for a"]
#![doc = "multi-user task list API. The binary (`main.rs`) only reads configuration,"]
#![doc = "picks a store and starts the server."]

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;

pub use crate::error::AppError;
