pub mod analysis;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod llm_client;
pub mod matching;
pub mod models;
pub mod routes;
pub mod seed;
pub mod state;
pub mod store;
