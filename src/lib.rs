pub mod config;
pub mod model;
pub mod routes;
pub mod store;
pub mod types;
