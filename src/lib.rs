pub mod aggregate;
pub mod backend;
pub mod catalog;
pub mod config;
pub mod controller;
pub mod filter;
pub mod identity;
pub mod models;
pub mod stage;
pub mod store;
pub mod utils;
pub mod verification;
pub mod view;
