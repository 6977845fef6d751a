// Public API for integration tests and the server binary

pub mod api;
pub mod config;
pub mod forms;
pub mod game;
pub mod random;
pub mod state;
pub mod store;
pub mod types;
