pub mod api;
pub mod cli;
pub mod core;
pub mod store;
pub mod transcript;
pub mod view;
