pub mod app;
pub mod backend;
pub mod cli;
pub mod config;
pub mod history;
pub mod math;
pub mod paths;
pub mod persistence;
pub mod state;
