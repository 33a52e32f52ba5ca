//! Terminal host for the connection diagnostic screen.
mod app;
mod config;
mod effects;
mod logging;
mod render;

pub use app::run_app;
