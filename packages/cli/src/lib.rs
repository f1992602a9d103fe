// ABOUTME: Shared CLI plumbing: environment config and the route guard
// ABOUTME: Subcommand handlers live with the binary under src/bin

pub mod config;
pub mod routes;

pub use config::Config;
pub use routes::Route;
